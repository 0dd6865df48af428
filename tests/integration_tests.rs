use serde::{Deserialize, Serialize};
use tagconf::{
    ini, json, tagged, to_value, Error, FileContainer, FormatOptions, IniDocument, IniFile,
    IniOptions, JsonFile, JsonOptions, OrderedMultimap, TaggedValue, WriteMode,
};

const DISPLAY_INI: &str = "[Display]\r\nwidth=800\r\nheight=600\r\n\r\n";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Window {
    title: String,
    width: i32,
    scale: f64,
    modes: Vec<String>,
}

#[test]
fn test_ini_round_trip() {
    let mut doc = IniDocument::new();
    doc.add("Display", "width", "800");
    doc.add("Display", "height", "600");

    let text = ini::to_string(&doc);
    assert_eq!(text, DISPLAY_INI);
    assert_eq!(ini::from_str(&text).unwrap(), doc);
}

#[test]
fn test_ini_multi_values_and_reopened_sections() {
    let text = "[Paths]\nsearch=/usr\nsearch=/opt\n[Other]\nx=1\n[Paths]\nsearch=/home\n";
    let doc = ini::from_str(text).unwrap();
    assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["Paths", "Other"]);
    let search: Vec<_> = doc
        .get_all("Paths", "search")
        .iter()
        .filter_map(TaggedValue::as_str)
        .collect();
    assert_eq!(search, vec!["/usr", "/opt", "/home"]);
}

#[test]
fn test_ini_typed_values_with_culture() {
    let mut doc = IniDocument::new();
    doc.add("Audio", "volume", TaggedValue::Double(0.25));
    doc.add("Audio", "muted", TaggedValue::Bool(true));

    let dutch = IniOptions::new().with_format(FormatOptions::for_culture("nl-NL"));
    let text = ini::to_string_with_options(&doc, &dutch);
    assert_eq!(text, "[Audio]\r\nvolume=0,25\r\nmuted=true\r\n\r\n");

    let back = ini::from_str_with_options(&text, &dutch).unwrap();
    assert_eq!(back.get_f64("Audio", "volume", &dutch.format).unwrap(), 0.25);
    assert!(back.get_bool("Audio", "muted", &dutch.format).unwrap());
    assert!(back.get_f64("Audio", "volume", &FormatOptions::invariant()).is_err());
}

#[test]
fn test_ini_typed_errors() {
    let doc = ini::from_str("[A]\nn=abc\n").unwrap();
    let format = FormatOptions::invariant();
    assert!(matches!(
        doc.get_i32("A", "n", &format),
        Err(Error::InvalidNumber { .. })
    ));
    assert!(matches!(
        doc.get_i32("A", "missing", &format),
        Err(Error::KeyNotFound { .. })
    ));
}

#[test]
fn test_ini_write_modes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("modes.ini");
    let mut doc = IniDocument::new();
    doc.add("S", "k", "v");
    let options = IniOptions::new();

    assert!(!ini::write_file(&doc, &path, WriteMode::Overwrite, &options).unwrap());
    assert!(!ini::write_file(&doc, &path, WriteMode::Append, &options).unwrap());
    assert!(!path.exists());

    assert!(ini::write_file(&doc, &path, WriteMode::CreateNew, &options).unwrap());
    assert!(!ini::write_file(&doc, &path, WriteMode::CreateNew, &options).unwrap());
    assert!(ini::write_file(&doc, &path, WriteMode::Append, &options).unwrap());

    let back = ini::from_file(&path, &options).unwrap();
    assert_eq!(back.get_all("S", "k").len(), 2);

    assert!(ini::write_file(&doc, &path, WriteMode::Overwrite, &options).unwrap());
    let back = ini::from_file(&path, &options).unwrap();
    assert_eq!(back.get_all("S", "k").len(), 1);
}

#[test]
fn test_ini_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ini::from_file(dir.path().join("absent.ini"), &IniOptions::new()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_json_scalar_round_trip() {
    let doc = json::from_str(r#"{"a": "text", "b": true, "c": 3, "d": 0.5, "e": null}"#).unwrap();
    assert_eq!(doc.find("a"), Some(&TaggedValue::json_string("text")));
    assert_eq!(doc.find("b"), Some(&TaggedValue::Bool(true)));
    assert_eq!(doc.find("c"), Some(&TaggedValue::Int(3)));
    assert_eq!(doc.find("d"), Some(&TaggedValue::Double(0.5)));
    assert_eq!(doc.find("e"), Some(&TaggedValue::Null));

    let text = json::to_string(doc.root(), &JsonOptions::new());
    assert_eq!(json::from_str(&text).unwrap(), doc);
}

#[test]
fn test_json_nesting() {
    let doc = json::from_str(r#"{"a": {"b": [1, 2, {"c": "d"}]}}"#).unwrap();
    let a = doc.root().as_object().unwrap().get("a").unwrap();
    let b = a.as_object().unwrap().get("b").unwrap().as_array().unwrap();
    assert_eq!(b.len(), 3);
    assert_eq!(b[0], TaggedValue::Int(1));
    assert_eq!(doc.find("c"), Some(&TaggedValue::json_string("d")));
}

#[test]
fn test_json_corrupt_detection() {
    let err = json::from_str(r#"{"a": 1"#).unwrap_err();
    assert!(matches!(err, Error::FileCorrupt { .. }));
    assert!(err.to_string().contains(r#"{ "a" : 1 }"#));
}

#[test]
fn test_json_agrees_with_serde_json_on_standard_input() {
    let window = Window {
        title: "main \"window\"\n".to_string(),
        width: -800,
        scale: 1.25,
        modes: vec!["a".to_string(), "b\\c".to_string()],
    };
    let standard = serde_json::to_string(&window).unwrap();

    let doc = json::from_str(&standard).unwrap();
    let ours = json::to_string(doc.root(), &JsonOptions::new());
    let back: Window = serde_json::from_str(&ours).unwrap();
    assert_eq!(back, window);

    let via_serde = to_value(&window).unwrap();
    assert_eq!(&via_serde, doc.root());
}

#[test]
fn test_tagged_value_through_serde_json() {
    let value = tagged!({ "list": [1, 2.5f64, true, null], "name": (TaggedValue::json_string("x")) });
    let text = serde_json::to_string(&value).unwrap();
    assert_eq!(text, r#"{"list":[1,2.5,true,null],"name":"x"}"#);
    let back: TaggedValue = serde_json::from_str(&text).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_ini_document_through_serde_json() {
    let doc = ini::from_str(DISPLAY_INI).unwrap();
    let text = serde_json::to_string(&doc).unwrap();
    assert_eq!(text, r#"{"Display":{"width":["800"],"height":["600"]}}"#);
}

#[test]
fn test_file_containers() {
    let dir = tempfile::tempdir().unwrap();

    let mut settings = IniFile::new(dir.path(), "settings.ini");
    settings.add("Display", "width", "800");
    settings.add("Display", "height", "600");
    assert!(settings.save().unwrap());
    let saved = std::fs::read_to_string(dir.path().join("settings.ini")).unwrap();
    assert_eq!(saved, DISPLAY_INI);

    let mut tree = JsonFile::new(dir.path(), "tree.json").with_options(JsonOptions::pretty());
    *tree.root_mut() = tagged!({ "size": [800, 600] });
    tree.save().unwrap();

    let mut loaded = JsonFile::new(dir.path(), "other.json");
    loaded.load_from(dir.path(), "tree.json", false).unwrap();
    assert_eq!(loaded.find("size"), tree.find("size"));
    assert_eq!(loaded.location().file_name(), "other.json");
}

#[test]
fn test_multimap_collect_and_iterate() {
    let map: OrderedMultimap<i32> = vec![("b", 1), ("a", 2), ("b", 3)].into_iter().collect();
    let seen: Vec<_> = map
        .iter()
        .map(|(entry, value)| (entry.key.to_string(), entry.position, *value))
        .collect();
    assert_eq!(
        seen,
        vec![
            ("b".to_string(), 0, 1),
            ("b".to_string(), 1, 3),
            ("a".to_string(), 0, 2)
        ]
    );
}
