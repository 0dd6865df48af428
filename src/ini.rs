//! INI reader and writer.
//!
//! The reader is line oriented:
//!
//! - Lines are trimmed, blank lines are skipped
//! - `[name]` opens (or reopens) a section
//! - Lines starting with a comment prefix (`;`, `#` or `'` by default) are ignored
//! - Anything else is split on the first `=` into a trimmed key and value; a line
//!   without `=` stores the key with an empty value
//! - Keys seen before any header land in the default section (`ROOT`)
//!
//! Repeated keys are kept in order, which is why a section is an
//! [`OrderedMultimap`] rather than a plain map.
//!
//! ## Examples
//!
//! ```rust
//! use tagconf::ini;
//!
//! let doc = ini::from_str("[Display]\nwidth = 800\nheight=600\n").unwrap();
//! assert_eq!(doc.get_str("Display", "width"), Some("800"));
//!
//! let text = ini::to_string(&doc);
//! assert_eq!(text, "[Display]\r\nwidth=800\r\nheight=600\r\n\r\n");
//! ```

use crate::cursor::TextCursor;
use crate::{Error, FormatOptions, IniOptions, OrderedMultimap, Result, TaggedValue};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

/// The keys and values of one INI section.
pub type Section = OrderedMultimap<TaggedValue>;

/// A parsed INI document: section name to [`Section`], sections in file order.
///
/// # Examples
///
/// ```rust
/// use tagconf::{FormatOptions, IniDocument};
///
/// let mut doc = IniDocument::new();
/// doc.add("Audio", "volume", "0.8");
/// doc.add("Audio", "device", "default");
/// doc.add("Audio", "device", "fallback");
///
/// assert_eq!(doc.get_all("Audio", "device").len(), 2);
/// assert_eq!(doc.get_f32("Audio", "volume", &FormatOptions::invariant()).unwrap(), 0.8);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct IniDocument {
    sections: OrderedMultimap<Section>,
}

impl IniDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.try_get(name, 0)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name, 0).ok()
    }

    /// Returns the section named `name`, creating it at the end when missing.
    pub fn section_or_insert(&mut self, name: &str) -> &mut Section {
        self.sections.first_or_insert_with(name, Section::new)
    }

    /// Sections in first-appearance order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> + '_ {
        self.sections.iter().map(|(entry, section)| (entry.key, section))
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.keys()
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.key_count()
    }

    #[must_use]
    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains(name)
    }

    /// Total number of stored values over all sections.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.sections.values().map(Section::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.remove_key(name).ok()?.pop()
    }

    /// Appends `value` under `key` in `section` and returns its position.
    pub fn add(&mut self, section: &str, key: &str, value: impl Into<TaggedValue>) -> usize {
        self.section_or_insert(section).add(key, value.into())
    }

    /// Replaces the first value of `key`, or adds it when absent. Returns the
    /// replaced value.
    pub fn set(
        &mut self,
        section: &str,
        key: &str,
        value: impl Into<TaggedValue>,
    ) -> Option<TaggedValue> {
        let section = self.section_or_insert(section);
        let value = value.into();
        if section.contains(key) {
            section.set(key, 0, value).ok()
        } else {
            section.add(key, value);
            None
        }
    }

    /// Removes every value of `key` in `section`.
    pub fn remove(&mut self, section: &str, key: &str) -> Result<Vec<TaggedValue>> {
        self.section_mut(section)
            .ok_or_else(|| Error::key_not_found(section))?
            .remove_key(key)
    }

    /// First value of `key` in `section`.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&TaggedValue> {
        self.section(section)?.try_get(key, 0)
    }

    #[must_use]
    pub fn get_all(&self, section: &str, key: &str) -> &[TaggedValue] {
        self.section(section).map_or(&[], |s| s.get_all(key))
    }

    #[must_use]
    pub fn get_str(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key)?.as_str()
    }

    fn require(&self, section: &str, key: &str) -> Result<&TaggedValue> {
        self.section(section)
            .ok_or_else(|| Error::key_not_found(section))?
            .get(key, 0)
    }

    /// Parses the first value of `key` as an `i32` using `format`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] when the section or key is missing,
    /// [`Error::InvalidNumber`] when the text does not parse.
    pub fn get_i32(&self, section: &str, key: &str, format: &FormatOptions) -> Result<i32> {
        self.require(section, key)?.parse_i32(format)
    }

    pub fn get_f32(&self, section: &str, key: &str, format: &FormatOptions) -> Result<f32> {
        self.require(section, key)?.parse_f32(format)
    }

    pub fn get_f64(&self, section: &str, key: &str, format: &FormatOptions) -> Result<f64> {
        self.require(section, key)?.parse_f64(format)
    }

    pub fn get_bool(&self, section: &str, key: &str, format: &FormatOptions) -> Result<bool> {
        self.require(section, key)?.parse_bool(format)
    }

    /// Appends every section of `other`; sections with the same name are merged.
    pub fn merge(&mut self, other: IniDocument) {
        for (name, section) in other.sections {
            section.move_to(self.section_or_insert(&name));
        }
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_string(self))
    }
}

impl Serialize for IniDocument {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.section_count()))?;
        for (name, section) in self.sections() {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for IniDocument {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IniDocumentVisitor;

        impl<'de> Visitor<'de> for IniDocumentVisitor {
            type Value = IniDocument;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of INI sections")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut doc = IniDocument::new();
                while let Some((name, section)) = access.next_entry::<String, Section>()? {
                    section.move_to(doc.section_or_insert(&name));
                }
                Ok(doc)
            }
        }

        deserializer.deserialize_map(IniDocumentVisitor)
    }
}

/// Precondition checked by [`write_file`] before anything is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write only if the file does not exist yet.
    CreateNew,
    /// Replace the file only if it already exists.
    Overwrite,
    /// Create or replace unconditionally.
    #[default]
    Always,
    /// Append the full document to the end of an existing file.
    Append,
}

impl WriteMode {
    fn allows(self, exists: bool) -> bool {
        match self {
            WriteMode::CreateNew => !exists,
            WriteMode::Overwrite | WriteMode::Append => exists,
            WriteMode::Always => true,
        }
    }
}

fn section_header(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

/// Parses INI text with default options.
pub fn from_str(text: &str) -> Result<IniDocument> {
    from_str_with_options(text, &IniOptions::default())
}

/// Parses INI text.
///
/// # Examples
///
/// ```rust
/// use tagconf::{ini, IniOptions};
///
/// let options = IniOptions::new().with_default_section("GLOBAL");
/// let doc = ini::from_str_with_options("name=demo\n; comment\n[A]\nflag", &options).unwrap();
/// assert_eq!(doc.get_str("GLOBAL", "name"), Some("demo"));
/// assert_eq!(doc.get_str("A", "flag"), Some(""));
/// ```
pub fn from_str_with_options(text: &str, options: &IniOptions) -> Result<IniDocument> {
    let mut doc = IniDocument::new();
    let mut cursor = TextCursor::new(text.strip_prefix('\u{feff}').unwrap_or(text));
    let mut current: Option<&str> = None;

    while let Some(raw) = cursor.read_line() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = section_header(line) {
            trace!(section = name, line = cursor.line() - 1, "ini section");
            doc.section_or_insert(name);
            current = Some(name);
            continue;
        }
        if options.is_comment(line) {
            continue;
        }
        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line, ""),
        };
        let section = current.unwrap_or(&options.default_section);
        trace!(section, key, "ini value");
        doc.add(section, key, TaggedValue::String(value.to_string()));
    }
    Ok(doc)
}

/// Parses `text` and merges it into `doc`; `doc` is untouched when parsing fails.
pub fn read_into(text: &str, doc: &mut IniDocument, options: &IniOptions) -> Result<()> {
    let parsed = from_str_with_options(text, options)?;
    doc.merge(parsed);
    Ok(())
}

/// Reads and parses an INI file.
///
/// # Errors
///
/// [`Error::FileNotFound`] when `path` does not exist, [`Error::Io`] for other read
/// faults and for content that is not UTF-8.
pub fn from_file(path: impl AsRef<Path>, options: &IniOptions) -> Result<IniDocument> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading ini file");
    let bytes = fs::read(path).map_err(|err| Error::from_io(&err, path))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| Error::io(&format!("{}: {}", path.display(), err)))?;
    from_str_with_options(&text, options)
}

/// Reads INI text from `reader` until end of input.
///
/// # Examples
///
/// ```rust
/// use tagconf::{ini, IniOptions};
///
/// let doc = ini::from_reader("[A]\nx=1\n".as_bytes(), &IniOptions::new()).unwrap();
/// assert_eq!(doc.get_str("A", "x"), Some("1"));
/// ```
pub fn from_reader<R: io::Read>(mut reader: R, options: &IniOptions) -> Result<IniDocument> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_str_with_options(&text, options)
}

/// Writes `doc` as INI text to `writer`.
pub fn to_writer<W: io::Write>(mut writer: W, doc: &IniDocument, options: &IniOptions) -> Result<()> {
    writer.write_all(to_string_with_options(doc, options).as_bytes())?;
    Ok(())
}

/// Renders `doc` with default options.
#[must_use]
pub fn to_string(doc: &IniDocument) -> String {
    to_string_with_options(doc, &IniOptions::default())
}

/// Renders `doc` as INI text.
///
/// Each section is written as a header, its scalar values as `key=value`, then a
/// blank line. Objects, arrays and nulls have no INI form and are skipped.
#[must_use]
pub fn to_string_with_options(doc: &IniDocument, options: &IniOptions) -> String {
    let eol = options.line_ending.as_str();
    let mut out = String::new();
    for (name, section) in doc.sections() {
        out.push('[');
        out.push_str(name);
        out.push(']');
        out.push_str(eol);
        for (entry, value) in section {
            let text = match value {
                TaggedValue::String(s) | TaggedValue::JsonString(s) => s.clone(),
                scalar if scalar.is_scalar() => scalar.to_display_string(&options.format),
                _ => {
                    trace!(section = name, key = entry.key, kind = %value.kind(), "skipping composite value");
                    continue;
                }
            };
            out.push_str(entry.key);
            out.push('=');
            out.push_str(&text);
            out.push_str(eol);
        }
        out.push_str(eol);
    }
    out
}

/// Writes `doc` to `path` if `mode` allows it.
///
/// Returns `Ok(false)` without touching the file when the mode's precondition does
/// not hold.
///
/// # Examples
///
/// ```rust,no_run
/// use tagconf::ini::{self, WriteMode};
/// use tagconf::{IniDocument, IniOptions};
///
/// let mut doc = IniDocument::new();
/// doc.add("Display", "width", 800);
/// let written = ini::write_file(&doc, "settings.ini", WriteMode::CreateNew, &IniOptions::new())?;
/// # Ok::<(), tagconf::Error>(())
/// ```
pub fn write_file(
    doc: &IniDocument,
    path: impl AsRef<Path>,
    mode: WriteMode,
    options: &IniOptions,
) -> Result<bool> {
    let path = path.as_ref();
    let exists = path.exists();
    if !mode.allows(exists) {
        warn!(path = %path.display(), ?mode, exists, "ini write skipped");
        return Ok(false);
    }

    let text = to_string_with_options(doc, options);
    let mut file = match mode {
        WriteMode::Append => fs::OpenOptions::new().append(true).open(path),
        _ => fs::File::create(path),
    }
    .map_err(|err| Error::from_io(&err, path))?;
    file.write_all(text.as_bytes())
        .map_err(|err| Error::from_io(&err, path))?;
    debug!(path = %path.display(), ?mode, sections = doc.section_count(), "wrote ini file");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sections() {
        let doc = from_str("[Display]\r\nwidth=800\r\nheight=600\r\n").unwrap();
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["Display"]);
        assert_eq!(doc.get_str("Display", "width"), Some("800"));
        assert_eq!(doc.get_str("Display", "height"), Some("600"));
    }

    #[test]
    fn test_keys_before_header_go_to_root() {
        let doc = from_str("version=2\n[A]\nx=1").unwrap();
        assert_eq!(doc.get_str("ROOT", "version"), Some("2"));
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["ROOT", "A"]);
    }

    #[test]
    fn test_trims_and_splits_on_first_equals() {
        let doc = from_str("  url =  a=b=c  \n").unwrap();
        assert_eq!(doc.get_str("ROOT", "url"), Some("a=b=c"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let doc = from_str("; one\n# two\n' three\n\n   \nkey=value").unwrap();
        assert_eq!(doc.value_count(), 1);
    }

    #[test]
    fn test_repeated_keys_and_sections_merge() {
        let doc = from_str("[A]\npath=1\n[B]\nx=0\n[A]\npath=2\n").unwrap();
        assert_eq!(doc.section_count(), 2);
        let paths: Vec<_> = doc
            .get_all("A", "path")
            .iter()
            .filter_map(TaggedValue::as_str)
            .collect();
        assert_eq!(paths, vec!["1", "2"]);
    }

    #[test]
    fn test_empty_section_is_kept() {
        let doc = from_str("[Empty]\n[Full]\nk=v\n").unwrap();
        assert!(doc.contains_section("Empty"));
        assert_eq!(to_string(&doc), "[Empty]\r\n\r\n[Full]\r\nk=v\r\n\r\n");
    }

    #[test]
    fn test_unclosed_header_is_a_key() {
        let doc = from_str("[broken\n").unwrap();
        assert_eq!(doc.get_str("ROOT", "[broken"), Some(""));
    }

    #[test]
    fn test_writer_uses_culture_and_skips_composites() {
        let mut doc = IniDocument::new();
        doc.add("S", "ratio", 0.5f64);
        doc.add("S", "on", true);
        doc.add("S", "letter", 'x');
        doc.add("S", "nested", TaggedValue::Array(vec![TaggedValue::Int(1)]));
        doc.add("S", "nothing", TaggedValue::Null);
        doc.add("S", "quoted", TaggedValue::json_string("q"));

        let options = IniOptions::new().with_format(FormatOptions::for_culture("fr-FR"));
        assert_eq!(
            to_string_with_options(&doc, &options),
            "[S]\r\nratio=0,5\r\non=true\r\nletter=x\r\nquoted=q\r\n\r\n"
        );
    }

    #[test]
    fn test_read_into_merges() {
        let mut doc = from_str("[A]\nx=1\n").unwrap();
        read_into("[A]\nx=2\n[B]\ny=3\n", &mut doc, &IniOptions::default()).unwrap();
        assert_eq!(doc.get_all("A", "x").len(), 2);
        assert_eq!(doc.get_str("B", "y"), Some("3"));
    }

    #[test]
    fn test_set_and_remove() {
        let mut doc = IniDocument::new();
        assert_eq!(doc.set("A", "k", "1"), None);
        assert_eq!(doc.set("A", "k", "2"), Some(TaggedValue::from("1")));
        assert_eq!(doc.remove("A", "k").unwrap().len(), 1);
        assert!(doc.remove("Missing", "k").is_err());
        assert!(doc.remove_section("A").is_some());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_typed_getters() {
        let doc = from_str("[N]\ni=42\nf=1,5\nb=True\ns=abc\n").unwrap();
        let dutch = FormatOptions::for_culture("nl-NL");
        assert_eq!(doc.get_i32("N", "i", &dutch).unwrap(), 42);
        assert_eq!(doc.get_f64("N", "f", &dutch).unwrap(), 1.5);
        assert!(doc.get_bool("N", "b", &dutch).unwrap());
        assert_eq!(
            doc.get_i32("N", "s", &dutch),
            Err(Error::invalid_number("abc"))
        );
        assert_eq!(
            doc.get_i32("N", "missing", &dutch),
            Err(Error::key_not_found("missing"))
        );
    }

    #[test]
    fn test_write_modes() {
        assert!(WriteMode::CreateNew.allows(false));
        assert!(!WriteMode::CreateNew.allows(true));
        assert!(WriteMode::Overwrite.allows(true));
        assert!(!WriteMode::Append.allows(false));
        assert!(WriteMode::Always.allows(false));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let doc = from_str("\u{feff}[A]\nk=v").unwrap();
        assert!(doc.contains_section("A"));
    }

    #[test]
    fn test_padding_around_values_is_not_preserved() {
        let mut doc = IniDocument::new();
        doc.add("S", "k", " padded ");
        let text = to_string(&doc);
        assert_eq!(text, "[S]\r\nk= padded \r\n\r\n");
        assert_eq!(from_str(&text).unwrap().get_str("S", "k"), Some("padded"));
    }

    #[test]
    fn test_non_utf8_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.ini");
        fs::write(&path, b"[A]\nname=caf\xe9\n").unwrap();
        let err = from_file(&path, &IniOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Io(ref msg) if msg.contains("latin1.ini")));
    }
}
