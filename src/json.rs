//! Loose JSON reader and a strict JSON writer.
//!
//! The reader is a recursive-descent parser over a [`TextCursor`] with one
//! character of lookahead. It accepts standard JSON plus the looser forms found in
//! hand-edited configuration files:
//!
//! - Bare (unquoted) member names: `{ width: 800 }`
//! - Bare values, converted by their first character (`true`, `false`, numbers,
//!   `null`, or else kept as text)
//! - A bare `null` between object members, kept as a [`JsonMember::Separator`]
//! - A trailing comma before `}` or `]`
//!
//! Quoted strings always become [`TaggedValue::JsonString`]. Numbers that fit an
//! `i32` become [`TaggedValue::Int`], all others [`TaggedValue::Double`].
//!
//! Input that ends before a structure is closed fails with [`Error::FileCorrupt`],
//! which carries a rendering of everything built up to that point.
//!
//! ## Examples
//!
//! ```rust
//! use tagconf::{json, JsonOptions, TaggedValue};
//!
//! let doc = json::from_str(r#"{ "name": "demo", size: 3, ratio: 0.5, tags: [a, "b"] }"#).unwrap();
//! assert_eq!(doc.find("size"), Some(&TaggedValue::Int(3)));
//! assert_eq!(doc.find("ratio"), Some(&TaggedValue::Double(0.5)));
//!
//! let text = json::to_string(doc.root(), &JsonOptions::new());
//! assert_eq!(text, r#"{"name":"demo","size":3,"ratio":0.5,"tags":["a","b"]}"#);
//! ```

use crate::cursor::{first_non_space, remove_spaces, TextCursor};
use crate::object::{collect_in_value, find_in_value};
use crate::{Error, JsonMember, JsonObject, JsonOptions, Result, TaggedValue};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, trace, warn};

const MAX_DEPTH: usize = 256;

// Characters that end a bare value.
const VALUE_STOPS: &[char] = &[',', '}', ']', '"'];
// Characters that end a bare member name.
const NAME_STOPS: &[char] = &[':', ',', '}', ']', '"', '{', '['];

/// A parsed JSON document.
///
/// # Examples
///
/// ```rust
/// use tagconf::json;
///
/// let doc = json::from_str(r#"{"window": {"title": "main"}, "title": "app"}"#).unwrap();
/// assert_eq!(doc.members().count(), 2);
/// assert_eq!(doc.find_all("title").len(), 2);
/// assert_eq!(doc.find("title").and_then(|v| v.as_str()), Some("main"));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct JsonDocument {
    root: TaggedValue,
}

impl JsonDocument {
    #[must_use]
    pub fn new(root: TaggedValue) -> Self {
        JsonDocument { root }
    }

    #[must_use]
    pub fn root(&self) -> &TaggedValue {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut TaggedValue {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> TaggedValue {
        self.root
    }

    /// Members of the root object; empty when the root is not an object.
    pub fn members(&self) -> std::slice::Iter<'_, JsonMember> {
        match &self.root {
            TaggedValue::Object(object) => object.members(),
            _ => [].iter(),
        }
    }

    /// Depth-first search for the first pair named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TaggedValue> {
        find_in_value(&self.root, name)
    }

    /// Every pair named `name`, in the order [`find`](Self::find) visits them.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&TaggedValue> {
        let mut found = Vec::new();
        collect_in_value(&self.root, name, &mut found);
        found
    }
}

impl From<TaggedValue> for JsonDocument {
    fn from(root: TaggedValue) -> Self {
        JsonDocument::new(root)
    }
}

impl fmt::Display for JsonDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

// Why a parse stopped. `Eof` carries the partially built value so each enclosing
// structure can wrap it on the way out.
enum Halt {
    Eof {
        partial: Option<TaggedValue>,
        offset: usize,
        line: usize,
        column: usize,
        expected: &'static str,
    },
    Fail(Error),
}

impl Halt {
    fn wrap(self, build: impl FnOnce(Option<TaggedValue>) -> TaggedValue) -> Halt {
        match self {
            Halt::Eof {
                partial,
                offset,
                line,
                column,
                expected,
            } => Halt::Eof {
                partial: Some(build(partial)),
                offset,
                line,
                column,
                expected,
            },
            fail => fail,
        }
    }
}

type Step<T> = std::result::Result<T, Halt>;

struct Parser<'a> {
    cursor: TextCursor<'a>,
    options: &'a JsonOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, options: &'a JsonOptions) -> Self {
        Parser {
            cursor: TextCursor::new(input),
            options,
            depth: 0,
        }
    }

    fn eof(&self, partial: Option<TaggedValue>, expected: &'static str) -> Halt {
        Halt::Eof {
            partial,
            offset: self.cursor.offset(),
            line: self.cursor.line(),
            column: self.cursor.column(),
            expected,
        }
    }

    fn fail(&self, msg: &str) -> Halt {
        Halt::Fail(self.cursor.syntax_error(msg))
    }

    fn parse_document(&mut self) -> Step<TaggedValue> {
        self.cursor.skip_whitespace();
        let root = self.parse_value()?;
        self.cursor.skip_whitespace();
        if !self.cursor.is_eof() {
            return Err(self.fail("unexpected characters after the root value"));
        }
        Ok(root)
    }

    fn enter(&mut self) -> Step<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.fail("nesting too deep"));
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Step<TaggedValue> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Err(self.eof(None, "a value")),
            Some('{') => {
                self.cursor.next_char();
                self.enter()?;
                let object = self.parse_object()?;
                self.depth -= 1;
                Ok(TaggedValue::Object(object))
            }
            Some('[') => {
                self.cursor.next_char();
                self.enter()?;
                let items = self.parse_array()?;
                self.depth -= 1;
                Ok(TaggedValue::Array(items))
            }
            Some('"') => self.parse_string().map(TaggedValue::JsonString),
            Some('}' | ']' | ',' | ':') => Err(self.fail("expected a value")),
            Some(_) => {
                let token = self.cursor.read_until(VALUE_STOPS);
                smart_convert(token, self.options).map_err(|err| match err {
                    Error::InvalidNumber { text } => {
                        self.fail(&format!("invalid number '{}'", text))
                    }
                    other => Halt::Fail(other),
                })
            }
        }
    }

    // Called after '{'.
    fn parse_object(&mut self) -> Step<JsonObject> {
        let mut object = JsonObject::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Err(self.eof(Some(TaggedValue::Object(object)), "'}'")),
                Some('}') => {
                    self.cursor.next_char();
                    return Ok(object);
                }
                _ => {}
            }

            match self.parse_member_name() {
                Ok(Some(name)) => match self.parse_value() {
                    Ok(value) => object.push(name, value),
                    Err(halt) => {
                        return Err(halt.wrap(|partial| {
                            object.push(name, partial.unwrap_or_default());
                            TaggedValue::Object(object)
                        }))
                    }
                },
                Ok(None) => {
                    trace!(offset = self.cursor.offset(), "json separator");
                    object.push_separator();
                }
                Err(halt) => return Err(halt.wrap(|_| TaggedValue::Object(object))),
            }

            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                Some(',') => {
                    self.cursor.next_char();
                }
                Some('}') => {}
                None => return Err(self.eof(Some(TaggedValue::Object(object)), "',' or '}'")),
                Some(_) => return Err(self.fail("expected ',' or '}'")),
            }
        }
    }

    /// Reads `"name" :` or `name :`. Returns `None` for a bare `null` separator.
    fn parse_member_name(&mut self) -> Step<Option<String>> {
        let name = if self.cursor.peek() == Some('"') {
            self.parse_string()?
        } else {
            let token = self.cursor.read_until(NAME_STOPS).trim();
            self.cursor.skip_whitespace();
            if self.cursor.peek() != Some(':') && token.eq_ignore_ascii_case("null") {
                return Ok(None);
            }
            if token.is_empty() {
                if self.cursor.is_eof() {
                    return Err(self.eof(None, "a member name"));
                }
                return Err(self.fail("expected a member name"));
            }
            token.to_string()
        };

        self.cursor.skip_whitespace();
        match self.cursor.next_char() {
            Some(':') => Ok(Some(name)),
            None => Err(self.eof(None, "':'")),
            Some(_) => Err(self.fail("expected ':' after member name")),
        }
    }

    // Called after '['.
    fn parse_array(&mut self) -> Step<Vec<TaggedValue>> {
        let mut items = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Err(self.eof(Some(TaggedValue::Array(items)), "']'")),
                Some(']') => {
                    self.cursor.next_char();
                    return Ok(items);
                }
                _ => {}
            }

            match self.parse_value() {
                Ok(value) => items.push(value),
                Err(halt) => {
                    return Err(halt.wrap(|partial| {
                        items.push(partial.unwrap_or_default());
                        TaggedValue::Array(items)
                    }))
                }
            }

            self.cursor.skip_whitespace();
            match self.cursor.next_char() {
                Some(',') => {}
                Some(']') => return Ok(items),
                None => return Err(self.eof(Some(TaggedValue::Array(items)), "',' or ']'")),
                Some(_) => return Err(self.fail("expected ',' or ']'")),
            }
        }
    }

    fn parse_string(&mut self) -> Step<String> {
        self.cursor.next_char(); // consume opening quote
        let mut result = String::new();

        while let Some(ch) = self.cursor.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => match self.cursor.next_char() {
                    Some('\\') => result.push('\\'),
                    Some('"') => result.push('"'),
                    Some('/') => result.push('/'),
                    Some('n') => result.push('\n'),
                    Some('r') => result.push('\r'),
                    Some('t') => result.push('\t'),
                    Some('b') => result.push('\u{0008}'),
                    Some('f') => result.push('\u{000C}'),
                    Some('0') => result.push('\0'),
                    Some('u') => {
                        let ch = self.parse_unicode_escape(&result)?;
                        result.push(ch);
                    }
                    Some(other) => {
                        // unknown escape, kept literally
                        result.push('\\');
                        result.push(other);
                    }
                    None => return Err(self.eof(Some(TaggedValue::JsonString(result)), "'\"'")),
                },
                other => result.push(other),
            }
        }
        Err(self.eof(Some(TaggedValue::JsonString(result)), "'\"'"))
    }

    fn parse_hex4(&mut self, parsed: &str) -> Step<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            match self.cursor.next_char() {
                Some(ch) => match ch.to_digit(16) {
                    Some(digit) => code = code * 16 + digit,
                    None => {
                        return Err(
                            self.fail("invalid unicode escape sequence (expected 4 hex digits)")
                        )
                    }
                },
                None => {
                    return Err(self.eof(Some(TaggedValue::json_string(parsed)), "'\"'"));
                }
            }
        }
        Ok(code)
    }

    fn parse_unicode_escape(&mut self, parsed: &str) -> Step<char> {
        let high = self.parse_hex4(parsed)?;
        let code = if (0xD800..0xDC00).contains(&high) {
            // surrogate pair: a low half must follow as another \u escape
            if !(self.cursor.eat('\\') && self.cursor.eat('u')) {
                return Err(self.fail("unpaired surrogate in unicode escape"));
            }
            let low = self.parse_hex4(parsed)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.fail("invalid low surrogate in unicode escape"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.fail("invalid unicode code point"))
    }
}

/// Converts a bare token by its first non-space character.
fn smart_convert(token: &str, options: &JsonOptions) -> Result<TaggedValue> {
    let trimmed = token.trim();
    match first_non_space(trimmed).unwrap_or(' ') {
        'f' if remove_spaces(trimmed).starts_with("false") => return Ok(TaggedValue::Bool(false)),
        't' if remove_spaces(trimmed).starts_with("true") => {
            if options.legacy_true_literal {
                warn!(token = trimmed, "legacy literal mode reads 'true' as false");
                return Ok(TaggedValue::Bool(false));
            }
            return Ok(TaggedValue::Bool(true));
        }
        'n' | 'N' => return Ok(TaggedValue::Null),
        _ => {}
    }

    if looks_numeric(trimmed) {
        let format = &options.format;
        if let Ok(int) = format.parse_i32(trimmed) {
            return Ok(TaggedValue::Int(int));
        }
        return format
            .parse_f64(trimmed)
            .map(TaggedValue::Double)
            .map_err(|_| Error::invalid_number(trimmed));
    }

    Ok(TaggedValue::JsonString(trimmed.to_string()))
}

fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() || c == '.' => true,
        Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit() || c == '.'),
        _ => false,
    }
}

/// Parses JSON text with default options.
pub fn from_str(text: &str) -> Result<JsonDocument> {
    from_str_with_options(text, &JsonOptions::default())
}

/// Parses JSON text.
///
/// # Errors
///
/// [`Error::FileCorrupt`] when the input ends inside a structure, [`Error::Syntax`]
/// for malformed input or trailing characters after the root value.
///
/// # Examples
///
/// ```rust
/// use tagconf::{json, JsonOptions, TaggedValue};
///
/// let legacy = JsonOptions::new().with_legacy_true_literal(true);
/// let doc = json::from_str_with_options("{ b: true }", &legacy).unwrap();
/// assert_eq!(doc.find("b"), Some(&TaggedValue::Bool(false)));
/// ```
pub fn from_str_with_options(text: &str, options: &JsonOptions) -> Result<JsonDocument> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut parser = Parser::new(text, options);
    match parser.parse_document() {
        Ok(root) => Ok(JsonDocument::new(root)),
        Err(Halt::Fail(err)) => Err(err),
        Err(Halt::Eof {
            partial,
            offset,
            line,
            column,
            expected,
        }) => {
            let parsed = partial
                .map(|value| value.to_display_string(&options.format))
                .unwrap_or_default();
            debug!(offset, line, column, expected, "json input ended early");
            Err(Error::file_corrupt(offset, line, column, expected, &parsed))
        }
    }
}

/// Reads and parses a JSON file.
pub fn from_file(path: impl AsRef<Path>, options: &JsonOptions) -> Result<JsonDocument> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading json file");
    let bytes = fs::read(path).map_err(|err| Error::from_io(&err, path))?;
    let text = String::from_utf8(bytes)
        .map_err(|err| Error::io(&format!("{}: {}", path.display(), err)))?;
    from_str_with_options(&text, options)
}

/// Reads JSON text from `reader` until end of input.
pub fn from_reader<R: io::Read>(mut reader: R, options: &JsonOptions) -> Result<JsonDocument> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_str_with_options(&text, options)
}

/// Writes `value` as JSON to `writer`.
///
/// # Examples
///
/// ```rust
/// use tagconf::{json, tagged, JsonOptions};
///
/// let mut buffer = Vec::new();
/// json::to_writer(&mut buffer, &tagged!([1, "a"]), &JsonOptions::new()).unwrap();
/// assert_eq!(buffer, br#"[1,"a"]"#);
/// ```
pub fn to_writer<W: io::Write>(mut writer: W, value: &TaggedValue, options: &JsonOptions) -> Result<()> {
    writer.write_all(to_string(value, options).as_bytes())?;
    Ok(())
}

/// Renders `value` as standard JSON.
///
/// Object separators are dropped, non-finite numbers are written as `null`, and
/// whole-valued floats keep a fractional part so they read back as floats. Numbers
/// always use `.` as the decimal separator; `options.format` does not apply.
///
/// # Examples
///
/// ```rust
/// use tagconf::{json, tagged, JsonOptions};
///
/// let value = tagged!({ "size": [1, 2], "scale": 2.0f64 });
/// assert_eq!(json::to_string(&value, &JsonOptions::new()), r#"{"size":[1,2],"scale":2.0}"#);
/// assert_eq!(
///     json::to_string(&value, &JsonOptions::pretty()),
///     "{\n  \"size\": [\n    1,\n    2\n  ],\n  \"scale\": 2.0\n}"
/// );
/// ```
#[must_use]
pub fn to_string(value: &TaggedValue, options: &JsonOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        options,
        level: 0,
    };
    writer.write_value(value);
    writer.out
}

#[must_use]
pub fn to_string_pretty(value: &TaggedValue) -> String {
    to_string(value, &JsonOptions::pretty())
}

/// Writes `value` to `path`, replacing any existing file.
pub fn write_file(value: &TaggedValue, path: impl AsRef<Path>, options: &JsonOptions) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, to_string(value, options)).map_err(|err| Error::from_io(&err, path))?;
    debug!(path = %path.display(), "wrote json file");
    Ok(())
}

struct Writer<'a> {
    out: String,
    options: &'a JsonOptions,
    level: usize,
}

impl Writer<'_> {
    fn write_value(&mut self, value: &TaggedValue) {
        match value {
            TaggedValue::Null => self.out.push_str("null"),
            TaggedValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            TaggedValue::Int(i) => self.out.push_str(&i.to_string()),
            TaggedValue::Float(f) => self.write_float(f64::from(*f), f.to_string()),
            TaggedValue::Double(d) => self.write_float(*d, d.to_string()),
            TaggedValue::Char(c) => write_escaped(&mut self.out, c.encode_utf8(&mut [0; 4])),
            TaggedValue::String(s) | TaggedValue::JsonString(s) => write_escaped(&mut self.out, s),
            TaggedValue::Array(items) => self.write_array(items),
            TaggedValue::Object(object) => self.write_object(object),
        }
    }

    fn write_float(&mut self, value: f64, text: String) {
        if !value.is_finite() {
            self.out.push_str("null");
            return;
        }
        // always '.', whatever the culture
        let whole = !text.contains(['.', 'e', 'E']);
        self.out.push_str(&text);
        if whole {
            self.out.push_str(".0");
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
            for _ in 0..self.level * self.options.indent {
                self.out.push(' ');
            }
        }
    }

    fn write_array(&mut self, items: &[TaggedValue]) {
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        self.level += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.write_value(item);
        }
        self.level -= 1;
        self.newline();
        self.out.push(']');
    }

    fn write_object(&mut self, object: &JsonObject) {
        if object.pair_count() == 0 {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.level += 1;
        for (i, (name, value)) in object.pairs().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            write_escaped(&mut self.out, name);
            self.out.push(':');
            if self.options.pretty {
                self.out.push(' ');
            }
            self.write_value(value);
        }
        self.level -= 1;
        self.newline();
        self.out.push('}');
    }
}

fn write_escaped(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if u32::from(c) < 0x20 => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
}
