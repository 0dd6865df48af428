//! Configuration options for reading and writing INI and JSON text.
//!
//! This module provides the types that customize how values are rendered and parsed:
//!
//! - [`FormatOptions`]: The number/boolean culture (decimal separator, boolean casing)
//! - [`BoolCase`]: Casing used when booleans are rendered
//! - [`IniOptions`]: INI dialect knobs (default section, comment markers, line ending)
//! - [`JsonOptions`]: JSON reader/writer knobs (pretty printing, legacy literal handling)
//!
//! There is no process-wide culture. Every reader and writer takes its options
//! explicitly, so two documents with different cultures can be handled side by side.
//!
//! ## Examples
//!
//! ```rust
//! use tagconf::{FormatOptions, IniOptions, JsonOptions};
//!
//! // Dutch formatting: comma as decimal separator
//! let format = FormatOptions::for_culture("nl-NL");
//! assert_eq!(format.format_f64(1.5), "1,5");
//!
//! let ini = IniOptions::new().with_format(format).with_default_section("GLOBAL");
//! assert_eq!(ini.default_section, "GLOBAL");
//!
//! let json = JsonOptions::pretty().with_indent(4);
//! assert!(json.pretty);
//! ```

use crate::{Error, Result};

/// Casing applied to `true`/`false` when a boolean is rendered.
///
/// # Examples
///
/// ```rust
/// use tagconf::BoolCase;
///
/// assert_eq!(BoolCase::Lower.apply(true), "true");
/// assert_eq!(BoolCase::Title.apply(false), "False");
/// assert_eq!(BoolCase::Upper.apply(true), "TRUE");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoolCase {
    #[default]
    Lower,
    Title,
    Upper,
}

impl BoolCase {
    #[must_use]
    pub const fn apply(self, value: bool) -> &'static str {
        match (self, value) {
            (BoolCase::Lower, true) => "true",
            (BoolCase::Lower, false) => "false",
            (BoolCase::Title, true) => "True",
            (BoolCase::Title, false) => "False",
            (BoolCase::Upper, true) => "TRUE",
            (BoolCase::Upper, false) => "FALSE",
        }
    }
}

// Language prefixes whose cultures write a decimal comma.
const COMMA_CULTURES: &[&str] = &["nl", "de", "fr", "es", "it", "pt", "ru"];

/// Number and boolean culture used when values are turned into text and back.
///
/// # Examples
///
/// ```rust
/// use tagconf::{BoolCase, FormatOptions};
///
/// let options = FormatOptions::new()
///     .with_decimal_separator(',')
///     .with_bool_case(BoolCase::Title);
///
/// assert_eq!(options.format_f32(0.25), "0,25");
/// assert_eq!(options.format_bool(true), "True");
/// assert_eq!(options.parse_f64("2,5").unwrap(), 2.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FormatOptions {
    pub decimal_separator: char,
    pub bool_case: BoolCase,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            decimal_separator: '.',
            bool_case: BoolCase::Lower,
        }
    }
}

impl FormatOptions {
    /// Creates the invariant culture: `.` separator, lower-case booleans.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn invariant() -> Self {
        Self::default()
    }

    /// Looks up a culture by name such as `"en-US"` or `"de-DE"`.
    ///
    /// Only the language part matters. Unknown names fall back to the invariant
    /// culture.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagconf::FormatOptions;
    ///
    /// assert_eq!(FormatOptions::for_culture("de-DE").decimal_separator, ',');
    /// assert_eq!(FormatOptions::for_culture("en-GB").decimal_separator, '.');
    /// assert_eq!(FormatOptions::for_culture("").decimal_separator, '.');
    /// ```
    #[must_use]
    pub fn for_culture(name: &str) -> Self {
        let language = name
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if COMMA_CULTURES.contains(&language.as_str()) {
            Self::default().with_decimal_separator(',')
        } else {
            Self::default()
        }
    }

    #[must_use]
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    #[must_use]
    pub fn with_bool_case(mut self, bool_case: BoolCase) -> Self {
        self.bool_case = bool_case;
        self
    }

    #[must_use]
    pub fn format_i32(&self, value: i32) -> String {
        value.to_string()
    }

    #[must_use]
    pub fn format_f32(&self, value: f32) -> String {
        self.localize(value.to_string())
    }

    #[must_use]
    pub fn format_f64(&self, value: f64) -> String {
        self.localize(value.to_string())
    }

    #[must_use]
    pub fn format_bool(&self, value: bool) -> &'static str {
        self.bool_case.apply(value)
    }

    fn localize(&self, text: String) -> String {
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }

    fn delocalize<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        if self.decimal_separator == '.' {
            std::borrow::Cow::Borrowed(text)
        } else {
            std::borrow::Cow::Owned(text.replace(self.decimal_separator, "."))
        }
    }

    /// Parses a whole number; surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNumber`] when `text` is not an `i32`.
    pub fn parse_i32(&self, text: &str) -> Result<i32> {
        let trimmed = text.trim();
        trimmed
            .parse()
            .map_err(|_| Error::invalid_number(trimmed))
    }

    pub fn parse_f32(&self, text: &str) -> Result<f32> {
        let trimmed = text.trim();
        self.delocalize(trimmed)
            .parse()
            .map_err(|_| Error::invalid_number(trimmed))
    }

    pub fn parse_f64(&self, text: &str) -> Result<f64> {
        let trimmed = text.trim();
        self.delocalize(trimmed)
            .parse()
            .map_err(|_| Error::invalid_number(trimmed))
    }

    /// Parses `true`/`false` in any casing.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] for any other text.
    pub fn parse_bool(&self, text: &str) -> Result<bool> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(Error::type_mismatch("bool", format!("'{}'", trimmed)))
        }
    }
}

/// Options for the INI reader and writer.
///
/// # Examples
///
/// ```rust
/// use tagconf::IniOptions;
///
/// let options = IniOptions::new();
/// assert_eq!(options.default_section, "ROOT");
/// assert_eq!(options.line_ending, "\r\n");
/// assert!(options.is_comment("; note"));
/// assert!(!options.is_comment("key=value"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct IniOptions {
    pub format: FormatOptions,
    pub default_section: String,
    pub comment_prefixes: Vec<char>,
    pub line_ending: String,
}

impl Default for IniOptions {
    fn default() -> Self {
        IniOptions {
            format: FormatOptions::default(),
            default_section: "ROOT".to_string(),
            comment_prefixes: vec![';', '#', '\''],
            line_ending: "\r\n".to_string(),
        }
    }
}

impl IniOptions {
    /// Creates default options: section `ROOT`, comments `;` `#` `'`, CRLF output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Sets the section that receives keys appearing before any header.
    #[must_use]
    pub fn with_default_section(mut self, section: impl Into<String>) -> Self {
        self.default_section = section.into();
        self
    }

    #[must_use]
    pub fn with_comment_prefixes(mut self, prefixes: impl IntoIterator<Item = char>) -> Self {
        self.comment_prefixes = prefixes.into_iter().collect();
        self
    }

    /// Sets the line terminator used by the writer. The reader accepts both
    /// `\n` and `\r\n` regardless.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: impl Into<String>) -> Self {
        self.line_ending = line_ending.into();
        self
    }

    /// Returns `true` if an already trimmed line is a comment.
    #[must_use]
    pub fn is_comment(&self, line: &str) -> bool {
        line.chars()
            .next()
            .is_some_and(|first| self.comment_prefixes.contains(&first))
    }
}

/// Options for the JSON reader and writer.
///
/// # Examples
///
/// ```rust
/// use tagconf::JsonOptions;
///
/// // Default compact output
/// let options = JsonOptions::new();
/// assert!(!options.pretty);
///
/// // Pretty-printed with 4-space indentation
/// let options = JsonOptions::pretty().with_indent(4);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct JsonOptions {
    pub format: FormatOptions,
    /// Reads a bare `true` token as `false`, as older files written by the
    /// legacy reader expect.
    pub legacy_true_literal: bool,
    pub pretty: bool,
    pub indent: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions {
            format: FormatOptions::default(),
            legacy_true_literal: false,
            pretty: false,
            indent: 2,
        }
    }
}

impl JsonOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output with newlines and indentation.
    #[must_use]
    pub fn pretty() -> Self {
        JsonOptions {
            pretty: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_legacy_true_literal(mut self, enabled: bool) -> Self {
        self.legacy_true_literal = enabled;
        self
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}
