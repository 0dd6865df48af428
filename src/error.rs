//! Error types for the multimap, tagged values and the INI/JSON readers.
//!
//! Every failure that the container types or the parsers can run into is reported
//! through the single [`Error`] enum, so callers only ever match one type.
//!
//! ## Error Categories
//!
//! - **File errors**: [`Error::FileNotFound`] and [`Error::Io`] for missing files and
//!   stream faults
//! - **Parse errors**: [`Error::FileCorrupt`] when input ends before a structure is
//!   closed, [`Error::Syntax`] for malformed content, [`Error::InvalidNumber`] for
//!   numeric tokens that do not convert
//! - **Container errors**: [`Error::KeyNotFound`] and [`Error::IndexOutOfRange`] from
//!   [`OrderedMultimap`](crate::OrderedMultimap)
//! - **Type errors**: [`Error::TypeMismatch`] from typed access on a
//!   [`TaggedValue`](crate::TaggedValue)
//!
//! ## Examples
//!
//! ```rust
//! use tagconf::{json, Error};
//!
//! let result = json::from_str(r#"{"a": 1"#);
//! assert!(matches!(result, Err(Error::FileCorrupt { .. })));
//! ```

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
///
/// Parse errors carry the byte offset plus line and column of the failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The requested file does not exist
    #[error("Unable to locate {path}")]
    FileNotFound { path: String },

    /// Input ended before a structure was closed
    #[error("File corrupt at offset {offset} (line {line}, column {column}): expected {expected}\nParsed so far: {parsed}")]
    FileCorrupt {
        offset: usize,
        line: usize,
        column: usize,
        expected: String,
        parsed: String,
    },

    /// Malformed content that is not an early end of input
    #[error("Syntax error at offset {offset} (line {line}, column {column}): {msg}")]
    Syntax {
        offset: usize,
        line: usize,
        column: usize,
        msg: String,
    },

    /// The key has no entries in the multimap
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    /// The position is outside the dense range of the key
    #[error("Position {position} out of range for key '{key}' (count {len})")]
    IndexOutOfRange {
        key: String,
        position: usize,
        len: usize,
    },

    /// Typed access on a value of another kind
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Text that does not convert to the requested number type
    #[error("Invalid number: '{text}'")]
    InvalidNumber { text: String },

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a file-not-found error for `path`.
    pub fn file_not_found(path: &Path) -> Self {
        Error::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Creates a corrupt-file error for input that ended too early.
    ///
    /// `parsed` is a rendering of whatever had been built before the input ran out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagconf::Error;
    ///
    /// let err = Error::file_corrupt(7, 1, 8, "'}'", "{ \"a\" : 1 }");
    /// assert!(err.to_string().contains("offset 7"));
    /// ```
    pub fn file_corrupt(
        offset: usize,
        line: usize,
        column: usize,
        expected: &str,
        parsed: &str,
    ) -> Self {
        Error::FileCorrupt {
            offset,
            line,
            column,
            expected: expected.to_string(),
            parsed: parsed.to_string(),
        }
    }

    /// Creates a syntax error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagconf::Error;
    ///
    /// let err = Error::syntax(3, 1, 4, "expected ':'");
    /// assert!(err.to_string().contains("line 1"));
    /// ```
    pub fn syntax(offset: usize, line: usize, column: usize, msg: &str) -> Self {
        Error::Syntax {
            offset,
            line,
            column,
            msg: msg.to_string(),
        }
    }

    pub fn key_not_found(key: &str) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
        }
    }

    pub fn index_out_of_range(key: &str, position: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            key: key.to_string(),
            position,
            len,
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagconf::Error;
    ///
    /// let err = Error::type_mismatch("int", "string");
    /// assert!(err.to_string().contains("expected int"));
    /// ```
    pub fn type_mismatch<E: fmt::Display, F: fmt::Display>(expected: E, found: F) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn invalid_number(text: &str) -> Self {
        Error::InvalidNumber {
            text: text.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// `true` for [`Error::FileCorrupt`].
    #[inline]
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Error::FileCorrupt { .. })
    }

    /// Maps an I/O error raised while opening `path`.
    pub(crate) fn from_io(err: &std::io::Error, path: &Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path)
        } else {
            Error::Io(format!("{}: {}", path.display(), err))
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_io_maps_to_file_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let mapped = Error::from_io(&err, Path::new("cfg/settings.ini"));
        assert_eq!(
            mapped,
            Error::FileNotFound {
                path: "cfg/settings.ini".to_string()
            }
        );
    }

    #[test]
    fn test_other_io_keeps_message() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let mapped = Error::from_io(&err, Path::new("x.ini"));
        assert!(matches!(mapped, Error::Io(ref msg) if msg.contains("denied")));
    }

    #[test]
    fn test_display_messages() {
        let err = Error::index_out_of_range("width", 3, 2);
        assert_eq!(
            err.to_string(),
            "Position 3 out of range for key 'width' (count 2)"
        );
        assert_eq!(
            Error::key_not_found("height").to_string(),
            "Key not found: height"
        );
    }
}
