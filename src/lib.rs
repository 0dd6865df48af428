//! # tagconf
//!
//! Typed configuration documents: INI and loose JSON readers and writers built on
//! an insertion-ordered multimap and a tagged value type.
//!
//! ## Building blocks
//!
//! - [`OrderedMultimap`]: string keys to ordered lists of values, with keys kept
//!   in first-insertion order. Every key present has at least one value.
//! - [`TaggedValue`]: a closed set of value kinds (strings, chars, numbers, bools,
//!   JSON objects and arrays, null) with strict typed accessors.
//! - [`IniDocument`]: sections of key/value lists, read from and written to INI.
//! - [`JsonDocument`]: a tree of [`TaggedValue`]s read by a forgiving JSON reader
//!   that accepts bare names and values, and written back as standard JSON.
//! - [`IniFile`] and [`JsonFile`]: documents bound to a default file location.
//!
//! ## Quick Start
//!
//! ```rust
//! use tagconf::{ini, json, FormatOptions, TaggedValue};
//!
//! let doc = ini::from_str("[Display]\nwidth=800\nscale=1,5\n").unwrap();
//! let german = FormatOptions::for_culture("de-DE");
//! assert_eq!(doc.get_i32("Display", "width", &german).unwrap(), 800);
//! assert_eq!(doc.get_f64("Display", "scale", &german).unwrap(), 1.5);
//!
//! let tree = json::from_str("{ window: { title: main, size: [800, 600] } }").unwrap();
//! assert_eq!(tree.find("title").and_then(TaggedValue::as_str), Some("main"));
//! ```
//!
//! ### Building values with `tagged!`
//!
//! ```rust
//! use tagconf::{json, tagged, JsonOptions};
//!
//! let value = tagged!({ "ratio": 1.5f64, "on": true });
//! assert_eq!(json::to_string(&value, &JsonOptions::new()), r#"{"ratio":1.5,"on":true}"#);
//! ```
//!
//! ## Culture
//!
//! Number and boolean text is always formatted through an explicit
//! [`FormatOptions`] value. There is no process-wide culture setting.
//!
//! ## Logging
//!
//! File reads and writes emit [`tracing`] events (`debug` for file I/O, `trace`
//! for individual parse steps, `warn` for skipped writes). The crate never
//! installs a subscriber.
//!
//! See [`dialect`] for the exact INI and JSON syntax accepted and produced.

pub mod cursor;
pub mod dialect;
pub mod error;
pub mod file;
pub mod hash;
pub mod ini;
pub mod json;
pub mod macros;
pub mod multimap;
pub mod object;
pub mod options;
pub mod ser;
pub mod value;

pub use error::{Error, Result};
pub use file::{FileContainer, FileLocation, IniFile, JsonFile};
pub use hash::HashKey;
pub use ini::{IniDocument, Section, WriteMode};
pub use json::JsonDocument;
pub use multimap::{Entry, OrderedMultimap};
pub use object::{JsonMember, JsonObject};
pub use options::{BoolCase, FormatOptions, IniOptions, JsonOptions};
pub use value::{TaggedValue, ValueKind};

use serde::Serialize;

/// Converts any serializable value into a [`TaggedValue`] tree.
///
/// Maps and structs become objects, sequences become arrays. Strings become
/// [`TaggedValue::JsonString`], matching what the JSON reader produces.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use tagconf::{to_value, TaggedValue};
///
/// #[derive(Serialize)]
/// struct Window { title: String, width: i32 }
///
/// let value = to_value(&Window { title: "main".into(), width: 800 }).unwrap();
/// let object = value.as_object().unwrap();
/// assert_eq!(object.get("width"), Some(&TaggedValue::Int(800)));
/// ```
///
/// # Errors
///
/// Returns an error if the value's `Serialize` implementation fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<TaggedValue>
where
    T: ?Sized + Serialize,
{
    ser::to_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Display {
        width: i32,
        scale: f64,
        modes: Vec<&'static str>,
        primary: Option<bool>,
    }

    #[test]
    fn test_to_value_struct() {
        let value = to_value(&Display {
            width: 800,
            scale: 1.5,
            modes: vec!["window", "full"],
            primary: None,
        })
        .unwrap();
        assert_eq!(
            value,
            tagged!({
                "width": 800,
                "scale": 1.5,
                "modes": [(TaggedValue::json_string("window")), (TaggedValue::json_string("full"))],
                "primary": null
            })
        );
    }

    #[test]
    fn test_to_value_renders_as_json() {
        let value = to_value(&vec![(1, 'a')]).unwrap();
        assert_eq!(json::to_string(&value, &JsonOptions::new()), r#"[[1,"a"]]"#);
    }
}
