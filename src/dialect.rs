//! Reference for the INI and JSON dialects read and written by this crate.
//!
//! This module has no code. It describes the exact input the readers accept and
//! the output the writers produce.
//!
//! # INI
//!
//! ## Reading
//!
//! Input is processed one line at a time. `\n` and `\r\n` line endings are both
//! accepted, and a leading UTF-8 byte order mark is ignored. Every line is trimmed
//! before it is classified:
//!
//! | Line                  | Meaning                                           |
//! |-----------------------|---------------------------------------------------|
//! | empty                 | ignored                                           |
//! | `[name]`              | start (or reopen) section `name`, trimmed         |
//! | `; …`, `# …`, `' …`   | comment, ignored                                  |
//! | `key = value`         | value in the current section, both sides trimmed  |
//! | `key`                 | value `""` under `key`                            |
//!
//! Headers are recognised before comments, so `[;odd]` is a section. The line is
//! split on the first `=` only, so `url=a=b` stores `a=b`. Padding around a
//! value does not survive a write and read back. Values are kept as
//! [`TaggedValue::String`](crate::TaggedValue::String); typed access goes through
//! the `get_i32`/`get_f64`/`get_bool` family with an explicit
//! [`FormatOptions`](crate::FormatOptions).
//!
//! Keys that appear before the first header are placed in the default section
//! (`ROOT`, see [`IniOptions::with_default_section`](crate::IniOptions::with_default_section)).
//! A section that appears twice is reopened: later keys are appended to it. The same
//! key may appear several times; every value is kept in order.
//!
//! ```text
//! version=2
//! [Display]
//! width = 800
//! ; the first monitor
//! device=primary
//! device=secondary
//! ```
//!
//! ## Writing
//!
//! Sections are written in first-appearance order. Each one is a `[name]` header,
//! one `key=value` line per stored value, then an empty line. The line ending is
//! `\r\n` unless changed through
//! [`IniOptions::with_line_ending`](crate::IniOptions::with_line_ending).
//!
//! Strings are written unquoted. Numbers, characters and booleans are formatted
//! with the configured [`FormatOptions`](crate::FormatOptions), so a `,` decimal
//! separator culture writes `0,5`. Objects, arrays and nulls have no INI form and
//! are skipped.
//!
//! # JSON
//!
//! ## Reading
//!
//! Standard JSON is accepted along with the following extensions:
//!
//! - Member names may be bare: `{ width: 800 }`. A bare name ends at `:`.
//! - Values may be bare. A bare value runs to the next `,`, `}`, `]` or `"` and is
//!   trimmed. It is then converted by its first non-space character:
//!
//!   | First character    | Result                                               |
//!   |--------------------|------------------------------------------------------|
//!   | `f` + `false`      | `Bool(false)`                                        |
//!   | `t` + `true`       | `Bool(true)`                                         |
//!   | `n` or `N`         | `Null`                                               |
//!   | digit, `.`, `-`    | `Int` when it fits an `i32`, else `Double`           |
//!   | anything else      | `JsonString` with the trimmed text                   |
//!
//!   Spaces inside `true`/`false` are ignored (`t r u e` reads as `true`). Only the
//!   lowercase forms are literals: `True` stays a string.
//! - A bare `null` in member position, not followed by `:`, is kept as a
//!   [`JsonMember::Separator`](crate::JsonMember::Separator).
//! - A trailing comma before `}` or `]` is ignored.
//! - Escapes `\"`, `\\`, `\/`, `\b`, `\f`, `\n`, `\r`, `\t`, `\0` and `\uXXXX`
//!   (with surrogate pairs) are decoded; any other escaped character is kept with
//!   its backslash.
//!
//! Quoted strings are always [`TaggedValue::JsonString`](crate::TaggedValue::JsonString).
//! The root may be any value, not only an object. Nesting is limited to 256 levels.
//!
//! With [`JsonOptions::with_legacy_true_literal`](crate::JsonOptions::with_legacy_true_literal)
//! the bare literal `true` reads as `false`. This reproduces files produced by older
//! readers and is off by default.
//!
//! ## Errors
//!
//! | Input                         | Error                                        |
//! |-------------------------------|----------------------------------------------|
//! | ends inside a structure       | [`Error::FileCorrupt`](crate::Error::FileCorrupt) with the partial tree |
//! | unexpected character          | [`Error::Syntax`](crate::Error::Syntax)      |
//! | text after the root value     | [`Error::Syntax`](crate::Error::Syntax)      |
//! | malformed number (`1.2.3`)    | [`Error::Syntax`](crate::Error::Syntax)      |
//!
//! For `{"a": 1` the error reports offset 7, expected `',' or '}'` and the partial
//! tree `{ "a" : 1 }`.
//!
//! ## Writing
//!
//! The writer always produces standard JSON. Names and strings are quoted and
//! escaped, separators are dropped, non-finite numbers become `null`, and
//! whole-valued floats keep a fractional digit (`2.0`) so they read back as
//! floats. The decimal separator is always `.`, whatever the culture in
//! [`JsonOptions`](crate::JsonOptions). [`JsonOptions::pretty`](crate::JsonOptions::pretty) puts every member
//! and element on its own line indented by two spaces per level.
//!
//! # Display form
//!
//! [`TaggedValue`](crate::TaggedValue) implements `Display` with a loose rendering
//! used in error reports: objects as `{ "name" : value, null }`, arrays as
//! `[ a, b ]`, JSON strings quoted and plain strings bare.
