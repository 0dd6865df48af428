//! Character cursor and small text helpers used by the readers.
//!
//! [`TextCursor`] walks an in-memory `&str` one `char` at a time with a single
//! character of lookahead, tracking the byte offset plus a 1-based line and column
//! so that parse errors can point at the failure.
//!
//! ```rust
//! use tagconf::cursor::TextCursor;
//!
//! let mut cursor = TextCursor::new("key = value\nnext");
//! assert_eq!(cursor.read_until(&['=']).trim(), "key");
//! assert!(cursor.eat('='));
//! assert_eq!(cursor.read_line(), Some(" value"));
//! assert_eq!(cursor.line(), 2);
//! ```

use crate::Error;

/// Forward-only reader over a string slice.
#[derive(Clone, Debug)]
pub struct TextCursor<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> TextCursor<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        TextCursor {
            input,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Byte offset of the next character.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.input.len()
    }

    /// Text not consumed yet.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.offset..]
    }

    /// Text consumed so far.
    #[must_use]
    pub fn consumed(&self) -> &'a str {
        &self.input[..self.offset]
    }

    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes the next character if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next_char();
            true
        } else {
            false
        }
    }

    /// Skips whitespace, line breaks included.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    /// Consumes characters up to, but not including, the first one in `stops`.
    ///
    /// Returns everything consumed. Reaching the end of input is not an error; check
    /// [`is_eof`](Self::is_eof) afterwards.
    pub fn read_until(&mut self, stops: &[char]) -> &'a str {
        let start = self.offset;
        while let Some(ch) = self.peek() {
            if stops.contains(&ch) {
                break;
            }
            self.next_char();
        }
        &self.input[start..self.offset]
    }

    /// Consumes one line and returns it without its `\n` or `\r\n` terminator.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn read_line(&mut self) -> Option<&'a str> {
        if self.is_eof() {
            return None;
        }
        let line = self.read_until(&['\n']);
        self.eat('\n');
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// A syntax error at the current position.
    #[must_use]
    pub fn syntax_error(&self, msg: &str) -> Error {
        Error::syntax(self.offset, self.line, self.column, msg)
    }
}

/// Returns `text` with every character in `unwanted` removed.
#[must_use]
pub fn filter_chars(text: &str, unwanted: &[char]) -> String {
    text.chars().filter(|c| !unwanted.contains(c)).collect()
}

/// Returns `text` with all spaces removed.
///
/// ```rust
/// use tagconf::cursor::remove_spaces;
///
/// assert_eq!(remove_spaces(" t r ue "), "true");
/// ```
#[must_use]
pub fn remove_spaces(text: &str) -> String {
    filter_chars(text, &[' '])
}

#[must_use]
pub fn first_non_space(text: &str) -> Option<char> {
    first_char_not_in(text, &[' '])
}

/// First character of `text` that is not in `set`.
#[must_use]
pub fn first_char_not_in(text: &str, set: &[char]) -> Option<char> {
    text.chars().find(|c| !set.contains(c))
}
