//! Output text buffer that tracks trailing newlines.

use std::fmt;

/// String sink used by the visitor and the generator.
///
/// Keeps count of the newlines at the end of the buffer so block markup can
/// ask for a blank line without doubling existing ones.
#[derive(Debug, Default, Clone)]
pub struct TextStream {
    buf: String,
    newlines: usize,
}

impl TextStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a string.
    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.buf.push_str(s);
        let trailing = s.len() - s.trim_end_matches('\n').len();
        if trailing == s.len() {
            self.newlines += trailing;
        } else {
            self.newlines = trailing;
        }
    }

    /// Appends a character.
    pub fn push(&mut self, c: char) {
        self.buf.push(c);
        if c == '\n' {
            self.newlines += 1;
        } else {
            self.newlines = 0;
        }
    }

    /// Appends a newline.
    pub fn endl(&mut self) {
        self.push('\n');
    }

    /// Ends the current line unless already at the start of one.
    pub fn ensure_newline(&mut self) {
        if !self.buf.is_empty() && self.newlines == 0 {
            self.push('\n');
        }
    }

    /// Guarantees a blank line at the end of the buffer.
    pub fn vspace(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        while self.newlines < 2 {
            self.push('\n');
        }
    }

    /// Number of newlines at the end of the buffer.
    pub fn trailing_newlines(&self) -> usize {
        self.newlines
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Takes the content, leaving the stream empty.
    pub fn take(&mut self) -> String {
        self.newlines = 0;
        std::mem::take(&mut self.buf)
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl fmt::Write for TextStream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }
}
