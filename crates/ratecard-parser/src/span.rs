//! Byte spans within a single line.

use std::fmt;

/// A span in a line, represented as a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the text before this span.
    #[must_use]
    pub fn before<'a>(&self, line: &'a str) -> &'a str {
        &line[..self.start]
    }

    /// Get the text after this span.
    #[must_use]
    pub fn after<'a>(&self, line: &'a str) -> &'a str {
        &line[self.end..]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
