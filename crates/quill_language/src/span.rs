//! Source location tracking.
//!
//! `Span` tracks the position of tokens in source code for error reporting
//! and for deciding whether two tokens were written without whitespace
//! between them.

use quill_foundation::SourceLocation;

/// A span of source text.
///
/// Byte offsets are relative to the string handed to the tokenizer; line
/// and column are absolute within the source file, so nested
/// re-tokenization of a bracket's interior still reports true positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset where this span starts.
    pub start: usize,
    /// Byte offset where this span ends (exclusive).
    pub end: usize,
    /// 1-based line number where this span starts.
    pub line: u32,
    /// 1-based column number where this span starts.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Creates a span at the start of input.
    #[must_use]
    pub const fn at_start() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }

    /// Creates a span covering the range from this span to another.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }

    /// Returns the length of this span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this span covers in the given source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Returns true if `next` begins exactly where this span ends.
    #[must_use]
    pub const fn touches(&self, next: &Self) -> bool {
        self.end == next.start
    }

    /// Converts the start of this span into a file-less source location.
    /// The compiler fills in the file name and line text.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new("", self.line, self.column)
    }
}
