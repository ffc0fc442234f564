//! Error types for the Quill compiler.
//!
//! Uses `thiserror` for ergonomic error definition. Every syntax and
//! semantic error carries a [`SourceLocation`] so the rendered message can
//! point at the offending column of the offending line.

use std::fmt;

use thiserror::Error;

/// Result type used throughout Quill.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Quill operations.
#[derive(Debug, Error)]
#[error("{kind}{}", render_location(.location.as_ref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Where in the source the error was detected, if known.
    pub location: Option<SourceLocation>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Attaches a source location to this error.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches a source location only if none has been recorded yet.
    #[must_use]
    pub fn or_location(mut self, location: SourceLocation) -> Self {
        if self.location.is_none() {
            self.location = Some(location);
        }
        self
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax(message.into()))
    }

    /// Creates a semantic error.
    #[must_use]
    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic(message.into()))
    }

    /// Creates a resource error.
    #[must_use]
    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Fills in the file name and offending line text of a location that
    /// was recorded without them (the language layer only knows positions).
    #[must_use]
    pub fn in_file(mut self, file: &str, source: &str) -> Self {
        if let Some(loc) = self.location.as_mut() {
            loc.fill(file, source);
        }
        self
    }

    /// Returns true if this is a syntax error.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self.kind, ErrorKind::Syntax(_))
    }

    /// Returns true if this is a semantic error.
    #[must_use]
    pub const fn is_semantic(&self) -> bool {
        matches!(self.kind, ErrorKind::Semantic(_))
    }

    /// Returns true if this is a resource error.
    #[must_use]
    pub const fn is_resource(&self) -> bool {
        matches!(self.kind, ErrorKind::Resource(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(err))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed token stream: unterminated bracket or string, missing
    /// punctuation, or a keyword in the wrong context.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Duplicate declaration, reserved-name collision, or an argument that
    /// does not fit a built-in's signature.
    #[error("semantic error: {0}")]
    Semantic(String),

    /// Missing import file or malformed embedded JSON.
    #[error("resource error: {0}")]
    Resource(String),

    /// Failure while reading sources or writing the pack.
    #[error("io error: {0}")]
    Io(std::io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Position of an error or warning in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file name.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// The full text of the offending line, used for the pointer.
    pub line_text: String,
}

impl SourceLocation {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            line_text: String::new(),
        }
    }

    /// Creates a location and fills `line_text` from the given source.
    #[must_use]
    pub fn in_source(file: impl Into<String>, source: &str, line: u32, column: u32) -> Self {
        let line_text = source
            .lines()
            .nth(line.saturating_sub(1) as usize)
            .unwrap_or_default()
            .to_string();
        Self {
            file: file.into(),
            line,
            column,
            line_text,
        }
    }

    /// Sets the file name and line text if they are still empty.
    pub fn fill(&mut self, file: &str, source: &str) {
        if self.file.is_empty() {
            self.file = file.to_string();
        }
        if self.line_text.is_empty() {
            self.line_text = source
                .lines()
                .nth(self.line.saturating_sub(1) as usize)
                .unwrap_or_default()
                .to_string();
        }
    }

    /// Renders the offending line followed by a caret under the column.
    #[must_use]
    pub fn pointer(&self) -> String {
        if self.line_text.is_empty() {
            return String::new();
        }
        let gutter = self.line.to_string();
        let pad = " ".repeat(gutter.len());
        let caret_pad: String = self
            .line_text
            .chars()
            .take(self.column.saturating_sub(1) as usize)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        format!("{pad} |\n{gutter} | {}\n{pad} | {caret_pad}^", self.line_text)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        }
    }
}

fn render_location(location: Option<&SourceLocation>) -> String {
    match location {
        None => String::new(),
        Some(loc) => {
            let pointer = loc.pointer();
            if pointer.is_empty() {
                format!("\n --> {loc}")
            } else {
                format!("\n --> {loc}\n{pointer}")
            }
        }
    }
}

/// A non-fatal diagnostic. Compilation continues after a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Human-readable description.
    pub message: String,
    /// Where the warning was raised.
    pub location: Option<SourceLocation>,
}

impl Warning {
    /// Creates a new warning.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a source location.
    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
