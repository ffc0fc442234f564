//! Tokenizer for Quill source.
//!
//! A character-level state machine that turns source text into statements.
//! Bracket groups are never expanded here: a `{ ... }` body or a `( ... )`
//! argument list becomes one token with balanced raw text, and the consumer
//! re-tokenizes the interior starting at the interior's true line and column.
//!
//! States: seeking (between tokens), keyword, string, paren, comment.
//! Comment detection is suppressed inside brackets so that `//` in a
//! resource location or URL inside a bracket survives.

use std::mem;

use quill_foundation::{Error, Result, SourceLocation, Warning};

use crate::span::Span;
use crate::token::{ParenKind, Statement, Token, TokenKind};

/// Tokenizer configuration and collected warnings.
pub struct Tokenizer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Line of the first character.
    start_line: u32,
    /// Column of the first character.
    start_column: u32,
    /// Whether every statement must end with `;`.
    expect_semicolon: bool,
    /// Non-fatal diagnostics from the last run.
    warnings: Vec<Warning>,
}

impl<'src> Tokenizer<'src> {
    /// Creates a tokenizer for a whole file: starts at 1:1 and requires
    /// semicolons.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start_line: 1,
            start_column: 1,
            expect_semicolon: true,
            warnings: Vec::new(),
        }
    }

    /// Sets the position of the first character.
    #[must_use]
    pub const fn starting_at(mut self, line: u32, column: u32) -> Self {
        self.start_line = line;
        self.start_column = column;
        self
    }

    /// Sets whether statements must be terminated by `;`.
    ///
    /// In no-semicolon mode trailing tokens form a final statement and a
    /// closing curly brace does not end a statement.
    #[must_use]
    pub const fn expect_semicolon(mut self, expect: bool) -> Self {
        self.expect_semicolon = expect;
        self
    }

    /// Splits the source into statements.
    ///
    /// # Errors
    /// Returns a syntax error for a line break inside a string, an
    /// unterminated or mismatched bracket, an unterminated string, or a
    /// missing semicolon.
    pub fn tokenize(&mut self) -> Result<Vec<Statement>> {
        let machine = Machine::new(self.source, self.start_line, self.start_column, self.expect_semicolon);
        let (statements, warnings) = machine.run()?;
        self.warnings = warnings;
        Ok(statements)
    }

    /// Warnings produced by the last [`tokenize`](Self::tokenize) call.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Takes the warnings produced by the last run.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        mem::take(&mut self.warnings)
    }
}

/// Tokenizes `source` starting at the given position. Warnings are logged.
///
/// # Errors
/// See [`Tokenizer::tokenize`].
pub fn tokenize(
    source: &str,
    start_line: u32,
    start_column: u32,
    expect_semicolon: bool,
) -> Result<Vec<Statement>> {
    let mut tokenizer = Tokenizer::new(source)
        .starting_at(start_line, start_column)
        .expect_semicolon(expect_semicolon);
    let statements = tokenizer.tokenize()?;
    for warning in tokenizer.take_warnings() {
        log::warn!("{warning}");
    }
    Ok(statements)
}

/// Re-tokenizes the interior of a bracket group.
///
/// # Errors
/// Returns a syntax error if `token` is not a bracket group or its
/// interior does not tokenize.
pub fn tokenize_inner(token: &Token, expect_semicolon: bool) -> Result<Vec<Statement>> {
    let Some(inner) = token.inner() else {
        return Err(Error::syntax(format!("expected a bracket group, found '{}'", token.text))
            .with_location(token.span.location()));
    };
    let (line, column) = token.inner_start();
    tokenize(inner, line, column, expect_semicolon)
}

/// Statements whose closing curly brace also ends the statement.
const BLOCK_KEYWORDS: [&str; 9] = ["function", "class", "if", "else", "while", "do", "for", "switch", "new"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Seeking,
    Keyword,
    String,
    Paren,
    Comment,
}

/// Mutable state of one tokenizing run.
struct Machine<'src> {
    source: &'src str,
    expect_semicolon: bool,
    state: State,
    line: u32,
    column: u32,
    /// Offset, line, and column where the current token began.
    token_start: (usize, u32, u32),
    buffer: String,
    /// The previous character in a string was an unconsumed backslash.
    escaped: bool,
    /// Open brackets of the current paren token, or of a selector inside a
    /// keyword.
    brackets: Vec<ParenKind>,
    /// Inside a string literal nested in brackets.
    nested_string: bool,
    tokens: Vec<Token>,
    statements: Vec<Statement>,
    warnings: Vec<Warning>,
}

impl<'src> Machine<'src> {
    fn new(source: &'src str, line: u32, column: u32, expect_semicolon: bool) -> Self {
        Self {
            source,
            expect_semicolon,
            state: State::Seeking,
            line,
            column,
            token_start: (0, line, column),
            buffer: String::new(),
            escaped: false,
            brackets: Vec::new(),
            nested_string: false,
            tokens: Vec::new(),
            statements: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(Vec<Statement>, Vec<Warning>)> {
        let chars: Vec<(usize, char)> = self.source.char_indices().collect();
        let mut i = 0;
        while let Some(&(offset, c)) = chars.get(i) {
            let next = chars.get(i + 1).map(|&(_, n)| n);
            let consumed = self.step(offset, c, next)?;
            for &(_, passed) in chars.iter().skip(i).take(consumed) {
                self.advance(passed);
            }
            i += consumed;
        }
        self.finish()?;
        Ok((self.statements, self.warnings))
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn here(&self) -> SourceLocation {
        SourceLocation::new("", self.line, self.column)
    }

    fn token_location(&self) -> SourceLocation {
        SourceLocation::new("", self.token_start.1, self.token_start.2)
    }

    /// Processes one character (two for `//`, `&&`, `||`) and returns how
    /// many were consumed.
    fn step(&mut self, offset: usize, c: char, next: Option<char>) -> Result<usize> {
        match self.state {
            State::Comment => {
                if c == '\n' {
                    self.state = State::Seeking;
                }
                Ok(1)
            }
            State::String => self.step_string(offset, c),
            State::Paren => self.step_paren(offset, c),
            State::Keyword => self.step_keyword(offset, c, next),
            State::Seeking => self.step_seeking(offset, c, next),
        }
    }

    fn step_seeking(&mut self, offset: usize, c: char, next: Option<char>) -> Result<usize> {
        if c.is_whitespace() {
            return Ok(1);
        }
        if c == '#' && self.column == 1 {
            self.state = State::Comment;
            return Ok(1);
        }
        if c == '/' && next == Some('/') {
            self.state = State::Comment;
            return Ok(2);
        }
        match c {
            ';' => {
                self.end_statement();
                Ok(1)
            }
            '"' => {
                self.begin(offset, c);
                self.state = State::String;
                Ok(1)
            }
            ',' => {
                self.push_comma(offset);
                Ok(1)
            }
            '&' | '|' if next == Some(c) => {
                self.push_logic_operator(offset, c);
                Ok(2)
            }
            '(' | '{' | '[' => {
                self.begin_paren(offset, c);
                Ok(1)
            }
            ')' | '}' | ']' => Err(Error::syntax(format!("unexpected '{c}'")).with_location(self.here())),
            _ => {
                self.begin(offset, c);
                self.state = State::Keyword;
                Ok(1)
            }
        }
    }

    fn step_keyword(&mut self, offset: usize, c: char, next: Option<char>) -> Result<usize> {
        if !self.brackets.is_empty() {
            // Inside a selector such as `@a[tag=x, distance=..5]`.
            self.step_nested(c)?;
            return Ok(1);
        }
        if c.is_whitespace() {
            self.finish_keyword(offset);
            return Ok(1);
        }
        match c {
            ';' => {
                self.finish_keyword(offset);
                self.end_statement();
                Ok(1)
            }
            '(' | '{' => {
                self.finish_keyword(offset);
                self.begin_paren(offset, c);
                Ok(1)
            }
            '[' => {
                self.buffer.push(c);
                self.brackets.push(ParenKind::Square);
                Ok(1)
            }
            '"' => {
                self.finish_keyword(offset);
                self.begin(offset, c);
                self.state = State::String;
                Ok(1)
            }
            ',' => {
                self.finish_keyword(offset);
                self.push_comma(offset);
                Ok(1)
            }
            '/' if next == Some('/') => {
                self.finish_keyword(offset);
                self.state = State::Comment;
                Ok(2)
            }
            '&' | '|' if next == Some(c) => {
                self.finish_keyword(offset);
                self.push_logic_operator(offset, c);
                Ok(2)
            }
            ')' | '}' | ']' => Err(Error::syntax(format!("unexpected '{c}'")).with_location(self.here())),
            _ => {
                self.buffer.push(c);
                Ok(1)
            }
        }
    }

    fn step_string(&mut self, offset: usize, c: char) -> Result<usize> {
        if self.escaped {
            self.escaped = false;
            self.buffer.push(c);
            return Ok(1);
        }
        match c {
            '\\' => {
                self.escaped = true;
                self.buffer.push(c);
            }
            '\n' => {
                return Err(Error::syntax("string literal contains a line break")
                    .with_location(self.token_location()));
            }
            '"' => {
                self.buffer.push(c);
                let raw = mem::take(&mut self.buffer);
                let value = unescape(&raw[1..raw.len() - 1]);
                let token = Token::new(
                    TokenKind::String(value),
                    self.span_to(offset + c.len_utf8()),
                    raw,
                );
                self.tokens.push(token);
                self.state = State::Seeking;
            }
            _ => self.buffer.push(c),
        }
        Ok(1)
    }

    fn step_paren(&mut self, offset: usize, c: char) -> Result<usize> {
        if self.step_nested(c)? {
            let kind = ParenKind::from_open(self.buffer.chars().next().unwrap_or('('))
                .unwrap_or(ParenKind::Round);
            let text = mem::take(&mut self.buffer);
            let token = Token::new(TokenKind::Paren(kind), self.span_to(offset + c.len_utf8()), text);
            self.tokens.push(token);
            self.state = State::Seeking;
            if kind == ParenKind::Curly && self.expect_semicolon && self.opens_block() {
                self.end_statement();
            }
        }
        Ok(1)
    }

    /// Advances through bracketed text. Returns true when the outermost
    /// bracket closes.
    fn step_nested(&mut self, c: char) -> Result<bool> {
        self.buffer.push(c);
        if self.nested_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.nested_string = false;
            } else if c == '\n' {
                return Err(Error::syntax("string literal contains a line break")
                    .with_location(self.here()));
            }
            return Ok(false);
        }
        match c {
            '"' => self.nested_string = true,
            '(' => self.brackets.push(ParenKind::Round),
            '{' => self.brackets.push(ParenKind::Curly),
            '[' => self.brackets.push(ParenKind::Square),
            ')' | '}' | ']' => {
                let Some(open) = self.brackets.pop() else {
                    return Err(Error::syntax(format!("unexpected '{c}'")).with_location(self.here()));
                };
                if open.close() != c {
                    return Err(Error::syntax(format!(
                        "mismatched bracket: expected '{}', found '{c}'",
                        open.close()
                    ))
                    .with_location(self.here()));
                }
                return Ok(self.brackets.is_empty());
            }
            _ => {}
        }
        Ok(false)
    }

    /// A curly brace closes a block statement (`if`, `function`, ...) but
    /// not NBT data in a vanilla command.
    fn opens_block(&self) -> bool {
        let is_block = |token: &Token| token.as_keyword().is_some_and(|k| BLOCK_KEYWORDS.contains(&k));
        match self.tokens.first() {
            Some(first) if first.is_keyword("case") => self.tokens.iter().skip(1).any(is_block),
            Some(first) => is_block(first),
            None => false,
        }
    }

    fn begin(&mut self, offset: usize, c: char) {
        self.token_start = (offset, self.line, self.column);
        self.buffer.clear();
        self.buffer.push(c);
    }

    fn begin_paren(&mut self, offset: usize, c: char) {
        self.begin(offset, c);
        self.brackets.clear();
        if let Some(kind) = ParenKind::from_open(c) {
            self.brackets.push(kind);
        }
        self.state = State::Paren;
    }

    fn span_to(&self, end: usize) -> Span {
        Span::new(self.token_start.0, end, self.token_start.1, self.token_start.2)
    }

    fn finish_keyword(&mut self, end: usize) {
        let text = mem::take(&mut self.buffer);
        let token = Token::keyword(text, self.span_to(end));
        self.tokens.push(token);
        self.state = State::Seeking;
    }

    fn push_comma(&mut self, offset: usize) {
        let span = Span::new(offset, offset + 1, self.line, self.column);
        self.tokens.push(Token::new(TokenKind::Comma, span, ","));
    }

    fn push_logic_operator(&mut self, offset: usize, c: char) {
        let span = Span::new(offset, offset + 2, self.line, self.column);
        self.tokens.push(Token::keyword(format!("{c}{c}"), span));
    }

    fn end_statement(&mut self) {
        if self.tokens.is_empty() {
            self.warnings.push(
                Warning::new("empty statement (redundant ';')").with_location(self.here()),
            );
            return;
        }
        let tokens = mem::take(&mut self.tokens);
        self.statements.push(Statement::new(tokens));
    }

    fn finish(&mut self) -> Result<()> {
        match self.state {
            State::String => {
                return Err(Error::syntax("unterminated string literal")
                    .with_location(self.token_location()));
            }
            State::Paren => {
                let open = self.buffer.chars().next().unwrap_or('(');
                return Err(Error::syntax(format!("'{open}' is never closed"))
                    .with_location(self.token_location()));
            }
            State::Keyword => {
                if !self.brackets.is_empty() {
                    return Err(Error::syntax("'[' is never closed")
                        .with_location(self.token_location()));
                }
                self.finish_keyword(self.source.len());
            }
            State::Seeking | State::Comment => {}
        }

        if self.tokens.is_empty() {
            return Ok(());
        }
        if self.expect_semicolon {
            let location = self
                .tokens
                .last()
                .map_or_else(|| self.here(), missing_semicolon_location);
            return Err(Error::syntax("expected ';' at end of statement").with_location(location));
        }
        let tokens = mem::take(&mut self.tokens);
        self.statements.push(Statement::new(tokens));
        Ok(())
    }
}

/// Position just past the last token of an unterminated statement.
fn missing_semicolon_location(last: &Token) -> SourceLocation {
    if last.text.contains('\n') {
        last.span.location()
    } else {
        let column = last.col() + u32::try_from(last.length()).unwrap_or(0);
        SourceLocation::new("", last.line(), column)
    }
}

/// Resolves escape sequences in the body of a string literal.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
