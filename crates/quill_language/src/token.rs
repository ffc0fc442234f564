//! Token and statement types for Quill source.
//!
//! Tokens are the output of the tokenizer. Bracket groups are kept as raw,
//! unexpanded text; whoever consumes one re-tokenizes its interior.

use std::cell::OnceCell;
use std::fmt;

use quill_foundation::Result;

use crate::score::parse_score_value;
use crate::span::Span;

/// Which bracket pair a parenthesis token is wrapped in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParenKind {
    /// `( ... )`
    Round,
    /// `{ ... }`
    Curly,
    /// `[ ... ]`
    Square,
}

impl ParenKind {
    /// Returns the kind opened by `c`, if `c` is an opening bracket.
    #[must_use]
    pub const fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::Round),
            '{' => Some(Self::Curly),
            '[' => Some(Self::Square),
            _ => None,
        }
    }

    /// Returns the opening character.
    #[must_use]
    pub const fn open(self) -> char {
        match self {
            Self::Round => '(',
            Self::Curly => '{',
            Self::Square => '[',
        }
    }

    /// Returns the closing character.
    #[must_use]
    pub const fn close(self) -> char {
        match self {
            Self::Round => ')',
            Self::Curly => '}',
            Self::Square => ']',
        }
    }
}

/// Token types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Keyword, identifier, number, operator, selector: any bare word.
    Keyword,
    /// String literal; holds the unescaped value.
    String(String),
    /// Bracket group; `text` holds the raw source including both brackets.
    Paren(ParenKind),
    /// `,`
    Comma,
    /// Comment text. Never emitted into statements.
    Comment,
}

impl TokenKind {
    /// Returns true if this token kind is discarded by the tokenizer.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment)
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::String(_) => "string",
            Self::Paren(ParenKind::Round) => "'(...)'",
            Self::Paren(ParenKind::Curly) => "'{...}'",
            Self::Paren(ParenKind::Square) => "'[...]'",
            Self::Comma => "','",
            Self::Comment => "comment",
        }
    }
}

/// A token from lexical analysis.
#[derive(Clone, Debug)]
pub struct Token {
    /// The type of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
    /// Raw source text of this token.
    pub text: String,
    /// Character count of `text`, computed on first use.
    length: OnceCell<usize>,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.span == other.span && self.text == other.text
    }
}

impl Eq for Token {}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            length: OnceCell::new(),
        }
    }

    /// Creates a keyword token.
    #[must_use]
    pub fn keyword(text: impl Into<String>, span: Span) -> Self {
        Self::new(TokenKind::Keyword, span, text)
    }

    /// 1-based line of the first character.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.span.line
    }

    /// 1-based column of the first character.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.span.column
    }

    /// Number of characters in the raw text.
    #[must_use]
    pub fn length(&self) -> usize {
        *self.length.get_or_init(|| self.text.chars().count())
    }

    /// Returns true if this is a keyword token with exactly `word` as text.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }

    /// Returns the keyword text, if this is a keyword token.
    #[must_use]
    pub fn as_keyword(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Keyword => Some(&self.text),
            _ => None,
        }
    }

    /// Returns true if this is a bracket group of the given kind.
    #[must_use]
    pub fn is_paren(&self, kind: ParenKind) -> bool {
        self.kind == TokenKind::Paren(kind)
    }

    /// Returns the text between the brackets of a bracket group.
    #[must_use]
    pub fn inner(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Paren(_) => {
                let mut chars = self.text.char_indices();
                let start = chars.next().map(|(i, c)| i + c.len_utf8())?;
                let end = chars.next_back().map(|(i, _)| i)?;
                self.text.get(start..end.max(start))
            }
            _ => None,
        }
    }

    /// Line and column where the interior of a bracket group begins.
    #[must_use]
    pub const fn inner_start(&self) -> (u32, u32) {
        (self.span.line, self.span.column + 1)
    }

    /// The literal value: unescaped contents for strings, raw text otherwise.
    #[must_use]
    pub fn value(&self) -> &str {
        match &self.kind {
            TokenKind::String(value) => value,
            _ => &self.text,
        }
    }

    /// Returns true if `next` was written directly after this token with
    /// no whitespace in between.
    #[must_use]
    pub fn is_adjacent_to(&self, next: &Self) -> bool {
        self.span.touches(&next.span)
    }

    /// Parses the token as an integer literal that fits in a score.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.as_score_value().ok().flatten().map(i64::from)
    }

    /// Parses the token as a score value.
    ///
    /// Returns `Ok(None)` for tokens that are not integer literals.
    ///
    /// # Errors
    /// Returns a syntax error at this token for an integer outside the
    /// 32-bit score range.
    pub fn as_score_value(&self) -> Result<Option<i32>> {
        match self.kind {
            TokenKind::Keyword => {
                parse_score_value(&self.text).map_err(|err| err.with_location(self.span.location()))
            }
            _ => Ok(None),
        }
    }

    /// Splits a keyword token at byte offset `at` into two keyword tokens
    /// with correct spans. Returns `None` for other kinds or an offset that
    /// would leave either half empty.
    #[must_use]
    pub fn split_at(&self, at: usize) -> Option<(Self, Self)> {
        if self.kind != TokenKind::Keyword
            || at == 0
            || at >= self.text.len()
            || !self.text.is_char_boundary(at)
        {
            return None;
        }
        let (head, tail) = self.text.split_at(at);
        let head_columns = u32::try_from(head.chars().count()).ok()?;
        let split = self.span.start + at;
        let left = Self::keyword(head, Span::new(self.span.start, split, self.span.line, self.span.column));
        let right = Self::keyword(
            tail,
            Span::new(split, self.span.end, self.span.line, self.span.column + head_columns),
        );
        Some((left, right))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An ordered run of tokens ended by a statement boundary.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Statement {
    tokens: Vec<Token>,
}

impl Statement {
    /// Creates a statement from tokens.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Returns the tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Consumes the statement, returning its tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Returns the first token.
    #[must_use]
    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    /// Returns the last token.
    #[must_use]
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Returns the token at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Returns the dispatch keyword (first token, if it is a keyword).
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.first().and_then(Token::as_keyword)
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the statement has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Span from the first to the last token.
    #[must_use]
    pub fn span(&self) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::at_start(),
        }
    }
}

/// Rebuilds command text from tokens: a single space between tokens except
/// where they were written adjacent in the source. String tokens contribute
/// their literal value.
#[must_use]
pub fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if let Some(prev) = previous {
            if !prev.is_adjacent_to(token) {
                out.push(' ');
            }
        }
        out.push_str(&token.value().replace('\n', "\\n"));
        previous = Some(token);
    }
    out
}

/// Like [`join_tokens`] but keeps string tokens quoted, for text that is
/// re-tokenized or embedded in a larger expression.
#[must_use]
pub fn join_raw(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if let Some(prev) = previous {
            if !prev.is_adjacent_to(token) {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        previous = Some(token);
    }
    out
}
