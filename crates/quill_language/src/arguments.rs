//! Argument lists of built-in calls.
//!
//! `Math.random(min=1, max=$top)` or `Player.onEvent(jumps, () => { ... })`:
//! the round bracket group is re-tokenized and split on top-level commas
//! into positional and keyword arguments.

use quill_foundation::{Error, Result, SourceLocation};

use crate::token::{ParenKind, Token, TokenKind, join_raw, join_tokens};
use crate::tokenizer::tokenize_inner;

/// A single argument value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    /// Ordinary tokens between commas.
    Tokens(Vec<Token>),
    /// `() => { ... }`; holds the curly body token.
    Arrow(Token),
}

impl Argument {
    /// The argument's tokens. An arrow function yields its body token.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        match self {
            Self::Tokens(tokens) => tokens,
            Self::Arrow(body) => std::slice::from_ref(body),
        }
    }

    /// Rebuilt command text (strings unquoted).
    #[must_use]
    pub fn text(&self) -> String {
        join_tokens(self.tokens())
    }

    /// Rebuilt raw text (strings keep their quotes).
    #[must_use]
    pub fn raw(&self) -> String {
        join_raw(self.tokens())
    }

    /// Integer value of a single-token argument.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self.tokens() {
            [token] => token.as_int(),
            _ => None,
        }
    }

    /// Unescaped value of a single string-literal argument.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self.tokens() {
            [token] if matches!(token.kind, TokenKind::String(_)) => Some(token.value()),
            _ => None,
        }
    }

    /// Body token of an arrow function.
    #[must_use]
    pub const fn as_arrow(&self) -> Option<&Token> {
        match self {
            Self::Arrow(body) => Some(body),
            Self::Tokens(_) => None,
        }
    }

    /// Short description used in signature mismatch messages.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Arrow(_) => "arrow function",
            Self::Tokens(tokens) => match tokens.as_slice() {
                [token] if token.as_int().is_some() => "integer",
                [token] => token.kind.name(),
                _ => "expression",
            },
        }
    }

    /// Location of the first token.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        self.tokens()
            .first()
            .map_or_else(|| SourceLocation::new("", 0, 0), |t| t.span.location())
    }
}

/// Parsed argument list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arguments {
    positional: Vec<Argument>,
    keyword: Vec<(String, Argument)>,
    location: SourceLocation,
}

impl Arguments {
    /// Positional arguments in order.
    #[must_use]
    pub fn positional(&self) -> &[Argument] {
        &self.positional
    }

    /// Looks up a keyword argument.
    #[must_use]
    pub fn keyword(&self, name: &str) -> Option<&Argument> {
        self.keyword
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Keyword arguments in source order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &Argument)> {
        self.keyword.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Total number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Location of the opening bracket.
    #[must_use]
    pub const fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/// Parses the argument list held by a round bracket token.
///
/// # Errors
/// Returns a syntax error for a positional argument after a keyword
/// argument, a duplicate keyword, an empty argument, or a `;` inside the
/// list.
pub fn parse_arguments(paren: &Token) -> Result<Arguments> {
    if !paren.is_paren(ParenKind::Round) {
        return Err(Error::syntax(format!("expected '(', found '{}'", paren.text))
            .with_location(paren.span.location()));
    }
    let mut statements = tokenize_inner(paren, false)?;
    if statements.len() > 1 {
        let location = statements[1]
            .first()
            .map_or_else(|| paren.span.location(), |t| t.span.location());
        return Err(Error::syntax("unexpected ';' in argument list").with_location(location));
    }

    let mut arguments = Arguments {
        positional: Vec::new(),
        keyword: Vec::new(),
        location: paren.span.location(),
    };
    let Some(statement) = statements.pop() else {
        return Ok(arguments);
    };

    let tokens = statement.into_tokens();
    let mut segments: Vec<Vec<Token>> = vec![Vec::new()];
    let mut commas: Vec<SourceLocation> = Vec::new();
    for token in tokens {
        if token.kind == TokenKind::Comma {
            commas.push(token.span.location());
            segments.push(Vec::new());
        } else if let Some(last) = segments.last_mut() {
            last.push(token);
        }
    }

    for (index, segment) in segments.into_iter().enumerate() {
        if segment.is_empty() {
            let location = commas
                .get(index)
                .or_else(|| commas.last())
                .cloned()
                .unwrap_or_else(|| paren.span.location());
            return Err(Error::syntax("empty argument").with_location(location));
        }
        let location = segment[0].span.location();
        match split_keyword(segment)? {
            (Some(name), value) => {
                if arguments.keyword(&name).is_some() {
                    return Err(Error::syntax(format!("duplicate keyword argument '{name}'"))
                        .with_location(location));
                }
                arguments.keyword.push((name, value));
            }
            (None, value) => {
                if !arguments.keyword.is_empty() {
                    return Err(Error::syntax("positional argument follows keyword argument")
                        .with_location(location));
                }
                arguments.positional.push(value);
            }
        }
    }
    Ok(arguments)
}

/// Separates `key=value` into its name and value.
fn split_keyword(mut segment: Vec<Token>) -> Result<(Option<String>, Argument)> {
    let location = segment[0].span.location();
    let first = &segment[0];

    let mut name = None;
    if let Some(text) = first.as_keyword() {
        if let Some(eq) = text.find('=') {
            let rest = &text[eq + 1..];
            let key = &text[..eq];
            if is_identifier(key) && !rest.starts_with('=') && !rest.starts_with('>') {
                name = Some(key.to_string());
                let tail = first.split_at(eq + 1).map(|(_, tail)| tail);
                segment.remove(0);
                if let Some(tail) = tail {
                    segment.insert(0, tail);
                }
            }
        } else if is_identifier(text) {
            let assigns = segment
                .get(1)
                .and_then(Token::as_keyword)
                .is_some_and(|op| op.starts_with('=') && !op.starts_with("==") && !op.starts_with("=>"));
            if assigns {
                name = Some(text.to_string());
                let tail = segment[1].split_at(1).map(|(_, tail)| tail);
                segment.drain(..2);
                if let Some(tail) = tail {
                    segment.insert(0, tail);
                }
            }
        }
    }

    if segment.is_empty() {
        return Err(Error::syntax("empty argument").with_location(location));
    }
    Ok((name, classify(segment)))
}

fn classify(mut tokens: Vec<Token>) -> Argument {
    let is_arrow = tokens.len() == 3
        && tokens[0].is_paren(ParenKind::Round)
        && tokens[0].inner().is_some_and(|inner| inner.trim().is_empty())
        && tokens[1].is_keyword("=>")
        && tokens[2].is_paren(ParenKind::Curly);
    match tokens.pop() {
        Some(body) if is_arrow => Argument::Arrow(body),
        Some(last) => {
            tokens.push(last);
            Argument::Tokens(tokens)
        }
        None => Argument::Tokens(tokens),
    }
}

/// Identifier: ASCII letters, digits and underscores, not starting with a
/// digit.
#[must_use]
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn parse(source: &str) -> Result<Arguments> {
        let statements = tokenize(source, 1, 1, false).unwrap();
        let paren = statements[0].tokens()[0].clone();
        parse_arguments(&paren)
    }

    #[test]
    fn positional_and_keyword() {
        let args = parse("(@a, min=1, max = 10)").unwrap();
        assert_eq!(args.positional().len(), 1);
        assert_eq!(args.positional()[0].text(), "@a");
        assert_eq!(args.keyword("min").and_then(Argument::as_int), Some(1));
        assert_eq!(args.keyword("max").and_then(Argument::as_int), Some(10));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn keyword_with_string_value() {
        let args = parse(r#"(message="hello world")"#).unwrap();
        assert_eq!(args.keyword("message").and_then(Argument::as_string), Some("hello world"));
    }

    #[test]
    fn selector_is_positional() {
        let args = parse("(@a[tag=x], 3)").unwrap();
        assert_eq!(args.positional()[0].text(), "@a[tag=x]");
        assert_eq!(args.positional()[1].as_int(), Some(3));
    }

    #[test]
    fn comparison_is_not_keyword() {
        let args = parse("(a==b)").unwrap();
        assert_eq!(args.positional().len(), 1);
    }

    #[test]
    fn arrow_function() {
        let args = parse("(jumps, () => { say hop; })").unwrap();
        let body = args.positional()[1].as_arrow().unwrap();
        assert_eq!(body.inner(), Some(" say hop; "));
        assert_eq!(args.positional()[1].describe(), "arrow function");
    }

    #[test]
    fn empty_list() {
        assert!(parse("()").unwrap().is_empty());
    }

    #[test]
    fn positional_after_keyword_is_error() {
        let err = parse("(min=1, 5)").unwrap_err();
        assert!(err.is_syntax());
        assert_eq!(err.location.unwrap().column, 9);
    }

    #[test]
    fn duplicate_keyword_is_error() {
        assert!(parse("(min=1, min=2)").unwrap_err().is_syntax());
    }

    #[test]
    fn empty_argument_is_error() {
        assert!(parse("(a,,b)").is_err());
        assert!(parse("(a,)").is_err());
        assert!(parse("(min=)").is_err());
    }

    #[test]
    fn semicolon_is_error() {
        assert!(parse("(a; b)").is_err());
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("min"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("@a[tag"));
        assert!(!is_identifier(""));
    }
}
