//! Syntax highlighting for the REPL.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

use quill_compiler::Builtin;

const RESET: &str = "\x1b[0m";

const KEYWORDS: [&str; 13] = [
    "if", "else", "while", "do", "for", "switch", "case", "break", "function", "let", "import",
    "class", "new",
];

/// Highlighter for Quill source.
pub struct QuillHighlighter;

impl QuillHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self
    }

    /// Highlight a line of input.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let mut result = String::with_capacity(line.len() * 2);
        let mut chars = line.chars().peekable();
        let mut in_string = false;

        while let Some(c) = chars.next() {
            if in_string {
                result.push(c);
                match c {
                    '\\' => result.extend(chars.next()),
                    '"' => {
                        result.push_str(RESET);
                        in_string = false;
                    }
                    _ => {}
                }
                continue;
            }

            match c {
                '/' if chars.peek() == Some(&'/') => {
                    result.push_str("\x1b[2;3m"); // dim italic
                    result.push(c);
                    result.extend(chars.by_ref());
                    result.push_str(RESET);
                }
                '"' => {
                    result.push_str("\x1b[33m"); // yellow
                    result.push(c);
                    in_string = true;
                }
                '$' => {
                    result.push_str("\x1b[34m"); // blue
                    result.push(c);
                    take_word(&mut chars, &mut result, |n| n.is_alphanumeric() || n == '_');
                    result.push_str(RESET);
                }
                '@' => {
                    result.push_str("\x1b[36m"); // cyan
                    result.push(c);
                    take_word(&mut chars, &mut result, char::is_alphabetic);
                    result.push_str(RESET);
                }
                c if c.is_ascii_digit() => {
                    result.push_str("\x1b[35m"); // magenta
                    result.push(c);
                    take_word(&mut chars, &mut result, |n| n.is_ascii_digit() || n == '.');
                    result.push_str(RESET);
                }
                '(' | ')' | '[' | ']' | '{' | '}' => {
                    result.push_str("\x1b[1m");
                    result.push(c);
                    result.push_str(RESET);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let mut word = String::from(c);
                    take_word(&mut chars, &mut word, |n| n.is_alphanumeric() || n == '_' || n == '.');
                    let color = if KEYWORDS.contains(&word.as_str()) {
                        "\x1b[32m"
                    } else if Builtin::lookup(&word).is_some() {
                        "\x1b[1;32m"
                    } else {
                        ""
                    };
                    if color.is_empty() {
                        result.push_str(&word);
                    } else {
                        result.push_str(color);
                        result.push_str(&word);
                        result.push_str(RESET);
                    }
                }
                _ => result.push(c),
            }
        }

        if in_string {
            result.push_str(RESET);
        }
        Cow::Owned(result)
    }
}

fn take_word(chars: &mut Peekable<Chars<'_>>, out: &mut String, accept: impl Fn(char) -> bool) {
    while let Some(next) = chars.next_if(|&n| accept(n)) {
        out.push(next);
    }
}

impl Default for QuillHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
