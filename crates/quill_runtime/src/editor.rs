//! Line editor abstraction for the REPL.
//!
//! The REPL reads through the [`LineEditor`] trait so tests can drive it
//! with scripted input while the binary uses rustyline.

use std::borrow::Cow;

use quill_compiler::Builtin;
use quill_foundation::{Error, ErrorKind, Result};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter as RLHinter, Validator as RLValidator};

use crate::highlight::QuillHighlighter;

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);

    /// Set available completions for keywords.
    fn set_keywords(&mut self, keywords: Vec<String>);
}

/// Keywords, REPL commands, and built-in names offered for completion.
#[must_use]
pub fn default_keywords() -> Vec<String> {
    let words = [
        "if", "else", "while", "do", "for", "switch", "case", "break", "function", "let",
        "import", "class", "new", "execute", "say", "tellraw", "scoreboard", "compile", "config",
        "help", "exit",
    ];
    words
        .into_iter()
        .map(String::from)
        .chain(Builtin::ALL.iter().map(|b| b.name().to_string()))
        .collect()
}

#[derive(Helper, Completer, RLHinter, RLValidator)]
struct QuillHelper {
    #[rustyline(Completer)]
    completer: QuillCompleter,
    #[rustyline(Hinter)]
    hinter: SignatureHinter,
    #[rustyline(Validator)]
    validator: BracketValidator,
    highlighter: QuillHighlighter,
}

impl Highlighter for QuillHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

struct QuillCompleter {
    file_completer: FilenameCompleter,
    keywords: Vec<String>,
}

impl QuillCompleter {
    fn new() -> Self {
        Self {
            file_completer: FilenameCompleter::new(),
            keywords: default_keywords(),
        }
    }
}

impl Completer for QuillCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Inside a string: `import "..."` or `compile "..."`
        if line[..pos].chars().filter(|&c| c == '"').count() % 2 == 1 {
            return self.file_completer.complete(line, pos, ctx);
        }

        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace() || "()[]{};".contains(c))
            .map_or(0, |i| i + 1);
        let word = &line[start..pos];
        let candidates = self
            .keywords
            .iter()
            .filter(|kw| kw.starts_with(word))
            .map(|kw| Pair {
                display: kw.clone(),
                replacement: kw.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

/// The rest of a built-in's signature after its name or opening
/// parenthesis, e.g. `min=1, max=2147483647)` after `Math.random(`.
pub(crate) fn signature_hint(line: &str) -> Option<String> {
    let (head, open) = match line.strip_suffix('(') {
        Some(head) => (head, 1),
        None => (line, 0),
    };
    let word = head
        .rsplit(|c: char| !(c.is_alphanumeric() || c == '.' || c == '_'))
        .next()?;
    let builtin = Builtin::lookup(word)?;
    let signature = builtin.signature();
    Some(signature[builtin.name().len() + open..].to_string())
}

/// Shows a built-in's parameters while its call is being typed.
#[derive(Default)]
struct SignatureHinter;

impl Hinter for SignatureHinter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        signature_hint(line)
    }
}

/// Unclosed brackets outside strings and comments.
pub(crate) fn open_brackets(input: &str) -> i32 {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '/' if !in_string && chars.peek() == Some(&'/') => {
                // line comment
                while chars.next_if(|&n| n != '\n').is_some() {}
            }
            '(' | '[' | '{' if !in_string => depth += 1,
            ')' | ']' | '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Keeps reading while brackets are open.
#[derive(Default)]
struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if open_brackets(ctx.input()) > 0 {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<QuillHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(1000)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?
            .build();

        let helper = QuillHelper {
            completer: QuillCompleter::new(),
            hinter: SignatureHinter,
            validator: BracketValidator,
            highlighter: QuillHighlighter::new(),
        };

        let mut editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        editor.set_helper(Some(helper));

        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Internal(e.to_string()))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.keywords = keywords;
        }
    }
}
