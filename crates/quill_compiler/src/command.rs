//! Statement classification.
//!
//! Every statement is routed by its first token. Reserved words map to a
//! fixed [`CommandKind`]; the remaining statements are variable operations,
//! built-in calls, user function calls, or vanilla commands.

use quill_language::{ParenKind, Statement};

use crate::builtins::Builtin;
use crate::variable::is_variable_head;

/// What a statement is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// `function name() { ... }`
    Function,
    /// `class name { ... }`
    Class,
    /// `import "path";`
    Import,
    /// `new kind(path) { json }`
    New,
    /// `if (cond) { ... }`
    If,
    /// `else { ... }` / `else if (cond) { ... }`
    Else,
    /// `while (cond) { ... }`, or the tail of a `do` block
    While,
    /// `do { ... }`
    Do,
    /// `for (init; cond; step) { ... }`
    For,
    /// `switch (score) { case ...: ... }`
    Switch,
    /// `case N:` outside a switch body
    Case,
    /// `break;` outside a switch body
    Break,
    /// `$v = ...`, `$v++`, `obj:@s += 1`, ...
    Variable,
    /// `Math.random(...)` and friends
    Builtin(Builtin),
    /// `name();`
    Call,
    /// Anything else
    Vanilla,
}

impl CommandKind {
    /// Looks up a reserved word.
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        let kind = match word {
            "function" => Self::Function,
            "class" => Self::Class,
            "import" => Self::Import,
            "new" => Self::New,
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "do" => Self::Do,
            "for" => Self::For,
            "switch" => Self::Switch,
            "case" => Self::Case,
            "break" => Self::Break,
            "let" => Self::Variable,
            _ => return None,
        };
        Some(kind)
    }

    /// Classifies a statement.
    #[must_use]
    pub fn classify(statement: &Statement) -> Self {
        let Some(word) = statement.keyword() else {
            return Self::Vanilla;
        };
        if let Some(kind) = Self::lookup(word) {
            return kind;
        }
        if is_variable_head(word) {
            return Self::Variable;
        }
        if is_call_shape(statement) {
            return match Builtin::lookup(word) {
                Some(builtin) => Self::Builtin(builtin),
                None => Self::Call,
            };
        }
        Self::Vanilla
    }
}

/// `name(...)` with the bracket written directly after a dotted name.
fn is_call_shape(statement: &Statement) -> bool {
    match statement.tokens() {
        [name, paren] => {
            paren.is_paren(ParenKind::Round)
                && name.is_adjacent_to(paren)
                && name.as_keyword().is_some_and(is_function_name)
        }
        _ => false,
    }
}

/// Dotted identifier such as `utils.reset` or `Math.sqrt`.
#[must_use]
pub fn is_function_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/'))
}
