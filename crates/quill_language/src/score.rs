//! Score references.
//!
//! `$name` names a holder in the `__variable__` objective;
//! `objective:target` names any objective with a selector or fake-player
//! target.

use std::fmt;

use quill_foundation::{Error, Result, VAR_OBJECTIVE};

/// Renames `$` variables, e.g. the loop variable of a `for` header.
pub trait VariableScope {
    /// Returns the holder that `name` (including its `$`) refers to, or
    /// `None` to keep the name as written.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Scope that renames nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoScope;

impl VariableScope for NoScope {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// A scoreboard holder within an objective.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScoreRef {
    /// Score holder: `$name`, a selector, or a fake player.
    pub holder: String,
    /// Objective name.
    pub objective: String,
}

impl ScoreRef {
    /// Creates a score reference.
    #[must_use]
    pub fn new(holder: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            holder: holder.into(),
            objective: objective.into(),
        }
    }

    /// A holder in the variable objective.
    #[must_use]
    pub fn variable(holder: impl Into<String>) -> Self {
        Self::new(holder, VAR_OBJECTIVE)
    }

    /// Parses `$name` or `objective:target`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(name) = text.strip_prefix('$') {
            return is_variable_name(name).then(|| Self::variable(text));
        }
        let (objective, target) = text.split_once(':')?;
        let valid_objective = !objective.is_empty()
            && objective
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '+'));
        let valid_target = (target.starts_with('@') || target.starts_with('$'))
            && !target.contains(char::is_whitespace);
        (valid_objective && valid_target).then(|| Self::new(target, objective))
    }

    /// Parses and applies a variable scope.
    #[must_use]
    pub fn parse_in(text: &str, scope: &(impl VariableScope + ?Sized)) -> Option<Self> {
        Self::parse(text).map(|score| score.resolve_in(scope))
    }

    /// Renames the holder if it is a `$` variable known to `scope`.
    #[must_use]
    pub fn resolve_in(mut self, scope: &(impl VariableScope + ?Sized)) -> Self {
        if self.is_variable() {
            if let Some(renamed) = scope.resolve(&self.holder) {
                self.holder = renamed;
            }
        }
        self
    }

    /// Returns true for a `$name` holder in the variable objective.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        self.objective == VAR_OBJECTIVE && self.holder.starts_with('$')
    }
}

impl fmt::Display for ScoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.holder, self.objective)
    }
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'))
}

/// Returns true if `text` is an integer range such as `1..5`, `..3`, `2..`.
#[must_use]
pub fn is_range(text: &str) -> bool {
    let Some((low, high)) = text.split_once("..") else {
        return false;
    };
    (!low.is_empty() || !high.is_empty())
        && (low.is_empty() || low.parse::<i32>().is_ok())
        && (high.is_empty() || high.parse::<i32>().is_ok())
}

/// Returns true if `text` is written as an integer: ASCII digits with an
/// optional leading `-`.
#[must_use]
pub fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a score value. Scores are 32-bit signed integers.
///
/// Returns `Ok(None)` when `text` is not an integer literal.
///
/// # Errors
/// Returns an unlocated syntax error for an integer that does not fit.
pub fn parse_score_value(text: &str) -> Result<Option<i32>> {
    if !is_integer(text) {
        return Ok(None);
    }
    text.parse::<i32>().map(Some).map_err(|_| {
        Error::syntax(format!(
            "integer {text} is out of range for a score ({}..{})",
            i32::MIN,
            i32::MAX
        ))
    })
}
