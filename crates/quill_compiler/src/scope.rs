//! Variable renaming for `for` loops.
//!
//! `for (let $i = 0; ...)` binds `$i` to a holder private to that loop so
//! nested or sibling loops do not share a counter.

use quill_language::VariableScope;

/// Stack of variable renamings, innermost last.
#[derive(Clone, Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Vec<(String, String)>>,
}

impl ScopeStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope.
    pub fn push(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Closes the innermost scope.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Binds `name` to `holder` in the innermost scope. Does nothing when
    /// no scope is open.
    pub fn bind(&mut self, name: impl Into<String>, holder: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push((name.into(), holder.into()));
        }
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl VariableScope for ScopeStack {
    fn resolve(&self, name: &str) -> Option<String> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(bound, _)| bound == name)
            .map(|(_, holder)| holder.clone())
    }
}
