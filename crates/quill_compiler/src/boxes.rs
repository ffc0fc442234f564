//! Constructs that span several statements.
//!
//! An `if` may be continued by `else` statements and a `do` body must be
//! followed by `while (cond);`. The pieces are parked here until the next
//! statement shows whether the construct continues.

use quill_foundation::{Command, SourceLocation};
use quill_language::RenderedCondition;

/// One arm of an if/else chain.
#[derive(Clone, Debug)]
pub struct Branch {
    /// `None` for a final `else`.
    pub condition: Option<RenderedCondition>,
    /// Compiled body.
    pub body: Vec<Command>,
}

/// An `if` and the `else` arms seen so far.
#[derive(Clone, Debug, Default)]
pub struct IfElseChain {
    /// Arms in source order.
    pub branches: Vec<Branch>,
}

impl IfElseChain {
    /// Starts a chain with its `if` arm.
    #[must_use]
    pub fn new(condition: RenderedCondition, body: Vec<Command>) -> Self {
        Self {
            branches: vec![Branch {
                condition: Some(condition),
                body,
            }],
        }
    }

    /// Returns true once a final `else` has been added.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.branches.last().is_some_and(|b| b.condition.is_none())
    }
}

/// A `do` body waiting for its `while`.
#[derive(Clone, Debug)]
pub struct PendingDo {
    /// Compiled body.
    pub body: Vec<Command>,
    /// Where the `do` keyword was written.
    pub location: SourceLocation,
    /// Registry id reserved for the loop function.
    pub id: u32,
}

/// Open multi-statement constructs of one body.
#[derive(Debug, Default)]
pub struct BlockBoxes {
    /// Pending if/else chain.
    pub if_else: Option<IfElseChain>,
    /// Pending do/while.
    pub do_while: Option<PendingDo>,
}
