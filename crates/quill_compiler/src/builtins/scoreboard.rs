//! `Scoreboard.add`.

use quill_foundation::Result;

use super::Bound;
use crate::compiler::Compiler;

impl Compiler {
    pub(super) fn scoreboard_add(&mut self, args: &Bound) -> Result<()> {
        let objective = args.text("objective")?;
        let criteria = args.text("criteria")?;
        if !self.pack.declare_objective(objective, criteria) {
            self.warn(
                format!("objective '{objective}' is already declared"),
                args.location("objective"),
            );
        }
        Ok(())
    }
}
