//! `Player.onEvent`.
//!
//! The handler runs from the tick function as every player whose event
//! objective is positive, then resets that player's score so it fires once
//! per occurrence.

use quill_foundation::{Command, Result};

use super::Bound;
use crate::compiler::Compiler;
use crate::feature::ON_EVENT;

impl Compiler {
    pub(super) fn player_on_event(&mut self, args: &Bound) -> Result<()> {
        let objective = args.text("objective")?.to_string();
        let criteria = args.text("criteria")?.to_string();
        let handler = args.arrow("handler")?.clone();

        self.pack.declare_objective(&objective, &criteria);
        let mut body = self.compile_body(&handler)?;
        body.push(Command::new(format!("scoreboard players reset @s {objective}")));
        let path = self.pack.private_mut().insert_next(ON_EVENT, body)?;
        log::debug!("allocated {path} for '{objective}' events");

        let hook = format!(
            "execute as @a[scores={{{objective}=1..}}] at @s run {}",
            self.call(&path)
        );
        self.pack.tick_function_mut().push(Command::new(hook));
        Ok(())
    }
}
