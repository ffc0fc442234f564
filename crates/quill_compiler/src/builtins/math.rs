//! `Math.sqrt` and `Math.random`.

use quill_foundation::{Command, Error, FunctionPath, INT_OBJECTIVE, Result, VAR_OBJECTIVE};
use quill_language::ScoreRef;

use super::{Bound, Value};
use crate::compiler::Compiler;
use crate::feature::MATH_SQRT;

const N: &str = "__math__.N";
const X: &str = "__math__.x";
const X_N: &str = "__math__.x_n";

fn op(lhs: &str, operator: &str, rhs: &str) -> Command {
    Command::new(format!(
        "scoreboard players operation {lhs} {VAR_OBJECTIVE} {operator} {rhs} {VAR_OBJECTIVE}"
    ))
}

impl Compiler {
    /// Integer square root by Newton's method, iterating from `N` downward
    /// until the estimate stops decreasing.
    pub(super) fn math_sqrt(&mut self, args: &Bound, target: &ScoreRef, out: &mut Vec<Command>) -> Result<()> {
        let main = FunctionPath::private(MATH_SQRT, "main");
        let newton = FunctionPath::private(MATH_SQRT, "newton_raphson");
        if !self.sqrt_emitted {
            self.pack.register_int(2);
            let main_body = vec![op(X_N, "=", X), Command::new(self.call(&newton))];
            let newton_body = vec![
                op(X, "=", N),
                op(X, "/=", X_N),
                op(X, "+=", X_N),
                Command::new(format!("scoreboard players operation {X} {VAR_OBJECTIVE} /= 2 {INT_OBJECTIVE}")),
                Command::new(format!(
                    "execute if score {X} {VAR_OBJECTIVE} < {X_N} {VAR_OBJECTIVE} run {}",
                    self.call(&main)
                )),
            ];
            self.pack.private_mut().insert(MATH_SQRT, "main", main_body)?;
            self.pack.private_mut().insert(MATH_SQRT, "newton_raphson", newton_body)?;
            self.sqrt_emitted = true;
            log::debug!("emitted square root helpers");
        }

        match args.get("value")? {
            Value::Int(value) => {
                out.push(Command::new(format!("scoreboard players set {N} {VAR_OBJECTIVE} {value}")));
            }
            Value::Score(score) => out.push(Command::new(format!(
                "scoreboard players operation {N} {VAR_OBJECTIVE} = {score}"
            ))),
            _ => return Err(args.mismatch("value")),
        }
        out.push(op(X, "=", N));
        out.push(op(X_N, "=", N));
        out.push(Command::new(format!(
            "execute if score {N} {VAR_OBJECTIVE} matches 2.. run {}",
            self.call(&main)
        )));
        out.push(Command::new(format!(
            "scoreboard players operation {target} = {X_N} {VAR_OBJECTIVE}"
        )));
        Ok(())
    }

    pub(super) fn math_random(&mut self, args: &Bound, target: &ScoreRef, out: &mut Vec<Command>) -> Result<()> {
        let min = args.int("min")?;
        let max = args.int("max")?;
        if min > max {
            return Err(Error::semantic(format!("Math.random: min ({min}) is greater than max ({max})"))
                .with_location(args.location("min")));
        }
        out.push(Command::new(format!(
            "execute store result score {target} run random value {min}..{max}"
        )));
        Ok(())
    }
}
