//! Variable and score operations.
//!
//! A statement whose first token names a score (`$name` or
//! `objective:target`) lowers to exactly one `scoreboard` command, except
//! when the right-hand side is a built-in whose expansion spans several.

use quill_foundation::{Command, Error, INT_OBJECTIVE, Result, SourceLocation};
use quill_language::{ParenKind, ScoreRef, Statement, Token, TokenKind, is_integer, join_tokens};

use crate::command::CommandKind;
use crate::compiler::Compiler;

/// Operators in match priority: two-character operators first.
const OPERATORS: [&str; 14] = [
    "><", "->", "<=", ">=", "++", "--", "+=", "-=", "*=", "/=", "%=", "=", "<", ">",
];

/// Native `scoreboard players operation` code for an operator. `<=` and
/// `>=` keep the smaller or larger value just like `<` and `>`.
fn operation_code(operator: &str) -> &str {
    match operator {
        "<=" => "<",
        ">=" => ">",
        other => other,
    }
}

/// Finds the first operator outside brackets and strings, returning its
/// byte offset.
fn find_operator(text: &str) -> Option<(usize, &'static str)> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                if let Some(op) = leading_operator(&text[index..]) {
                    return Some((index, op));
                }
            }
            _ => {}
        }
    }
    None
}

fn leading_operator(text: &str) -> Option<&'static str> {
    OPERATORS.iter().copied().find(|op| text.starts_with(op))
}

/// Returns true if a statement starting with `word` is a score operation.
#[must_use]
pub fn is_variable_head(word: &str) -> bool {
    if word.starts_with('$') {
        return true;
    }
    let head = find_operator(word).map_or(word, |(index, _)| &word[..index]);
    head.contains(':') && ScoreRef::parse(head).is_some()
}

/// The `$name` a token starts with, e.g. `$i` in `$i=0`.
#[must_use]
pub fn leading_variable(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('$')?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.')))
        .unwrap_or(rest.len());
    (end > 0).then(|| &text[..=end])
}

/// A statement split around its operator.
struct Operation {
    target: Token,
    operator: &'static str,
    rhs: Vec<Token>,
}

/// Splits `target op rhs`, where the operator may be glued to either side.
fn split_operation(tokens: &[Token]) -> Option<Operation> {
    let (first, rest) = tokens.split_first()?;
    if let Some((index, operator)) = find_operator(&first.text) {
        let (target, tail) = first.split_at(index)?;
        let mut rhs = Vec::new();
        if let Some((_, value)) = tail.split_at(operator.len()) {
            rhs.push(value);
        }
        rhs.extend(rest.iter().cloned());
        return Some(Operation {
            target,
            operator,
            rhs,
        });
    }

    let (next, rest) = rest.split_first()?;
    let operator = next.as_keyword().and_then(leading_operator)?;
    let mut rhs = Vec::new();
    if let Some((_, value)) = next.split_at(operator.len()) {
        rhs.push(value);
    }
    rhs.extend(rest.iter().cloned());
    Some(Operation {
        target: first.clone(),
        operator,
        rhs,
    })
}

/// Right-hand side of a value form.
enum Operand {
    Int(i64),
    Score(ScoreRef),
}

impl Compiler {
    pub(crate) fn compile_variable(&mut self, statement: &Statement, out: &mut Vec<Command>) -> Result<()> {
        let mut tokens = statement.tokens();
        if tokens[0].is_keyword("let") {
            tokens = &tokens[1..];
            if tokens.is_empty() {
                return Err(self.error(&statement.tokens()[0], "expected a variable after 'let'"));
            }
        }
        let first = &tokens[0];

        if let [name, paren] = tokens {
            if paren.is_paren(ParenKind::Round) && name.text.ends_with(".get") {
                let holder = &name.text[..name.text.len() - ".get".len()];
                if paren.inner().is_some_and(|inner| !inner.trim().is_empty()) {
                    return Err(self.error(paren, "'.get()' takes no arguments"));
                }
                let score = self.score(holder, name)?;
                out.push(Command::new(format!("scoreboard players get {score}")));
                return Ok(());
            }
        }

        let Some(operation) = split_operation(tokens) else {
            return Err(self.error(first, format!("expected an operator after '{}'", first.text)));
        };
        let target = self.score(&operation.target.text, &operation.target)?;
        let operator = operation.operator;
        let rhs = operation.rhs;

        match operator {
            "++" | "--" => {
                if let Some(extra) = rhs.first() {
                    return Err(self.error(extra, format!("unexpected '{}' after '{operator}'", extra.text)));
                }
                let action = if operator == "++" { "add" } else { "remove" };
                out.push(Command::new(format!("scoreboard players {action} {target} 1")));
            }
            "=" => self.compile_assignment(&target, &operation.target, rhs, out)?,
            "->" => match self.operand(operator, &operation.target, &rhs)? {
                Operand::Score(destination) => out.push(Command::new(format!(
                    "scoreboard players operation {destination} = {target}"
                ))),
                Operand::Int(_) => {
                    return Err(self.error(&rhs[0], "'->' needs a score on the right"));
                }
            },
            "><" => match self.operand(operator, &operation.target, &rhs)? {
                Operand::Score(other) => out.push(Command::new(format!(
                    "scoreboard players operation {target} >< {other}"
                ))),
                Operand::Int(_) => {
                    return Err(self.error(&rhs[0], "'><' needs a score on the right"));
                }
            },
            "+=" | "-=" => match self.operand(operator, &operation.target, &rhs)? {
                Operand::Int(value) if value.unsigned_abs() > u64::from(i32::MAX.unsigned_abs()) => {
                    self.pack.register_int(value);
                    out.push(Command::new(format!(
                        "scoreboard players operation {target} {operator} {value} {INT_OBJECTIVE}"
                    )));
                }
                Operand::Int(value) => {
                    let add = (operator == "+=") == (value >= 0);
                    let action = if add { "add" } else { "remove" };
                    out.push(Command::new(format!(
                        "scoreboard players {action} {target} {}",
                        value.unsigned_abs()
                    )));
                }
                Operand::Score(other) => out.push(Command::new(format!(
                    "scoreboard players operation {target} {operator} {other}"
                ))),
            },
            _ => {
                let other = match self.operand(operator, &operation.target, &rhs)? {
                    Operand::Int(value) => {
                        self.pack.register_int(value);
                        ScoreRef::new(value.to_string(), INT_OBJECTIVE)
                    }
                    Operand::Score(other) => other,
                };
                out.push(Command::new(format!(
                    "scoreboard players operation {target} {} {other}",
                    operation_code(operator)
                )));
            }
        }
        Ok(())
    }

    fn compile_assignment(
        &mut self,
        target: &ScoreRef,
        target_token: &Token,
        rhs: Vec<Token>,
        out: &mut Vec<Command>,
    ) -> Result<()> {
        let Some(first) = rhs.first() else {
            return Err(self.error(target_token, "expected a value after '='"));
        };
        if self.is_value_token(first) {
            match self.operand("=", target_token, &rhs)? {
                Operand::Int(value) => {
                    out.push(Command::new(format!("scoreboard players set {target} {value}")));
                }
                Operand::Score(other) => out.push(Command::new(format!(
                    "scoreboard players operation {target} = {other}"
                ))),
            }
            return Ok(());
        }
        if let Some(operator) = first.as_keyword().and_then(leading_operator) {
            return Err(self.duplicate_operator(first, 0, operator));
        }

        let value = Statement::new(rhs);
        match CommandKind::classify(&value) {
            CommandKind::Builtin(builtin) => self.compile_builtin(builtin, &value, Some(target), out),
            CommandKind::Call => {
                let call = self.compile_call(&value)?;
                out.push(Command::new(format!("execute store result score {target} run {call}")));
                Ok(())
            }
            _ => {
                out.push(Command::new(format!(
                    "execute store result score {target} run {}",
                    join_tokens(value.tokens())
                )));
                Ok(())
            }
        }
    }

    /// Reads a single integer or score after `operator`.
    fn operand(&self, operator: &str, target_token: &Token, rhs: &[Token]) -> Result<Operand> {
        let Some(value) = rhs.first() else {
            return Err(self.error(target_token, format!("expected a value after '{operator}'")));
        };
        if let Some(text) = value.as_keyword() {
            if let Some((index, duplicate)) = find_operator(text) {
                return Err(self.duplicate_operator(value, index, duplicate));
            }
        }
        if let Some(extra) = rhs.get(1) {
            if let Some(duplicate) = extra.as_keyword().and_then(leading_operator) {
                return Err(self.duplicate_operator(extra, 0, duplicate));
            }
            return Err(self.error(extra, format!("unexpected '{}' after value", extra.text)));
        }
        if let Some(int) = value.as_score_value()? {
            return Ok(Operand::Int(i64::from(int)));
        }
        if value.kind == TokenKind::Keyword {
            if let Some(score) = ScoreRef::parse_in(&value.text, self) {
                return Ok(Operand::Score(score));
            }
        }
        Err(self.error(
            value,
            format!("expected an integer or score after '{operator}', found '{}'", value.text),
        ))
    }

    /// A keyword token that starts with an integer or a score reference.
    fn is_value_token(&self, token: &Token) -> bool {
        let head = find_operator(&token.text).map_or(token.text.as_str(), |(index, _)| &token.text[..index]);
        token.kind == TokenKind::Keyword
            && (is_integer(head) || ScoreRef::parse_in(head, self).is_some())
    }

    fn score(&self, text: &str, token: &Token) -> Result<ScoreRef> {
        ScoreRef::parse_in(text, self)
            .ok_or_else(|| self.error(token, format!("invalid score reference '{text}'")))
    }

    fn duplicate_operator(&self, token: &Token, offset: usize, operator: &str) -> Error {
        let column = token.col() + u32::try_from(token.text[..offset].chars().count()).unwrap_or(0);
        Error::syntax(format!("unexpected second operator '{operator}'"))
            .with_location(SourceLocation::new("", token.line(), column))
    }
}
