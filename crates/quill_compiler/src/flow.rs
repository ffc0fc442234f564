//! Lowering of structured control flow.
//!
//! The target has no jumps and no call stack, only guarded commands and
//! `function` calls. Branch and loop bodies therefore become private
//! functions: a loop body ends with a guarded call to itself, and an
//! if/else chain records in `__if_else__` whether an earlier arm ran.

use quill_foundation::{Command, Error, FunctionPath, Result, VAR_OBJECTIVE};
use quill_language::{ParenKind, Statement, Token, parse_tokens};

use crate::boxes::{BlockBoxes, Branch, IfElseChain, PendingDo};
use crate::compiler::{Compiler, Level};
use crate::feature::{DO_WHILE_LOOP, FOR_LOOP, IF_ELSE, IF_ELSE_FLAG, WHILE_LOOP};
use crate::variable::leading_variable;

fn commands(lines: Vec<String>) -> impl Iterator<Item = Command> {
    lines.into_iter().map(Command::new)
}

impl Compiler {
    /// Checks `keyword (...) { ... }` and returns the two bracket groups.
    fn head_and_body<'a>(&self, statement: &'a Statement) -> Result<(&'a Token, &'a Token)> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        let Some(paren) = tokens.get(1).filter(|t| t.is_paren(ParenKind::Round)) else {
            return Err(self.error(tokens.get(1).unwrap_or(keyword), format!("expected '(' after '{}'", keyword.text)));
        };
        let Some(body) = tokens.get(2).filter(|t| t.is_paren(ParenKind::Curly)) else {
            return Err(self.error(tokens.get(2).unwrap_or(paren), "expected '{' after condition"));
        };
        if let Some(extra) = tokens.get(3) {
            return Err(self.error(extra, format!("unexpected '{}' after block", extra.text)));
        }
        Ok((paren, body))
    }

    pub(crate) fn compile_if(&mut self, statement: &Statement, boxes: &mut BlockBoxes) -> Result<()> {
        let (paren, body) = self.head_and_body(statement)?;
        let condition = self.condition(paren)?;
        let body = self.compile_body(body)?;
        boxes.if_else = Some(IfElseChain::new(condition, body));
        Ok(())
    }

    pub(crate) fn compile_else(&mut self, statement: &Statement, boxes: &mut BlockBoxes) -> Result<()> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        match boxes.if_else.as_ref() {
            None => return Err(self.error(keyword, "'else' without a preceding 'if'")),
            Some(chain) if chain.is_closed() => {
                return Err(self.error(keyword, "'else' after the final 'else' of this chain"));
            }
            Some(_) => {}
        }

        let branch = match tokens {
            [_, body] if body.is_paren(ParenKind::Curly) => Branch {
                condition: None,
                body: self.compile_body(body)?,
            },
            [_, next, ..] if next.is_keyword("if") => {
                let rest = Statement::new(tokens[1..].to_vec());
                let (paren, body) = self.head_and_body(&rest)?;
                let condition = self.condition(paren)?;
                Branch {
                    condition: Some(condition),
                    body: self.compile_body(body)?,
                }
            }
            _ => return Err(self.error(keyword, "expected '{' or 'if' after 'else'")),
        };
        if let Some(chain) = boxes.if_else.as_mut() {
            chain.branches.push(branch);
        }
        Ok(())
    }

    /// Emits a pending if/else chain.
    pub(crate) fn flush_if_else(&mut self, boxes: &mut BlockBoxes, out: &mut Vec<Command>) -> Result<()> {
        let Some(chain) = boxes.if_else.take() else {
            return Ok(());
        };
        let mut branches = chain.branches;
        if branches.len() > 1
            && branches
                .last()
                .is_some_and(|b| b.condition.is_none() && b.body.is_empty())
        {
            branches.pop();
        }

        if branches.len() == 1 {
            let Some(Branch {
                condition: Some(condition),
                mut body,
            }) = branches.pop()
            else {
                return Err(Error::internal("if/else chain without a leading condition"));
            };
            match body.len() {
                0 => {}
                1 => {
                    let only = body.remove(0);
                    out.extend(commands(condition.guarded_commands(only.as_str())));
                }
                _ => {
                    let path = self.pack.private_mut().insert_next(IF_ELSE, body)?;
                    log::debug!("allocated {path}");
                    let call = self.call(&path);
                    out.extend(commands(condition.guarded_commands(&call)));
                }
            }
            return Ok(());
        }

        out.push(Command::new(format!("scoreboard players set {IF_ELSE_FLAG} {VAR_OBJECTIVE} 0")));
        let count = branches.len();
        for (index, branch) in branches.into_iter().enumerate() {
            let mut body = branch.body;
            if index + 1 < count {
                body.push(Command::new(format!("scoreboard players set {IF_ELSE_FLAG} {VAR_OBJECTIVE} 1")));
            }
            let path = self.pack.private_mut().insert_next(IF_ELSE, body)?;
            log::debug!("allocated {path}");
            let call = self.call(&path);
            let not_taken = format!("if score {IF_ELSE_FLAG} {VAR_OBJECTIVE} matches 0");
            match branch.condition {
                Some(condition) if index == 0 => {
                    out.extend(commands(condition.guarded_commands(&call)));
                }
                Some(condition) => {
                    out.extend(commands(condition.precommands.clone()));
                    out.push(Command::new(format!(
                        "execute {not_taken} {} run {call}",
                        condition.inline()
                    )));
                }
                None => out.push(Command::new(format!("execute {not_taken} run {call}"))),
            }
        }
        Ok(())
    }

    pub(crate) fn compile_while(
        &mut self,
        statement: &Statement,
        out: &mut Vec<Command>,
        boxes: &mut BlockBoxes,
    ) -> Result<()> {
        if let Some(pending) = boxes.do_while.take() {
            return self.finish_do_while(statement, pending, out);
        }
        let (paren, body) = self.head_and_body(statement)?;
        let id = self.pack.private_mut().next_id(WHILE_LOOP);
        let path = FunctionPath::private(WHILE_LOOP, &id.to_string());
        let condition = self.condition(paren)?;
        let call = self.call(&path);

        let mut commands_in_loop = self.compile_body(body)?;
        commands_in_loop.extend(commands(condition.guarded_commands(&call)));
        self.pack
            .private_mut()
            .insert(WHILE_LOOP, &id.to_string(), commands_in_loop)?;
        log::debug!("allocated {path}");

        out.extend(commands(condition.guarded_commands(&call)));
        Ok(())
    }

    pub(crate) fn compile_do(&mut self, statement: &Statement, boxes: &mut BlockBoxes) -> Result<()> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        let [_, body] = tokens else {
            return Err(self.error(keyword, "expected 'do { ... } while (condition);'"));
        };
        let id = self.pack.private_mut().next_id(DO_WHILE_LOOP);
        let body = self.compile_body(body)?;
        boxes.do_while = Some(PendingDo {
            body,
            location: keyword.span.location(),
            id,
        });
        Ok(())
    }

    fn finish_do_while(
        &mut self,
        statement: &Statement,
        pending: PendingDo,
        out: &mut Vec<Command>,
    ) -> Result<()> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        let paren = match tokens {
            [_, paren] if paren.is_paren(ParenKind::Round) => paren,
            [_, paren, extra, ..] if paren.is_paren(ParenKind::Round) => {
                return Err(self.error(extra, "expected ';' after do-while condition"));
            }
            _ => return Err(self.error(keyword, "expected '(' after 'while'")),
        };
        let name = pending.id.to_string();
        let path = FunctionPath::private(DO_WHILE_LOOP, &name);
        let condition = self.condition(paren)?;
        let call = self.call(&path);

        let mut body = pending.body;
        body.extend(commands(condition.guarded_commands(&call)));
        self.pack.private_mut().insert(DO_WHILE_LOOP, &name, body)?;
        log::debug!("allocated {path}");

        out.push(Command::new(call));
        Ok(())
    }

    pub(crate) fn compile_for(&mut self, statement: &Statement, out: &mut Vec<Command>) -> Result<()> {
        let (paren, body) = self.head_and_body(statement)?;
        let header = self.tokenize_inner(paren, false)?;
        let Ok([init, condition, step]) = <[Statement; 3]>::try_from(header) else {
            return Err(self.error(paren, "expected 'for (init; condition; step)'"));
        };

        let id = self.pack.private_mut().next_id(FOR_LOOP);
        self.scopes.push();
        let result = self.compile_for_parts(id, [init, condition, step], paren, body, out);
        self.scopes.pop();
        result
    }

    fn compile_for_parts(
        &mut self,
        id: u32,
        [init, condition, step]: [Statement; 3],
        paren: &Token,
        body: &Token,
        out: &mut Vec<Command>,
    ) -> Result<()> {
        if init.first().is_some_and(|t| t.is_keyword("let")) {
            if let Some(name) = init.get(1).and_then(|t| leading_variable(&t.text)) {
                let holder = format!("$__for_{id}__{}", &name[1..]);
                log::debug!("for loop {id} binds {name} to {holder}");
                self.scopes.bind(name, holder);
            }
        }

        let init_commands = self.compile_block(vec![init], &Level::Body)?;
        let condition = parse_tokens(condition.tokens(), &paren.span.location())?.render(self);
        let step_commands = self.compile_block(vec![step], &Level::Body)?;
        let path = FunctionPath::private(FOR_LOOP, &id.to_string());
        let call = self.call(&path);

        let mut loop_body = self.compile_body(body)?;
        loop_body.extend(step_commands);
        loop_body.extend(commands(condition.guarded_commands(&call)));
        self.pack.private_mut().insert(FOR_LOOP, &id.to_string(), loop_body)?;
        log::debug!("allocated {path}");

        out.extend(init_commands);
        out.extend(commands(condition.guarded_commands(&call)));
        Ok(())
    }
}
