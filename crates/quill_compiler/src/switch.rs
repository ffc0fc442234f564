//! `switch` lowering.
//!
//! Cases are numbered by consecutive integer labels and dispatched through
//! a balanced binary tree of range tests, so a switch over N cases runs at
//! most `ceil(log2(N))` tests before reaching its case body.

use quill_foundation::{Command, FunctionPath, Result};
use quill_language::{ParenKind, ScoreRef, Statement, Token, parse_score_value};

use crate::compiler::{Compiler, Level};
use crate::feature::SWITCH_CASE;

/// One `case` and the statements that belong to it.
struct Case {
    label: i32,
    statements: Vec<Statement>,
}

fn range(lo: i64, hi: i64) -> String {
    if lo == hi {
        lo.to_string()
    } else {
        format!("{lo}..{hi}")
    }
}

impl Compiler {
    pub(crate) fn compile_switch(&mut self, statement: &Statement, out: &mut Vec<Command>) -> Result<()> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        let [_, paren, body] = tokens else {
            return Err(self.error(keyword, "expected 'switch (score) { case 1: ... }'"));
        };
        if !paren.is_paren(ParenKind::Round) {
            return Err(self.error(paren, "expected '(' after 'switch'"));
        }
        if !body.is_paren(ParenKind::Curly) {
            return Err(self.error(body, "expected '{' after switch head"));
        }
        let head = paren.inner().unwrap_or_default().trim();
        let Some(score) = ScoreRef::parse_in(head, self) else {
            return Err(self.error(paren, format!("expected a score to switch on, found '{head}'")));
        };

        let statements = self.tokenize_inner(body, true)?;
        let cases = self.collect_cases(statements)?;
        let (Some(first), Some(last)) = (cases.first(), cases.last()) else {
            return Err(self.error(keyword, "switch has no cases"));
        };
        let (lo, hi) = (i64::from(first.label), i64::from(last.label));

        let id = self.pack.private_mut().next_id(SWITCH_CASE);
        log::debug!("switch {id} over {score} with cases {}", range(lo, hi));
        for case in cases {
            let commands = self.compile_block(case.statements, &Level::Body)?;
            self.pack
                .private_mut()
                .insert(SWITCH_CASE, &format!("{id}/{}", case.label), commands)?;
        }
        let tests = self.dispatch(id, &score, lo, hi)?;
        out.extend(tests);
        Ok(())
    }

    /// Groups the body's statements under their `case` labels.
    fn collect_cases(&mut self, statements: Vec<Statement>) -> Result<Vec<Case>> {
        let mut cases: Vec<Case> = Vec::new();
        for statement in statements {
            let Some(first) = statement.first() else {
                continue;
            };
            if first.is_keyword("case") {
                let (label_token, label, rest) = self.split_case(&statement)?;
                let expected = match cases.last() {
                    None => Some(1),
                    Some(case) => case.label.checked_add(1),
                };
                let Some(expected) = expected else {
                    return Err(self.error(&label_token, "case label is out of range for a score"));
                };
                let label = if label == "_" {
                    expected
                } else {
                    let parsed = parse_score_value(&label)
                        .map_err(|err| err.with_location(label_token.span.location()))?;
                    let Some(value) = parsed else {
                        return Err(self.error(&label_token, format!("case label must be an integer or '_', found '{label}'")));
                    };
                    if !cases.is_empty() && value != expected {
                        return Err(self.error(
                            &label_token,
                            format!("case labels must be consecutive: expected {expected}, found {value}"),
                        ));
                    }
                    value
                };
                let mut case = Case {
                    label,
                    statements: Vec::new(),
                };
                if !rest.is_empty() {
                    case.statements.push(Statement::new(rest));
                }
                cases.push(case);
                continue;
            }

            let Some(case) = cases.last_mut() else {
                return Err(self.error(first, "statement before the first 'case'"));
            };
            case.statements.push(statement);
        }

        for case in &mut cases {
            self.drop_breaks(case);
        }
        Ok(cases)
    }

    /// Removes `break;` statements. A trailing one is expected; any other
    /// is ignored with a warning.
    fn drop_breaks(&mut self, case: &mut Case) {
        let is_break = |s: &Statement| s.len() == 1 && s.first().is_some_and(|t| t.is_keyword("break"));
        if case.statements.last().is_some_and(is_break) {
            case.statements.pop();
        }
        let mut kept = Vec::with_capacity(case.statements.len());
        for statement in case.statements.drain(..) {
            if is_break(&statement) {
                if let Some(token) = statement.first() {
                    self.warn("'break' before the end of a case is ignored", token.span.location());
                }
            } else {
                kept.push(statement);
            }
        }
        case.statements = kept;
    }

    /// Splits `case 1: rest` into its label token, label text, and the
    /// first statement of the case body.
    fn split_case(&self, statement: &Statement) -> Result<(Token, String, Vec<Token>)> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        let Some(label) = tokens.get(1) else {
            return Err(self.error(keyword, "expected a label after 'case'"));
        };

        if let Some(colon) = label.text.find(':') {
            let mut rest = Vec::new();
            if let Some((_, tail)) = label.split_at(colon + 1) {
                rest.push(tail);
            }
            rest.extend(tokens[2..].iter().cloned());
            return Ok((label.clone(), label.text[..colon].to_string(), rest));
        }
        match tokens.get(2) {
            Some(next) if next.text.starts_with(':') => {
                let mut rest = Vec::new();
                if let Some((_, tail)) = next.split_at(1) {
                    rest.push(tail);
                }
                rest.extend(tokens[3..].iter().cloned());
                Ok((label.clone(), label.text.clone(), rest))
            }
            _ => Err(self.error(label, "expected ':' after case label")),
        }
    }

    /// Range tests selecting among cases `lo..=hi`. Subranges of more than
    /// one case get their own dispatch function.
    fn dispatch(&mut self, id: u32, score: &ScoreRef, lo: i64, hi: i64) -> Result<Vec<Command>> {
        if lo == hi {
            let leaf = FunctionPath::private(SWITCH_CASE, &format!("{id}/{lo}"));
            return Ok(vec![self.range_test(score, lo, hi, &leaf)]);
        }
        let half = lo + (hi - lo + 1) / 2 - 1;
        let mut tests = Vec::with_capacity(2);
        for (a, b) in [(lo, half), (half + 1, hi)] {
            let target = if a == b {
                FunctionPath::private(SWITCH_CASE, &format!("{id}/{a}"))
            } else {
                let node = self.dispatch(id, score, a, b)?;
                self.pack
                    .private_mut()
                    .insert(SWITCH_CASE, &format!("{id}/{a}-{b}"), node)?
            };
            tests.push(self.range_test(score, a, b, &target));
        }
        Ok(tests)
    }

    fn range_test(&self, score: &ScoreRef, lo: i64, hi: i64, target: &FunctionPath) -> Command {
        Command::new(format!(
            "execute if score {score} matches {} run {}",
            range(lo, hi),
            self.call(target)
        ))
    }
}
