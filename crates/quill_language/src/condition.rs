//! Boolean conditions.
//!
//! A condition is parsed into a tree by splitting on `||`, then `&&`, then
//! a leading `!`, so precedence is `||` < `&&` < `!`. Rendering turns the
//! tree into `if`/`unless` clauses for an `execute` command; a disjunction
//! has no native form and is computed into a `__logic__<n>` flag by
//! precommands that run before the guarded command.

use std::fmt;

use quill_foundation::{Error, Result, SourceLocation, VAR_OBJECTIVE};

use crate::score::{ScoreRef, VariableScope, is_range, parse_score_value};
use crate::token::{ParenKind, Token, join_tokens};
use crate::tokenizer::tokenize_inner;

/// Logical connectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOperator {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
}

impl LogicOperator {
    /// Source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Not => "!",
        }
    }
}

/// A parsed condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// A single comparison or raw `execute` condition.
    Leaf(Vec<Token>),
    /// A connective over sub-conditions. `Not` has exactly one child.
    Node {
        /// The connective.
        operator: LogicOperator,
        /// Operands in source order.
        body: Vec<Condition>,
    },
}

/// Supplies what rendering needs from the compiler.
pub trait ConditionContext: VariableScope {
    /// Allocates the number of a fresh `__logic__<n>` flag.
    fn next_logic_id(&mut self) -> u32;
}

/// Standalone context: no variable renaming, flags numbered from zero.
#[derive(Clone, Debug, Default)]
pub struct LogicCounter {
    next: u32,
}

impl VariableScope for LogicCounter {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

impl ConditionContext for LogicCounter {
    fn next_logic_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// One `if ...` or `unless ...` subcommand of `execute`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    /// Renders as `unless` instead of `if`.
    pub negated: bool,
    /// Text after the `if`/`unless` keyword.
    pub body: String,
}

impl Clause {
    /// A positive clause.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            negated: false,
            body: body.into(),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.negated { "unless" } else { "if" };
        write!(f, "{keyword} {}", self.body)
    }
}

/// A rendered condition: clauses to splice into `execute`, plus commands
/// that must run first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedCondition {
    /// Clauses in order; all must hold.
    pub clauses: Vec<Clause>,
    /// Commands that compute flags read by the clauses.
    pub precommands: Vec<String>,
}

impl RenderedCondition {
    /// The clauses joined for use after `execute`.
    #[must_use]
    pub fn inline(&self) -> String {
        self.clauses
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `execute <clauses> run <command>`.
    #[must_use]
    pub fn guard(&self, command: &str) -> String {
        format!("execute {} run {command}", self.inline())
    }

    /// Precommands followed by the guarded command.
    #[must_use]
    pub fn guarded_commands(&self, command: &str) -> Vec<String> {
        let mut commands = self.precommands.clone();
        commands.push(self.guard(command));
        commands
    }
}

/// Parses the condition inside a round bracket token.
///
/// # Errors
/// Returns a syntax error for empty parentheses, a misplaced operator, or
/// a bracket group inside a comparison.
pub fn parse_condition(paren: &Token) -> Result<Condition> {
    if !paren.is_paren(ParenKind::Round) {
        return Err(Error::syntax(format!("expected '(' before condition, found '{}'", paren.text))
            .with_location(paren.span.location()));
    }
    let mut statements = tokenize_inner(paren, false)?;
    if statements.len() > 1 {
        let location = statements[1]
            .first()
            .map_or_else(|| paren.span.location(), |t| t.span.location());
        return Err(Error::syntax("unexpected ';' in condition").with_location(location));
    }
    match statements.pop() {
        Some(statement) => parse_tokens(statement.tokens(), &paren.span.location()),
        None => Err(Error::syntax("empty parentheses in condition")
            .with_location(paren.span.location())),
    }
}

/// Parses a condition from tokens. `at` locates errors in an empty list.
///
/// # Errors
/// See [`parse_condition`].
pub fn parse_tokens(tokens: &[Token], at: &SourceLocation) -> Result<Condition> {
    if tokens.is_empty() {
        return Err(Error::syntax("empty condition").with_location(at.clone()));
    }

    for operator in [LogicOperator::Or, LogicOperator::And] {
        let segments = split_on(tokens, operator.symbol())?;
        if segments.len() > 1 {
            let body = segments
                .into_iter()
                .map(|segment| parse_tokens(segment, at))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Condition::Node { operator, body });
        }
    }

    let first = &tokens[0];
    if first.is_keyword("!") {
        if tokens.len() == 1 {
            return Err(operator_error(first, "at end of clause"));
        }
        return Ok(negate(parse_tokens(&tokens[1..], at)?));
    }
    if let Some(text) = first.as_keyword() {
        if text.starts_with('!') && !text.starts_with("!=") {
            if let Some((_, rest)) = first.split_at(1) {
                let mut operand = vec![rest];
                operand.extend_from_slice(&tokens[1..]);
                return Ok(negate(parse_tokens(&operand, at)?));
            }
        }
    }

    if let [paren] = tokens {
        if paren.is_paren(ParenKind::Round) {
            return parse_condition(paren);
        }
    }

    for token in tokens {
        if token.is_keyword("!") {
            return Err(operator_error(token, "in the middle of a clause"));
        }
        if token.is_paren(ParenKind::Round) {
            return Err(Error::syntax("unexpected parentheses in comparison")
                .with_location(token.span.location()));
        }
    }
    check_literal(tokens)?;
    Ok(Condition::Leaf(tokens.to_vec()))
}

/// Rejects an integer comparison that no score value can express.
fn check_literal(tokens: &[Token]) -> Result<()> {
    let Some(last) = tokens.last() else {
        return Ok(());
    };
    let text = join_tokens(tokens);
    let Some((index, op)) = find_comparison(&text) else {
        return Ok(());
    };
    if ScoreRef::parse(&text[..index]).is_none() {
        return Ok(());
    }
    let rhs = text[index + op.len()..].trim();
    let Some(value) = parse_score_value(rhs).map_err(|err| err.with_location(last.span.location()))?
    else {
        return Ok(());
    };
    if integer_range(op, value).is_none() {
        return Err(Error::syntax(format!("'{}' can never be true", text.trim()))
            .with_location(last.span.location()));
    }
    Ok(())
}

fn negate(condition: Condition) -> Condition {
    Condition::Node {
        operator: LogicOperator::Not,
        body: vec![condition],
    }
}

fn operator_error(token: &Token, position: &str) -> Error {
    Error::syntax(format!("unexpected '{}' {position}", token.text)).with_location(token.span.location())
}

/// Splits on a connective, rejecting operators with a missing operand.
fn split_on<'a>(tokens: &'a [Token], symbol: &str) -> Result<Vec<&'a [Token]>> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        if !token.is_keyword(symbol) {
            continue;
        }
        if index == 0 {
            return Err(operator_error(token, "at start of clause"));
        }
        if index == start {
            return Err(operator_error(token, "directly after another operator"));
        }
        segments.push(&tokens[start..index]);
        start = index + 1;
    }
    if start > 0 && start == tokens.len() {
        return Err(operator_error(&tokens[start - 1], "at end of clause"));
    }
    segments.push(&tokens[start..]);
    Ok(segments)
}

impl Condition {
    /// Rendered text of a leaf.
    #[must_use]
    pub fn leaf_text(&self) -> Option<String> {
        match self {
            Self::Leaf(tokens) => Some(join_tokens(tokens)),
            Self::Node { .. } => None,
        }
    }

    /// Renders the condition into clauses and precommands.
    pub fn render(&self, ctx: &mut (impl ConditionContext + ?Sized)) -> RenderedCondition {
        match self {
            Self::Leaf(tokens) => RenderedCondition {
                clauses: vec![render_leaf(&join_tokens(tokens), &*ctx)],
                precommands: Vec::new(),
            },
            Self::Node {
                operator: LogicOperator::And,
                body,
            } => {
                let mut rendered = RenderedCondition::default();
                for child in body {
                    let part = child.render(ctx);
                    rendered.precommands.extend(part.precommands);
                    rendered.clauses.extend(part.clauses);
                }
                rendered
            }
            Self::Node {
                operator: LogicOperator::Not,
                body,
            } => {
                let mut rendered = RenderedCondition::default();
                for child in body {
                    let part = child.render(ctx);
                    rendered.precommands.extend(part.precommands);
                    rendered
                        .clauses
                        .extend(part.clauses.into_iter().map(|clause| Clause {
                            negated: !clause.negated,
                            body: clause.body,
                        }));
                }
                rendered
            }
            Self::Node {
                operator: LogicOperator::Or,
                body,
            } => {
                let flag = format!("__logic__{}", ctx.next_logic_id());
                let mut precommands = vec![format!("scoreboard players set {flag} {VAR_OBJECTIVE} 0")];
                for child in body {
                    let part = child.render(ctx);
                    let set = format!("scoreboard players set {flag} {VAR_OBJECTIVE} 1");
                    precommands.extend(part.guarded_commands(&set));
                }
                RenderedCondition {
                    clauses: vec![Clause::new(format!("score {flag} {VAR_OBJECTIVE} matches 1"))],
                    precommands,
                }
            }
        }
    }
}

/// Parses and renders the condition inside a round bracket token.
///
/// # Errors
/// See [`parse_condition`].
pub fn compile_condition(
    paren: &Token,
    ctx: &mut (impl ConditionContext + ?Sized),
) -> Result<RenderedCondition> {
    Ok(parse_condition(paren)?.render(ctx))
}

const COMPARISONS: [&str; 6] = ["==", "!=", ">=", "<=", ">", "<"];

/// Finds the first comparison operator outside brackets and strings.
fn find_comparison(text: &str) -> Option<(usize, &'static str)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (index, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                let rest = &text[index..];
                if let Some(op) = COMPARISONS.iter().find(|op| rest.starts_with(**op)) {
                    return Some((index, op));
                }
            }
            _ => {}
        }
    }
    None
}

/// The `matches` range for `<score> <op> <value>`, or `None` when the
/// bound falls outside the score range.
fn integer_range(op: &str, value: i32) -> Option<(bool, String)> {
    let range = match op {
        "==" => value.to_string(),
        "!=" => return Some((true, value.to_string())),
        ">" => format!("{}..", value.checked_add(1)?),
        ">=" => format!("{value}.."),
        "<" => format!("..{}", value.checked_sub(1)?),
        _ => format!("..{value}"),
    };
    Some((false, range))
}

fn render_leaf(text: &str, scope: &(impl VariableScope + ?Sized)) -> Clause {
    if let Some(body) = text.strip_prefix("if ") {
        return Clause::new(body.trim());
    }
    if let Some(body) = text.strip_prefix("unless ") {
        return Clause {
            negated: true,
            body: body.trim().to_string(),
        };
    }

    if let Some((lhs, rhs)) = text.split_once(" matches ") {
        if let Some(score) = ScoreRef::parse_in(lhs, scope) {
            return Clause::new(format!("score {score} matches {}", rhs.trim()));
        }
    }

    let Some((index, op)) = find_comparison(text) else {
        return match ScoreRef::parse_in(text, scope) {
            Some(score) => Clause::new(format!("score {score} matches 1..")),
            None => Clause::new(text),
        };
    };
    let lhs = text[..index].trim();
    let rhs = text[index + op.len()..].trim();
    let Some(score) = ScoreRef::parse_in(lhs, scope) else {
        return Clause::new(text);
    };

    if let Some((negated, range)) = parse_score_value(rhs)
        .ok()
        .flatten()
        .and_then(|value| integer_range(op, value))
    {
        return Clause {
            negated,
            body: format!("score {score} matches {range}"),
        };
    }
    if is_range(rhs) && matches!(op, "==" | "!=") {
        return Clause {
            negated: op == "!=",
            body: format!("score {score} matches {rhs}"),
        };
    }
    if let Some(other) = ScoreRef::parse_in(rhs, scope) {
        let (negated, native) = match op {
            "==" => (false, "="),
            "!=" => (true, "="),
            other_op => (false, other_op),
        };
        return Clause {
            negated,
            body: format!("score {score} {native} {other}"),
        };
    }
    Clause::new(text)
}
