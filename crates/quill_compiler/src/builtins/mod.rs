//! Built-in library.
//!
//! Dotted calls such as `Math.random(1, 6)` resolve to a closed table of
//! built-ins, grouped by category:
//! - `math`: `Math.sqrt`, `Math.random`
//! - `scoreboard`: `Scoreboard.add`
//! - `player`: `Player.onEvent`
//! - `particle`: `Particle.circle`
//! - `text`: `Text.tellraw`
//!
//! Every entry declares its parameters. Arguments are bound against them
//! before expansion, and any mismatch is a semantic error.

mod math;
mod particle;
mod player;
mod scoreboard;
mod text;

use std::fmt;

use quill_foundation::{Command, Error, Result, SourceLocation};
use quill_language::{
    Argument, Arguments, ScoreRef, Statement, Token, TokenKind, VariableScope, is_identifier,
    parse_arguments,
};

use crate::compiler::Compiler;

/// A built-in function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `$r = Math.sqrt(value);`
    MathSqrt,
    /// `$r = Math.random(min=1, max=2147483647);`
    MathRandom,
    /// `Scoreboard.add(objective, criteria="dummy");`
    ScoreboardAdd,
    /// `Player.onEvent(objective, () => { ... }, criteria="dummy");`
    PlayerOnEvent,
    /// `Particle.circle(particle, radius=1, spread=8);`
    ParticleCircle,
    /// `Text.tellraw(selector, message);`
    TextTellraw,
}

impl Builtin {
    /// Every built-in, in table order.
    pub const ALL: [Self; 6] = [
        Self::MathSqrt,
        Self::MathRandom,
        Self::ScoreboardAdd,
        Self::PlayerOnEvent,
        Self::ParticleCircle,
        Self::TextTellraw,
    ];

    /// Looks up a built-in by its dotted name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == name)
    }

    /// Dotted name as written in source.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MathSqrt => "Math.sqrt",
            Self::MathRandom => "Math.random",
            Self::ScoreboardAdd => "Scoreboard.add",
            Self::PlayerOnEvent => "Player.onEvent",
            Self::ParticleCircle => "Particle.circle",
            Self::TextTellraw => "Text.tellraw",
        }
    }

    /// Declared parameters in positional order.
    #[must_use]
    pub const fn params(self) -> &'static [Param] {
        match self {
            Self::MathSqrt => SQRT_PARAMS,
            Self::MathRandom => RANDOM_PARAMS,
            Self::ScoreboardAdd => SCOREBOARD_ADD_PARAMS,
            Self::PlayerOnEvent => ON_EVENT_PARAMS,
            Self::ParticleCircle => CIRCLE_PARAMS,
            Self::TextTellraw => TELLRAW_PARAMS,
        }
    }

    /// Returns true if the built-in must be assigned: `$x = Math.sqrt(...)`.
    #[must_use]
    pub const fn returns_value(self) -> bool {
        matches!(self, Self::MathSqrt | Self::MathRandom)
    }

    /// Signature for messages, e.g. `Math.random(min=1, max=2147483647)`.
    #[must_use]
    pub fn signature(self) -> String {
        let params: Vec<String> = self.params().iter().map(ToString::to_string).collect();
        format!("{}({})", self.name(), params.join(", "))
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a parameter accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer literal.
    Integer,
    /// Decimal literal.
    Number,
    /// Score reference.
    Score,
    /// Integer literal or score reference.
    ScoreOrInteger,
    /// String literal or bare words.
    Text,
    /// Target selector or player name.
    Selector,
    /// Scoreboard objective name.
    Objective,
    /// `() => { ... }`
    Arrow,
}

impl ParamKind {
    /// Description used in mismatch messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Integer => "an integer",
            Self::Number => "a number",
            Self::Score => "a score",
            Self::ScoreOrInteger => "a score or integer",
            Self::Text => "text",
            Self::Selector => "a selector",
            Self::Objective => "an objective name",
            Self::Arrow => "an arrow function",
        }
    }
}

/// One declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    /// Keyword name.
    pub name: &'static str,
    /// Accepted values.
    pub kind: ParamKind,
    /// Default, written as source text.
    pub default: Option<&'static str>,
}

impl Param {
    const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    const fn optional(name: &'static str, kind: ParamKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }
}

const SQRT_PARAMS: &[Param] = &[Param::required("value", ParamKind::ScoreOrInteger)];

const RANDOM_PARAMS: &[Param] = &[
    Param::optional("min", ParamKind::Integer, "1"),
    Param::optional("max", ParamKind::Integer, "2147483647"),
];

const SCOREBOARD_ADD_PARAMS: &[Param] = &[
    Param::required("objective", ParamKind::Objective),
    Param::optional("criteria", ParamKind::Text, "dummy"),
];

const ON_EVENT_PARAMS: &[Param] = &[
    Param::required("objective", ParamKind::Objective),
    Param::required("handler", ParamKind::Arrow),
    Param::optional("criteria", ParamKind::Text, "dummy"),
];

const CIRCLE_PARAMS: &[Param] = &[
    Param::required("particle", ParamKind::Text),
    Param::optional("radius", ParamKind::Number, "1"),
    Param::optional("spread", ParamKind::Integer, "8"),
];

const TELLRAW_PARAMS: &[Param] = &[
    Param::required("selector", ParamKind::Selector),
    Param::required("message", ParamKind::Text),
];

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.default {
            Some(default) if self.kind == ParamKind::Text => write!(f, "{}=\"{default}\"", self.name),
            Some(default) => write!(f, "{}={default}", self.name),
            None => f.write_str(self.name),
        }
    }
}

/// A bound argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Integer literal.
    Int(i64),
    /// Decimal literal.
    Number(f64),
    /// Score reference.
    Score(ScoreRef),
    /// Text, selector, or objective name.
    Text(String),
    /// Arrow function body.
    Arrow(Token),
}

/// Arguments bound to a built-in's parameters.
#[derive(Clone, Debug)]
pub struct Bound {
    builtin: Builtin,
    values: Vec<(&'static str, Value, SourceLocation)>,
}

impl Bound {
    fn get(&self, name: &str) -> Result<&Value> {
        self.values
            .iter()
            .find(|(param, _, _)| *param == name)
            .map(|(_, value, _)| value)
            .ok_or_else(|| Error::internal(format!("{} has no parameter '{name}'", self.builtin)))
    }

    /// Where the argument was written; the call site for defaults.
    fn location(&self, name: &str) -> SourceLocation {
        self.values
            .iter()
            .find(|(param, _, _)| *param == name)
            .map_or_else(|| SourceLocation::new("", 0, 0), |(_, _, location)| location.clone())
    }

    fn mismatch(&self, name: &str) -> Error {
        Error::internal(format!("{} bound '{name}' to the wrong kind", self.builtin))
    }

    fn int(&self, name: &str) -> Result<i64> {
        match self.get(name)? {
            Value::Int(value) => Ok(*value),
            _ => Err(self.mismatch(name)),
        }
    }

    fn number(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            Value::Number(value) => Ok(*value),
            _ => Err(self.mismatch(name)),
        }
    }

    fn text(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            Value::Text(value) => Ok(value),
            _ => Err(self.mismatch(name)),
        }
    }

    fn arrow(&self, name: &str) -> Result<&Token> {
        match self.get(name)? {
            Value::Arrow(body) => Ok(body),
            _ => Err(self.mismatch(name)),
        }
    }
}

fn is_objective_name(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '+'))
}

fn is_selector(text: &str) -> bool {
    (text.starts_with('@') && !text.contains(char::is_whitespace)) || is_identifier(text)
}

/// Converts source text into a value of `kind`.
fn convert(kind: ParamKind, argument: &Argument, scope: &(impl VariableScope + ?Sized)) -> Option<Value> {
    let single = match argument.tokens() {
        [token] if token.kind == TokenKind::Keyword => Some(token.text.as_str()),
        _ => None,
    };
    match kind {
        ParamKind::Integer => argument.as_int().map(Value::Int),
        ParamKind::Number => single
            .and_then(|text| text.parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .map(Value::Number),
        ParamKind::Score => single.and_then(|text| ScoreRef::parse_in(text, scope)).map(Value::Score),
        ParamKind::ScoreOrInteger => argument.as_int().map(Value::Int).or_else(|| {
            single
                .and_then(|text| ScoreRef::parse_in(text, scope))
                .map(Value::Score)
        }),
        ParamKind::Text => match argument {
            Argument::Arrow(_) => None,
            Argument::Tokens(_) => Some(Value::Text(
                argument.as_string().map_or_else(|| argument.text(), str::to_string),
            )),
        },
        ParamKind::Selector => single
            .filter(|text| is_selector(text))
            .map(|text| Value::Text(text.to_string())),
        ParamKind::Objective => argument
            .as_string()
            .or(single)
            .filter(|text| is_objective_name(text))
            .map(|text| Value::Text(text.to_string())),
        ParamKind::Arrow => argument.as_arrow().cloned().map(Value::Arrow),
    }
}

fn default_value(kind: ParamKind, text: &str) -> Option<Value> {
    match kind {
        ParamKind::Integer => text.parse().ok().map(Value::Int),
        ParamKind::Number => text.parse().ok().map(Value::Number),
        ParamKind::Text | ParamKind::Selector | ParamKind::Objective => Some(Value::Text(text.to_string())),
        ParamKind::Score | ParamKind::ScoreOrInteger | ParamKind::Arrow => None,
    }
}

/// Binds call arguments to the parameters of `builtin`.
///
/// # Errors
/// Returns a semantic error for too many positional arguments, an unknown
/// or repeated keyword, a missing required argument, or an argument of the
/// wrong kind.
pub fn bind(
    builtin: Builtin,
    arguments: &Arguments,
    scope: &(impl VariableScope + ?Sized),
) -> Result<Bound> {
    let params = builtin.params();
    let positional = arguments.positional();
    if let Some(extra) = positional.get(params.len()) {
        return Err(Error::semantic(format!(
            "{builtin} takes at most {} arguments, got {}",
            params.len(),
            positional.len()
        ))
        .with_location(extra.location()));
    }
    for (name, value) in arguments.keywords() {
        match params.iter().position(|param| param.name == name) {
            None => {
                return Err(Error::semantic(format!(
                    "{builtin} has no parameter '{name}' (expected {})",
                    builtin.signature()
                ))
                .with_location(value.location()));
            }
            Some(index) if index < positional.len() => {
                return Err(Error::semantic(format!("argument '{name}' of {builtin} given twice"))
                    .with_location(value.location()));
            }
            Some(_) => {}
        }
    }

    let mut values = Vec::with_capacity(params.len());
    for (index, param) in params.iter().enumerate() {
        let argument = positional.get(index).or_else(|| arguments.keyword(param.name));
        let (value, location) = match (argument, param.default) {
            (Some(argument), _) => {
                let value = convert(param.kind, argument, scope).ok_or_else(|| {
                    Error::semantic(format!(
                        "argument '{}' of {builtin} expects {}, found {} '{}'",
                        param.name,
                        param.kind.describe(),
                        argument.describe(),
                        argument.raw()
                    ))
                    .with_location(argument.location())
                })?;
                (value, argument.location())
            }
            (None, Some(default)) => {
                let value = default_value(param.kind, default).ok_or_else(|| {
                    Error::internal(format!("bad default '{default}' for {builtin}"))
                })?;
                (value, arguments.location().clone())
            }
            (None, None) => {
                return Err(Error::semantic(format!(
                    "missing argument '{}' for {}",
                    param.name,
                    builtin.signature()
                ))
                .with_location(arguments.location().clone()));
            }
        };
        values.push((param.name, value, location));
    }
    Ok(Bound { builtin, values })
}

impl Compiler {
    /// Expands a built-in call. `target` is the score being assigned, for
    /// `$x = Builtin(...)`.
    pub(crate) fn compile_builtin(
        &mut self,
        builtin: Builtin,
        statement: &Statement,
        target: Option<&ScoreRef>,
        out: &mut Vec<Command>,
    ) -> Result<()> {
        let tokens = statement.tokens();
        let [name, paren] = tokens else {
            return Err(self.error(&tokens[0], format!("expected '{}'", builtin.signature())));
        };
        match (builtin.returns_value(), target) {
            (true, None) => {
                return Err(Error::semantic(format!(
                    "{builtin} returns a value; assign it, e.g. '$x = {}'",
                    builtin.signature()
                ))
                .with_location(name.span.location()));
            }
            (false, Some(_)) => {
                return Err(Error::semantic(format!("{builtin} does not return a value"))
                    .with_location(name.span.location()));
            }
            _ => {}
        }

        let arguments = parse_arguments(paren)?;
        let bound = bind(builtin, &arguments, self)?;
        log::debug!("expanding {builtin}");
        match (builtin, target) {
            (Builtin::MathSqrt, Some(target)) => self.math_sqrt(&bound, target, out),
            (Builtin::MathRandom, Some(target)) => self.math_random(&bound, target, out),
            (Builtin::ScoreboardAdd, None) => self.scoreboard_add(&bound),
            (Builtin::PlayerOnEvent, None) => self.player_on_event(&bound),
            (Builtin::ParticleCircle, None) => self.particle_circle(&bound, out),
            (Builtin::TextTellraw, None) => self.text_tellraw(&bound, out),
            _ => Err(Error::internal(format!("{builtin} dispatched with the wrong arity"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_language::{NoScope, tokenize};

    fn arguments(source: &str) -> Arguments {
        let statements = tokenize(source, 1, 1, false).unwrap();
        parse_arguments(&statements[0].tokens()[0]).unwrap()
    }

    #[test]
    fn table_lookup() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::lookup(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::lookup("Math.cbrt"), None);
        assert_eq!(
            Builtin::MathRandom.signature(),
            "Math.random(min=1, max=2147483647)"
        );
        assert_eq!(
            Builtin::ScoreboardAdd.signature(),
            "Scoreboard.add(objective, criteria=\"dummy\")"
        );
    }

    #[test]
    fn defaults_fill_missing_arguments() {
        let bound = bind(Builtin::MathRandom, &arguments("(max=6)"), &NoScope).unwrap();
        assert_eq!(bound.int("min").unwrap(), 1);
        assert_eq!(bound.int("max").unwrap(), 6);
    }

    #[test]
    fn kinds_are_checked() {
        let err = bind(Builtin::MathRandom, &arguments("(\"one\")"), &NoScope).unwrap_err();
        assert!(err.is_semantic());
        assert!(format!("{err}").contains("expects an integer"));

        let bound = bind(Builtin::MathSqrt, &arguments("($x)"), &NoScope).unwrap();
        assert!(matches!(bound.get("value").unwrap(), Value::Score(_)));
    }

    #[test]
    fn binding_errors() {
        for source in ["(1, 2, 3)", "(foo=1)", "(1, min=2)"] {
            let err = bind(Builtin::MathRandom, &arguments(source), &NoScope).unwrap_err();
            assert!(err.is_semantic(), "{source}");
        }
        let err = bind(Builtin::ScoreboardAdd, &arguments("()"), &NoScope).unwrap_err();
        assert!(format!("{err}").contains("missing argument 'objective'"));
    }

    #[test]
    fn text_accepts_strings_and_words() {
        let bound = bind(Builtin::ParticleCircle, &arguments("(\"flame\", radius=2.5)"), &NoScope).unwrap();
        assert_eq!(bound.text("particle").unwrap(), "flame");
        assert!((bound.number("radius").unwrap() - 2.5).abs() < f64::EPSILON);
        assert_eq!(bound.int("spread").unwrap(), 8);
    }
}
