//! Front end of the Quill compiler.
//!
//! This crate provides:
//! - [`Tokenizer`] - Splits source into statements of tokens
//! - [`parse_arguments`] - Positional, keyword and arrow-function arguments
//! - [`ScoreRef`] - `$name` and `objective:target` references
//! - [`Condition`] - Boolean conditions rendered into `execute` clauses

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arguments;
pub mod condition;
pub mod score;
pub mod span;
pub mod token;
pub mod tokenizer;

pub use arguments::{Argument, Arguments, is_identifier, parse_arguments};
pub use condition::{
    Clause, Condition, ConditionContext, LogicCounter, LogicOperator, RenderedCondition,
    compile_condition, parse_condition, parse_tokens,
};
pub use score::{NoScope, ScoreRef, VariableScope, is_integer, is_range, parse_score_value};
pub use span::Span;
pub use token::{ParenKind, Statement, Token, TokenKind, join_raw, join_tokens};
pub use tokenizer::{Tokenizer, tokenize, tokenize_inner};
