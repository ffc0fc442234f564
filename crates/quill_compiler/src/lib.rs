//! Statement compiler for Quill.
//!
//! This crate provides:
//! - [`Compiler`] - Dispatches statements and builds a [`DataPack`](quill_foundation::DataPack)
//! - [`CompilerConfig`] - Namespace and source locations
//! - [`CommandKind`] - Closed table of statement kinds
//! - [`Builtin`] - The built-in library (`Math`, `Scoreboard`, `Player`, `Particle`, `Text`)
//! - Control-flow lowering of `if`/`else`, loops, and `switch` into private functions

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod boxes;
pub mod builtins;
pub mod command;
pub mod compiler;
pub mod config;
pub mod feature;
mod flow;
pub mod scope;
mod switch;
pub mod variable;

pub use boxes::{BlockBoxes, Branch, IfElseChain, PendingDo};
pub use builtins::{Builtin, Param, ParamKind};
pub use command::{CommandKind, is_function_name};
pub use compiler::{Compiler, compile};
pub use config::{CompilerConfig, validate_namespace};
pub use scope::ScopeStack;
