//! Error taxonomy and output model for Quill.
//!
//! This crate provides:
//! - [`Error`] / [`Warning`] - Located diagnostics
//! - [`Command`], [`Function`], [`FunctionPath`] - Emitted command lists
//! - [`PrivateFunctionRegistry`] - Collision-free generated functions
//! - [`DataPack`] - The aggregate produced by one compilation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod datapack;
pub mod error;
pub mod function;
pub mod registry;

pub use datapack::{
    DataPack, INT_OBJECTIVE, LOAD_FUNCTION, Objective, ResourceKey, TICK_FUNCTION, VAR_OBJECTIVE,
};
pub use error::{Error, ErrorKind, Result, SourceLocation, Warning};
pub use function::{Command, Function, FunctionPath, PRIVATE_SEGMENT};
pub use registry::PrivateFunctionRegistry;
