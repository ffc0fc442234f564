//! REPL, CLI, and data pack output for Quill.
//!
//! This crate provides:
//! - [`PackConfig`] - Project settings stored in `quill.json`
//! - [`write_pack`] - Writes a compiled pack to disk
//! - [`Repl`] - Interactive compile loop
//! - [`Logger`] - Colored stderr logger for the `log` facade

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod editor;
pub mod highlight;
pub mod logger;
pub mod package;
pub mod repl;

pub use config::{CONFIG_FILE, PackConfig};
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use logger::Logger;
pub use package::{PackSummary, write_pack};
pub use repl::{Repl, build};
