//! Quill - compiles a JavaScript-flavored scripting language into data pack
//! functions.
//!
//! This crate re-exports all layers of the Quill compiler for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: quill_runtime    - REPL, CLI, configuration, pack writer
//! Layer 2: quill_compiler   - Statement dispatch, control flow, built-ins
//! Layer 1: quill_language   - Tokenizer, arguments, scores, conditions
//! Layer 0: quill_foundation - Errors, commands, functions, DataPack
//! ```

pub use quill_compiler as compiler;
pub use quill_foundation as foundation;
pub use quill_language as language;
pub use quill_runtime as runtime;
