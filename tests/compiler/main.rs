//! Integration tests for Layer 2: Compiler
//!
//! Tests whole programs: control-flow lowering, private function
//! numbering, built-ins, and multi-file projects.

mod builtins;
mod control_flow;
mod projects;

use quill_compiler::{CompilerConfig, compile};
use quill_foundation::DataPack;

/// Compiles `source` into the `test` namespace.
pub fn pack(source: &str) -> DataPack {
    compile("main.quill", source, CompilerConfig::new().with_namespace("test"))
        .unwrap_or_else(|err| panic!("{err}"))
}

/// The user commands of the load function.
pub fn load(pack: &DataPack) -> Vec<String> {
    pack.load_function()
        .map(|f| f.commands().iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Commands of a private function.
pub fn private(pack: &DataPack, feature: &str, name: &str) -> Vec<String> {
    pack.private()
        .get(feature, name)
        .map(|f| f.commands().iter().map(ToString::to_string).collect())
        .unwrap_or_else(|| panic!("no private function {feature}/{name}"))
}
