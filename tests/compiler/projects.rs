//! Integration tests for multi-file projects, functions, classes, and
//! JSON resources

use std::fs;
use std::path::PathBuf;

use quill_compiler::{Compiler, CompilerConfig, compile};

use crate::{load, pack};

fn project(name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quill-it-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    for (path, source) in files {
        let path = dir.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }
    dir
}

// =============================================================================
// Functions and classes
// =============================================================================

#[test]
fn functions_and_calls() {
    let pack = pack("function greet() { say hi; } greet();");
    assert_eq!(load(&pack), vec!["function test:greet"]);
    let greet = pack.functions().find(|f| f.path().as_str() == "greet").unwrap();
    assert_eq!(greet.commands()[0].as_str(), "say hi");
}

#[test]
fn class_prefixes_paths() {
    let pack = pack("class Arena { function reset() { say reset; } } Arena.reset();");
    assert_eq!(load(&pack), vec!["function test:arena/reset"]);
}

#[test]
fn duplicate_function_is_semantic() {
    let err = compile("m.quill", "function a() {} function a() {}", CompilerConfig::new()).unwrap_err();
    assert!(err.is_semantic());
    assert_eq!(err.location.unwrap().file, "m.quill");
}

// =============================================================================
// Resources
// =============================================================================

#[test]
fn json_resources_pass_through() {
    let pack = pack("new advancement(first_kill) { \"criteria\": {} }");
    let (key, json) = pack.resources().next().unwrap();
    assert_eq!((key.kind.as_str(), key.path.as_str()), ("advancement", "first_kill"));
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert!(value["criteria"].is_object());
}

#[test]
fn malformed_json_is_resource_error() {
    let err = compile("m.quill", "new recipe(bad) { \"type\": }", CompilerConfig::new()).unwrap_err();
    assert!(err.is_resource());
}

// =============================================================================
// Imports
// =============================================================================

#[test]
fn imports_compile_once_in_order() {
    let dir = project(
        "imports",
        &[
            ("main.quill", "say first; import \"lib/util\"; import \"lib/util.quill\"; util(); say last;"),
            ("lib/util.quill", "say loading util; function util() { say util; }"),
        ],
    );
    let mut compiler = Compiler::new(CompilerConfig::new().with_namespace("test").with_base_dir(&dir));
    compiler.compile_entry().unwrap();
    assert_eq!(
        load(compiler.pack()),
        vec!["say first", "say loading util", "function test:util", "say last"]
    );
}

#[test]
fn errors_name_the_imported_file() {
    let dir = project(
        "import-error",
        &[("main.quill", "import \"broken\";"), ("broken.quill", "say fine;\nsay \"open;")],
    );
    let mut compiler = Compiler::new(CompilerConfig::new().with_base_dir(&dir));
    let err = compiler.compile_entry().unwrap_err();
    let location = err.location.unwrap();
    assert_eq!(location.file, "broken.quill");
    assert_eq!(location.line, 2);
}

#[test]
fn missing_import_is_resource_error() {
    let dir = project("import-missing", &[("main.quill", "import \"nowhere\";")]);
    let mut compiler = Compiler::new(CompilerConfig::new().with_base_dir(&dir));
    assert!(compiler.compile_entry().unwrap_err().is_resource());
}
