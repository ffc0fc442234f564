//! Integration tests for Error and Warning
//!
//! Tests error construction, kinds, and the rendered caret pointer.

use quill_foundation::{Error, ErrorKind, SourceLocation, Warning};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn constructors_set_kind() {
    assert!(Error::syntax("x").is_syntax());
    assert!(Error::semantic("x").is_semantic());
    assert!(Error::resource("x").is_resource());
    assert!(matches!(Error::internal("x").kind, ErrorKind::Internal(_)));
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = io.into();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
    assert!(format!("{err}").contains("gone"));
}

#[test]
fn or_location_keeps_first() {
    let err = Error::syntax("x")
        .with_location(SourceLocation::new("a.quill", 1, 2))
        .or_location(SourceLocation::new("b.quill", 3, 4));
    assert_eq!(err.location.unwrap().file, "a.quill");
}

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn display_without_location() {
    assert_eq!(format!("{}", Error::semantic("duplicate")), "semantic error: duplicate");
}

#[test]
fn display_with_pointer() {
    let source = "say a;\n$x = = 5;\n";
    let err = Error::syntax("unexpected second operator '='")
        .with_location(SourceLocation::new("", 2, 6))
        .in_file("main.quill", source);
    let text = format!("{err}");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "syntax error: unexpected second operator '='");
    assert_eq!(lines[1], " --> main.quill:2:6");
    assert_eq!(lines[3], "2 | $x = = 5;");
    assert_eq!(lines[4], "  |      ^");
}

#[test]
fn in_file_does_not_overwrite_known_file() {
    let err = Error::syntax("x")
        .with_location(SourceLocation::new("lib.quill", 1, 1))
        .in_file("main.quill", "say a;");
    assert_eq!(err.location.unwrap().file, "lib.quill");
}

// =============================================================================
// Warnings
// =============================================================================

#[test]
fn warning_display_names_location() {
    let warning = Warning::new("redundant ';'").with_location(SourceLocation::new("m.quill", 4, 9));
    let text = format!("{warning}");
    assert!(text.contains("redundant ';'"));
    assert!(text.contains("m.quill:4:9"));
}
