//! Integration tests for argument lists and score references

use quill_language::{Argument, ScoreRef, Token, parse_arguments, tokenize};

fn paren(source: &str) -> Token {
    let statements = tokenize(source, 1, 1, false).unwrap();
    statements[0].tokens()[0].clone()
}

// =============================================================================
// Arguments
// =============================================================================

#[test]
fn mixed_arguments() {
    let args = parse_arguments(&paren(r#"(@a, "hello, world", radius = 3)"#)).unwrap();
    assert_eq!(args.positional().len(), 2);
    assert_eq!(args.positional()[1].as_string(), Some("hello, world"));
    assert_eq!(args.keyword("radius").and_then(Argument::as_int), Some(3));
    let names: Vec<&str> = args.keywords().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["radius"]);
}

#[test]
fn nested_brackets_stay_in_one_argument() {
    let args = parse_arguments(&paren(r#"(@e[type=zombie, limit=1], {"text": "a, b"})"#)).unwrap();
    assert_eq!(args.len(), 2);
    assert_eq!(args.positional()[0].text(), "@e[type=zombie, limit=1]");
}

#[test]
fn argument_errors_point_at_offender() {
    let err = parse_arguments(&paren("(a, , b)")).unwrap_err();
    assert!(err.is_syntax());
    assert!(err.location.is_some());
}

// =============================================================================
// Score references
// =============================================================================

#[test]
fn score_forms() {
    assert_eq!(ScoreRef::parse("$x").unwrap().to_string(), "$x __variable__");
    assert_eq!(ScoreRef::parse("deaths:@p").unwrap().to_string(), "@p deaths");
    assert_eq!(ScoreRef::new("@s", "hp"), ScoreRef::parse("hp:@s").unwrap());
    assert_eq!(ScoreRef::variable("$y").objective, "__variable__");
    assert!(ScoreRef::parse("minecraft:diamond").is_none());
}
