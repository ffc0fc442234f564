//! Integration tests for the tokenizer

use proptest::prelude::*;
use quill_language::{ParenKind, Tokenizer, tokenize, tokenize_inner};

fn texts(source: &str) -> Vec<Vec<String>> {
    tokenize(source, 1, 1, true)
        .unwrap()
        .iter()
        .map(|s| s.tokens().iter().map(|t| t.text.clone()).collect())
        .collect()
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn block_statements_end_at_their_brace() {
    let source = "function greet() { say hi; }\nwhile ($x) { $x--; }\nsay done;";
    let statements = texts(source);
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0][0], "function");
    assert_eq!(statements[1][0], "while");
    assert_eq!(statements[2], vec!["say", "done"]);
}

#[test]
fn nested_bodies_retokenize_at_their_position() {
    let source = "if ($a) {\n    while ($b) { say x; }\n}";
    let statements = tokenize(source, 1, 1, true).unwrap();
    let body = &statements[0].tokens()[2];
    assert!(body.is_paren(ParenKind::Curly));
    let inner = tokenize_inner(body, true).unwrap();
    let keyword = &inner[0].tokens()[0];
    assert_eq!((keyword.line(), keyword.col()), (2, 5));
}

#[test]
fn redundant_semicolons_warn() {
    let mut tokenizer = Tokenizer::new("say a;; say b;;");
    assert_eq!(tokenizer.tokenize().unwrap().len(), 2);
    assert_eq!(tokenizer.take_warnings().len(), 2);
    assert!(tokenizer.warnings().is_empty());
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unterminated_string_reports_opening_quote() {
    let err = tokenize("say a;\nsay \"open;", 1, 1, true).unwrap_err();
    assert!(err.is_syntax());
    let location = err.location.unwrap();
    assert_eq!((location.line, location.column), (2, 5));
}

#[test]
fn unclosed_brace_is_reported() {
    let err = tokenize("function f() {\n say a;", 1, 1, true).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.location.unwrap().line, 1);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn odd_quote_fails_before_any_statement(
        words in prop::collection::vec("[a-z]{1,6}", 0..5),
        tail in "[a-z ]{0,8}",
    ) {
        let mut source: String = words.iter().map(|w| format!("say {w};\n")).collect();
        source.push_str("say \"");
        source.push_str(&tail);
        let result = tokenize(&source, 1, 1, true);
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_syntax());
    }

    #[test]
    fn statement_count_matches_semicolons(words in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let source: String = words.iter().map(|w| format!("say {w}; ")).collect();
        let statements = tokenize(&source, 1, 1, true).unwrap();
        prop_assert_eq!(statements.len(), words.len());
        for (statement, word) in statements.iter().zip(&words) {
            prop_assert_eq!(&statement.tokens()[1].text, word);
        }
    }
}
