//! Integration tests for condition rendering

use quill_language::{LogicCounter, RenderedCondition, compile_condition, tokenize};

fn render(source: &str) -> RenderedCondition {
    let statements = tokenize(source, 1, 1, false).unwrap();
    let paren = &statements[0].tokens()[0];
    compile_condition(paren, &mut LogicCounter::default()).unwrap()
}

// =============================================================================
// Plain conditions
// =============================================================================

#[test]
fn raw_condition_passes_through() {
    let rendered = render("(entity @p[distance=..5])");
    assert_eq!(rendered.guard("say near"), "execute if entity @p[distance=..5] run say near");
    assert!(rendered.precommands.is_empty());
}

#[test]
fn conjunction_is_inline() {
    let rendered = render("($a >= 2 && kills:@s == 1..3 && !$b)");
    assert_eq!(
        rendered.inline(),
        "if score $a __variable__ matches 2.. if score @s kills matches 1..3 unless score $b __variable__ matches 1.."
    );
}

#[test]
fn score_against_score() {
    let rendered = render("($a < $b)");
    assert_eq!(rendered.inline(), "if score $a __variable__ < $b __variable__");
}

// =============================================================================
// Disjunction
// =============================================================================

#[test]
fn each_disjunction_gets_a_fresh_flag() {
    let rendered = render("(($a || $b) && ($c || $d))");
    assert_eq!(
        rendered.inline(),
        "if score __logic__0 __variable__ matches 1 if score __logic__1 __variable__ matches 1"
    );
    assert_eq!(rendered.precommands.len(), 6);
    assert_eq!(rendered.precommands[3], "scoreboard players set __logic__1 __variable__ 0");
}

#[test]
fn malformed_conditions() {
    for source in ["()", "($a ||)", "(&& $a)", "($a !)"] {
        let statements = tokenize(source, 1, 1, false).unwrap();
        let paren = &statements[0].tokens()[0];
        let err = compile_condition(paren, &mut LogicCounter::default()).unwrap_err();
        assert!(err.is_syntax(), "{source}");
    }
}
