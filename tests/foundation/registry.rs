//! Integration tests for PrivateFunctionRegistry

use quill_foundation::{Command, PrivateFunctionRegistry};

fn say(text: &str) -> Vec<Command> {
    vec![Command::new(format!("say {text}"))]
}

// =============================================================================
// Counters
// =============================================================================

#[test]
fn counters_are_per_feature() {
    let mut registry = PrivateFunctionRegistry::new();
    assert_eq!(registry.next_id("while_loop"), 0);
    assert_eq!(registry.next_id("while_loop"), 1);
    assert_eq!(registry.next_id("if_else"), 0);
    assert_eq!(registry.peek_id("while_loop"), 2);
    assert_eq!(registry.peek_id("switch_case"), 0);
}

#[test]
fn insert_next_numbers_sequentially() {
    let mut registry = PrivateFunctionRegistry::new();
    let paths: Vec<String> = (0..3)
        .map(|i| registry.insert_next("if_else", say(&i.to_string())).unwrap().to_string())
        .collect();
    assert_eq!(
        paths,
        vec!["__private__/if_else/0", "__private__/if_else/1", "__private__/if_else/2"]
    );
    assert_eq!(registry.count("if_else"), 3);
}

// =============================================================================
// Storage
// =============================================================================

#[test]
fn duplicate_names_are_rejected() {
    let mut registry = PrivateFunctionRegistry::new();
    registry.insert("math_sqrt", "main", say("a")).unwrap();
    let err = registry.insert("math_sqrt", "main", say("b")).unwrap_err();
    assert!(err.is_semantic());
    assert_eq!(registry.get("math_sqrt", "main").unwrap().commands()[0].as_str(), "say a");
}

#[test]
fn lookup_and_removal() {
    let mut registry = PrivateFunctionRegistry::new();
    registry.insert("switch_case", "0/1", say("one")).unwrap();
    registry.insert("switch_case", "0/2", say("two")).unwrap();
    assert!(registry.contains("switch_case", "0/2"));
    registry.get_mut("switch_case", "0/2").unwrap().push(Command::new("say more"));
    assert_eq!(registry.get("switch_case", "0/2").unwrap().len(), 2);
    assert!(registry.remove("switch_case", "0/1").is_some());
    assert_eq!(registry.feature("switch_case").count(), 1);
    assert_eq!(registry.len(), 1);
    assert!(!registry.is_empty());
}
