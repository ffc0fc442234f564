//! Integration tests for if/else, loops, and switch lowering

use proptest::prelude::*;

use crate::{load, pack, private};

// =============================================================================
// If / else
// =============================================================================

#[test]
fn hello_world_is_inlined() {
    let pack = pack("if (condition) { say \"Hello World\"; }");
    assert_eq!(load(&pack), vec!["execute if condition run say Hello World"]);
    assert!(pack.private().is_empty());
}

#[test]
fn if_without_else_needs_no_flag() {
    let pack = pack("if ($a) { say one; say two; }");
    assert_eq!(pack.private().count("if_else"), 1);
    assert!(load(&pack).iter().all(|c| !c.contains("__if_else__")));
}

#[test]
fn chain_has_one_function_per_branch() {
    let source = "
        if ($hp <= 0) { say dead; }
        else if ($hp < 5) { say hurt; }
        else if ($hp < 10) { say scratched; }
        else { say fine; }
    ";
    let pack = pack(source);
    assert_eq!(pack.private().count("if_else"), 4);
    let load = load(&pack);
    assert_eq!(load[0], "scoreboard players set __if_else__ __variable__ 0");
    assert_eq!(
        load.last().unwrap(),
        "execute if score __if_else__ __variable__ matches 0 run function test:__private__/if_else/3"
    );
    assert_eq!(
        private(&pack, "if_else", "1"),
        vec!["say hurt", "scoreboard players set __if_else__ __variable__ 1"]
    );
    assert_eq!(private(&pack, "if_else", "3"), vec!["say fine"]);
}

#[test]
fn nested_chain_restores_the_outer_flag() {
    let pack = pack("if ($a) { if ($b) { say x; } else { say y; } } else { say z; }");
    assert_eq!(pack.private().count("if_else"), 4);
    assert_eq!(
        private(&pack, "if_else", "2"),
        vec![
            "scoreboard players set __if_else__ __variable__ 0",
            "execute if score $b __variable__ matches 1.. run function test:__private__/if_else/0",
            "execute if score __if_else__ __variable__ matches 0 run function test:__private__/if_else/1",
            "scoreboard players set __if_else__ __variable__ 1",
        ]
    );
    assert_eq!(
        load(&pack),
        vec![
            "scoreboard players set __if_else__ __variable__ 0",
            "execute if score $a __variable__ matches 1.. run function test:__private__/if_else/2",
            "execute if score __if_else__ __variable__ matches 0 run function test:__private__/if_else/3",
        ]
    );
    assert_eq!(private(&pack, "if_else", "3"), vec!["say z"]);
}

#[test]
fn out_of_range_comparison_is_a_syntax_error() {
    for source in [
        "if ($x > 9223372036854775807) { say a; }",
        "if ($x < -9223372036854775808) { say a; }",
        "while ($x > 2147483647) { $x--; }",
    ] {
        let err = quill_compiler::compile("main.quill", source, quill_compiler::CompilerConfig::new())
            .unwrap_err();
        assert!(err.is_syntax(), "{source}");
    }
}

#[test]
fn statement_after_chain_closes_it() {
    let pack = pack("if ($a) { say a; } say between; if ($b) { say b; } else { say c; }");
    let load = load(&pack);
    assert_eq!(load[0], "execute if score $a __variable__ matches 1.. run say a");
    assert_eq!(load[1], "say between");
    assert_eq!(pack.private().count("if_else"), 2);
}

// =============================================================================
// Loops
// =============================================================================

#[test]
fn three_while_loops_are_numbered_in_order() {
    let pack = pack("while ($a) { $a--; } while ($b) { $b--; } while ($c) { $c--; }");
    for id in ["0", "1", "2"] {
        assert!(pack.private().contains("while_loop", id));
    }
    assert_eq!(
        load(&pack)[2],
        "execute if score $c __variable__ matches 1.. run function test:__private__/while_loop/2"
    );
}

#[test]
fn do_while_runs_body_first() {
    let pack = pack("do { $n++; } while ($n < 10);");
    assert_eq!(load(&pack), vec!["function test:__private__/do_while_loop/0"]);
    assert_eq!(
        private(&pack, "do_while_loop", "0"),
        vec![
            "scoreboard players add $n __variable__ 1",
            "execute if score $n __variable__ matches ..9 run function test:__private__/do_while_loop/0",
        ]
    );
}

#[test]
fn for_loop_variable_is_scoped() {
    let pack = pack("for (let $i = 0; $i < 3; $i++) { say tick; } $i = 7;");
    let load = load(&pack);
    assert_eq!(load[0], "scoreboard players set $__for_0__i __variable__ 0");
    assert_eq!(load.last().unwrap(), "scoreboard players set $i __variable__ 7");
    let body = private(&pack, "for_loop", "0");
    assert!(body.contains(&"scoreboard players add $__for_0__i __variable__ 1".to_string()));
}

#[test]
fn nested_for_loops_get_their_own_counters() {
    let pack = pack(
        "for (let $i = 0; $i < 3; $i++) { for (let $i = 0; $i < 2; $i++) { say x; } $j += $i; }",
    );
    assert_eq!(
        load(&pack),
        vec![
            "scoreboard players set $__for_0__i __variable__ 0",
            "execute if score $__for_0__i __variable__ matches ..2 run function test:__private__/for_loop/0",
        ]
    );
    assert_eq!(
        private(&pack, "for_loop", "0"),
        vec![
            "scoreboard players set $__for_1__i __variable__ 0",
            "execute if score $__for_1__i __variable__ matches ..1 run function test:__private__/for_loop/1",
            "scoreboard players operation $j __variable__ += $__for_0__i __variable__",
            "scoreboard players add $__for_0__i __variable__ 1",
            "execute if score $__for_0__i __variable__ matches ..2 run function test:__private__/for_loop/0",
        ]
    );
    assert_eq!(
        private(&pack, "for_loop", "1"),
        vec![
            "say x",
            "scoreboard players add $__for_1__i __variable__ 1",
            "execute if score $__for_1__i __variable__ matches ..1 run function test:__private__/for_loop/1",
        ]
    );
}

#[test]
fn loops_nest() {
    let pack = pack("while ($a) { while ($b) { $b--; } $a--; }");
    assert_eq!(pack.private().count("while_loop"), 2);
    let outer = private(&pack, "while_loop", "0");
    assert!(outer[0].ends_with("function test:__private__/while_loop/1"));
}

// =============================================================================
// Switch
// =============================================================================

fn switch_source(cases: usize) -> String {
    let mut source = String::from("switch ($x) {");
    for k in 1..=cases {
        source.push_str(&format!(" case {k}: say {k}; break;"));
    }
    source.push_str(" }");
    source
}

/// Parses `execute if score $x __variable__ matches R run function test:P`.
fn test_range(command: &str) -> (i64, i64, String) {
    let rest = command
        .strip_prefix("execute if score $x __variable__ matches ")
        .unwrap();
    let (range, call) = rest.split_once(" run function test:").unwrap();
    let (lo, hi) = match range.split_once("..") {
        Some((lo, hi)) => (lo.parse().unwrap(), hi.parse().unwrap()),
        None => (range.parse().unwrap(), range.parse().unwrap()),
    };
    (lo, hi, call.to_string())
}

/// Number of range tests executed before case `k` runs.
fn depth(pack: &quill_foundation::DataPack, k: i64) -> usize {
    let mut commands = load(pack);
    let mut steps = 0;
    loop {
        let (_, _, call) = commands
            .iter()
            .map(|c| test_range(c))
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&k))
            .unwrap();
        steps += 1;
        let name = call.strip_prefix("__private__/switch_case/").unwrap();
        if name == format!("0/{k}") {
            return steps;
        }
        commands = private(pack, "switch_case", name);
    }
}

#[test]
fn five_cases_split_at_two() {
    let pack = pack(&switch_source(5));
    let roots: Vec<(i64, i64)> = load(&pack).iter().map(|c| test_range(c)).map(|(lo, hi, _)| (lo, hi)).collect();
    assert_eq!(roots, vec![(1, 2), (3, 5)]);
    assert_eq!(depth(&pack, 5), 3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn switch_depth_is_logarithmic(cases in 2usize..48) {
        let pack = pack(&switch_source(cases));
        let leaves = (1..=cases).filter(|k| pack.private().contains("switch_case", &format!("0/{k}"))).count();
        prop_assert_eq!(leaves, cases);
        prop_assert_eq!(pack.private().count("switch_case"), 2 * cases - 2);

        let expected = usize::try_from(cases.next_power_of_two().trailing_zeros()).unwrap();
        let deepest = (1..=cases).map(|k| depth(&pack, i64::try_from(k).unwrap())).max().unwrap();
        prop_assert_eq!(deepest, expected);
    }

    #[test]
    fn while_loops_are_numbered_sequentially(count in 1usize..12) {
        let source: String = (0..count).map(|i| format!("while ($v{i}) {{ $v{i}--; }} ")).collect();
        let pack = pack(&source);
        prop_assert_eq!(pack.private().count("while_loop"), count);
        for id in 0..count {
            prop_assert!(pack.private().contains("while_loop", &id.to_string()));
        }
    }
}
