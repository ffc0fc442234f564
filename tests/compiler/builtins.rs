//! Integration tests for built-in library calls inside programs

use quill_compiler::{Builtin, CompilerConfig, compile};

use crate::{load, pack, private};

#[test]
fn sqrt_helpers_registered_once() {
    let pack = pack("$i = Math.sqrt($x);\n$i = Math.sqrt($x);");
    assert_eq!(pack.private().count("math_sqrt"), 2);
    assert!(pack.private().contains("math_sqrt", "main"));
    assert!(pack.private().contains("math_sqrt", "newton_raphson"));
    let calls = load(&pack)
        .iter()
        .filter(|c| c.ends_with("function test:__private__/math_sqrt/main"))
        .count();
    assert_eq!(calls, 2);
}

#[test]
fn builtins_inside_loop_bodies() {
    let pack = pack("while ($n > 0) { $r = Math.random(1, 6); Text.tellraw(@a, \"rolled\"); $n--; }");
    let body = private(&pack, "while_loop", "0");
    assert_eq!(body[0], "execute store result score $r __variable__ run random value 1..6");
    assert_eq!(body[1], "tellraw @a \"rolled\"");
}

#[test]
fn event_handlers_share_the_tick_function() {
    let source = "
        function __tick__() { say tick; }
        Player.onEvent(deaths, () => { say died; }, criteria=\"deathCount\");
    ";
    let pack = pack(source);
    let tick: Vec<&str> = pack.tick_function().unwrap().commands().iter().map(|c| c.as_str()).collect();
    assert_eq!(
        tick,
        vec![
            "say tick",
            "execute as @a[scores={deaths=1..}] at @s run function test:__private__/on_event/0",
        ]
    );
}

#[test]
fn keyword_arguments_and_defaults() {
    let pack = pack("Scoreboard.add(points); Particle.circle(flame, spread=4, radius=1.5);");
    assert!(pack.objectives().iter().any(|o| o.name == "points" && o.criteria == "dummy"));
    let load = load(&pack);
    assert_eq!(load.len(), 4);
    assert_eq!(load[0], "particle flame ^1.5 ^ ^");
}

#[test]
fn signature_errors_are_semantic() {
    for source in [
        "$x = Math.sqrt();",
        "$x = Math.sqrt(1, 2);",
        "$x = Math.random(min=1, low=2);",
        "Scoreboard.add(points, criteria=1, criteria=2);",
        "Particle.circle(flame, radius=big);",
    ] {
        let err = compile("main.quill", source, CompilerConfig::new()).unwrap_err();
        assert!(err.is_semantic() || err.is_syntax(), "{source}: {err}");
    }
}

#[test]
fn table_is_closed() {
    let names: Vec<&str> = Builtin::ALL.iter().map(|b| b.name()).collect();
    assert_eq!(
        names,
        vec!["Math.sqrt", "Math.random", "Scoreboard.add", "Player.onEvent", "Particle.circle", "Text.tellraw"]
    );
    assert!(Builtin::lookup("Math.pow").is_none());
}
