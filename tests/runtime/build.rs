//! Integration tests for configuration loading and pack output

use std::fs;
use std::path::{Path, PathBuf};

use quill_runtime::{CONFIG_FILE, PackConfig, build};

fn project(name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quill-rt-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    for (path, contents) in files {
        let path = dir.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

// =============================================================================
// Build
// =============================================================================

#[test]
fn builds_configured_project() {
    let config = r#"{
        "namespace": "arena",
        "description": "Arena minigame",
        "target": "src/game.quill",
        "output": "dist"
    }"#;
    let game = "
        import \"src/rounds\";
        function __tick__() { $t++; }
        new advancement(first_blood) { \"criteria\": {} }
        while ($round < 3) { next_round(); }
    ";
    let rounds = "function next_round() { $round++; say next; }";
    let dir = project(
        "configured",
        &[(CONFIG_FILE, config), ("src/game.quill", game), ("src/rounds.quill", rounds)],
    );

    let config = PackConfig::load(&dir.join(CONFIG_FILE)).unwrap();
    let summary = build(&config).unwrap();
    assert_eq!(summary.functions, 4);
    assert_eq!(summary.resources, 1);

    let out = dir.join("dist");
    let meta: serde_json::Value = serde_json::from_str(&read(&out.join("pack.mcmeta"))).unwrap();
    assert_eq!(meta["pack"]["description"], "Arena minigame");

    let functions = out.join("data/arena/functions");
    assert_eq!(read(&functions.join("next_round.mcfunction")), "scoreboard players add $round __variable__ 1\nsay next\n");
    let load = read(&functions.join("__load__.mcfunction"));
    assert!(load.starts_with("scoreboard objectives add __variable__ dummy\n"));
    assert!(load.ends_with("run function arena:__private__/while_loop/0\n"));
    assert!(functions.join("__private__/while_loop/0.mcfunction").exists());
    assert!(out.join("data/arena/advancements/first_blood.json").exists());

    let load_tag: serde_json::Value =
        serde_json::from_str(&read(&out.join("data/minecraft/tags/functions/load.json"))).unwrap();
    assert_eq!(load_tag["values"][0], "arena:__load__");
    assert!(out.join("data/minecraft/tags/functions/tick.json").exists());
}

#[test]
fn failed_build_writes_nothing() {
    let dir = project("failed", &[("main.quill", "if ($x) { say a;")]);
    let config = PackConfig::load(&dir.join(CONFIG_FILE)).unwrap();
    let err = build(&config).unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.location.unwrap().file, "main.quill");
    assert!(!dir.join("build").exists());
}

#[test]
fn invalid_namespace_is_rejected_before_compiling() {
    let dir = project("namespace", &[(CONFIG_FILE, r#"{ "namespace": "My Pack" }"#)]);
    let config = PackConfig::load(&dir.join(CONFIG_FILE)).unwrap();
    assert!(build(&config).unwrap_err().is_semantic());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn defaults_round_trip_through_file() {
    let dir = project("defaults", &[]);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(CONFIG_FILE);
    let config = PackConfig::load(&path).unwrap();
    config.save(&path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(saved["namespace"], "quill");
    assert_eq!(saved["pack_format"], 26);
    assert!(saved.get("root").is_none());
}
