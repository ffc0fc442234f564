//! Integration tests for DataPack, Function, and FunctionPath

use quill_foundation::{Command, DataPack, Function, FunctionPath, INT_OBJECTIVE, VAR_OBJECTIVE};

// =============================================================================
// Paths
// =============================================================================

#[test]
fn dotted_names_become_paths() {
    let path = FunctionPath::from_name("Utils.Reset");
    assert_eq!(path.as_str(), "utils/reset");
    assert_eq!(path.resource_location("game"), "game:utils/reset");
    assert!(!path.is_private());
    assert!(FunctionPath::private("if_else", "0").is_private());
    assert_eq!(
        path.prefixed(&FunctionPath::from_name("lib")).as_str(),
        "lib/utils/reset"
    );
}

#[test]
fn render_ends_every_line() {
    let function = Function::with_commands(
        FunctionPath::from_name("greet"),
        vec![Command::new("say hi"), Command::new("say bye")],
    );
    assert_eq!(function.render(), "say hi\nsay bye\n");
    assert_eq!(Function::new(FunctionPath::from_name("empty")).render(), "");
}

// =============================================================================
// Load function
// =============================================================================

#[test]
fn load_begins_with_setup() {
    let mut pack = DataPack::new("demo");
    pack.load_function_mut().push(Command::new("say loaded"));
    pack.register_int(10);
    pack.register_int(2);
    assert!(pack.declare_objective("kills", "playerKillCount"));
    assert!(!pack.declare_objective("kills", "playerKillCount"));

    let load: Vec<String> = pack.load_commands().iter().map(ToString::to_string).collect();
    assert_eq!(
        load,
        vec![
            format!("scoreboard objectives add {VAR_OBJECTIVE} dummy"),
            format!("scoreboard objectives add {INT_OBJECTIVE} dummy"),
            "scoreboard objectives add kills playerKillCount".to_string(),
            format!("scoreboard players set 2 {INT_OBJECTIVE} 2"),
            format!("scoreboard players set 10 {INT_OBJECTIVE} 10"),
            "say loaded".to_string(),
        ]
    );
    assert_eq!(pack.setup_len(), 5);
}

#[test]
fn user_functions_before_private() {
    let mut pack = DataPack::new("demo");
    pack.add_function(FunctionPath::from_name("zeta")).unwrap();
    pack.private_mut().insert_next("if_else", vec![Command::new("say a")]).unwrap();
    assert!(pack.add_function(FunctionPath::from_name("zeta")).is_err());

    let paths: Vec<&str> = pack.all_functions().map(|f| f.path().as_str()).collect();
    assert_eq!(paths, vec!["__load__", "zeta", "__private__/if_else/0"]);
}

#[test]
fn resources_are_unique() {
    let mut pack = DataPack::new("demo");
    pack.add_resource("recipe", "sword", "{}".to_string()).unwrap();
    assert!(pack.add_resource("recipe", "sword", "{}".to_string()).unwrap_err().is_semantic());
    let (key, json) = pack.resources().next().unwrap();
    assert_eq!((key.kind.as_str(), key.path.as_str(), json), ("recipe", "sword", "{}"));
}
