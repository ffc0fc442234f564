//! The whole-compilation aggregate.
//!
//! A [`DataPack`] owns every function produced by one compilation together
//! with the scoreboard bookkeeping the load function needs.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::function::{Command, Function, FunctionPath};
use crate::registry::PrivateFunctionRegistry;

/// Objective holding `$name` variables.
pub const VAR_OBJECTIVE: &str = "__variable__";
/// Objective holding integer constants.
pub const INT_OBJECTIVE: &str = "__int__";
/// Name of the function run once at load.
pub const LOAD_FUNCTION: &str = "__load__";
/// Name of the function run every tick.
pub const TICK_FUNCTION: &str = "__tick__";

/// A declared scoreboard objective.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Objective {
    /// Objective name.
    pub name: String,
    /// Criteria, `dummy` for plain storage.
    pub criteria: String,
}

/// Key of a raw JSON resource: kind (`recipe`, `advancement`, ...) and path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    /// Resource kind, singular.
    pub kind: String,
    /// Path inside the namespace, slash separated.
    pub path: String,
}

/// Everything one compilation produces.
#[derive(Clone, Debug)]
pub struct DataPack {
    namespace: String,
    objectives: Vec<Objective>,
    ints: BTreeSet<i64>,
    functions: BTreeMap<FunctionPath, Function>,
    private: PrivateFunctionRegistry,
    resources: BTreeMap<ResourceKey, String>,
}

impl DataPack {
    /// Creates an empty pack. The variable objective is always declared.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        let mut pack = Self {
            namespace: namespace.into(),
            objectives: Vec::new(),
            ints: BTreeSet::new(),
            functions: BTreeMap::new(),
            private: PrivateFunctionRegistry::new(),
            resources: BTreeMap::new(),
        };
        pack.declare_objective(VAR_OBJECTIVE, "dummy");
        pack.functions.insert(
            FunctionPath::from_name(LOAD_FUNCTION),
            Function::new(FunctionPath::from_name(LOAD_FUNCTION)),
        );
        pack
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Declares an objective. Returns false if it was already declared.
    pub fn declare_objective(&mut self, name: &str, criteria: &str) -> bool {
        if self.objectives.iter().any(|o| o.name == name) {
            return false;
        }
        self.objectives.push(Objective {
            name: name.to_string(),
            criteria: criteria.to_string(),
        });
        true
    }

    /// Returns declared objectives in declaration order.
    #[must_use]
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Registers an integer that needs a constant scoreboard entry.
    pub fn register_int(&mut self, value: i64) {
        if self.ints.is_empty() {
            self.declare_objective(INT_OBJECTIVE, "dummy");
        }
        self.ints.insert(value);
    }

    /// Returns the registered integer constants in ascending order.
    #[must_use]
    pub fn ints(&self) -> &BTreeSet<i64> {
        &self.ints
    }

    /// Creates a new user function.
    ///
    /// # Errors
    /// Returns a semantic error if a function with that path exists.
    pub fn add_function(&mut self, path: FunctionPath) -> Result<&mut Function> {
        if self.functions.contains_key(&path) {
            return Err(Error::semantic(format!("function '{path}' is already defined")));
        }
        Ok(self
            .functions
            .entry(path.clone())
            .or_insert_with(|| Function::new(path)))
    }

    /// Looks up a user function.
    #[must_use]
    pub fn function(&self, path: &FunctionPath) -> Option<&Function> {
        self.functions.get(path)
    }

    /// Looks up a user function mutably.
    pub fn function_mut(&mut self, path: &FunctionPath) -> Option<&mut Function> {
        self.functions.get_mut(path)
    }

    /// Returns true if a user function exists at `path`.
    #[must_use]
    pub fn has_function(&self, path: &FunctionPath) -> bool {
        self.functions.contains_key(path)
    }

    /// Iterates over user functions, including load and tick.
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    /// Returns the user-written part of the load function.
    #[must_use]
    pub fn load_function(&self) -> Option<&Function> {
        self.functions.get(&FunctionPath::from_name(LOAD_FUNCTION))
    }

    /// Returns the load function mutably.
    pub fn load_function_mut(&mut self) -> &mut Function {
        let path = FunctionPath::from_name(LOAD_FUNCTION);
        self.functions
            .entry(path.clone())
            .or_insert_with(|| Function::new(path))
    }

    /// Returns the tick function if one exists.
    #[must_use]
    pub fn tick_function(&self) -> Option<&Function> {
        self.functions.get(&FunctionPath::from_name(TICK_FUNCTION))
    }

    /// Returns the tick function, creating it if necessary.
    pub fn tick_function_mut(&mut self) -> &mut Function {
        let path = FunctionPath::from_name(TICK_FUNCTION);
        self.functions
            .entry(path.clone())
            .or_insert_with(|| Function::new(path))
    }

    /// Returns the private function registry.
    #[must_use]
    pub fn private(&self) -> &PrivateFunctionRegistry {
        &self.private
    }

    /// Returns the private function registry mutably.
    pub fn private_mut(&mut self) -> &mut PrivateFunctionRegistry {
        &mut self.private
    }

    /// Stores a validated JSON resource.
    ///
    /// # Errors
    /// Returns a semantic error on a duplicate kind/path pair.
    pub fn add_resource(&mut self, kind: &str, path: &str, json: String) -> Result<()> {
        let key = ResourceKey {
            kind: kind.to_string(),
            path: path.to_string(),
        };
        if self.resources.contains_key(&key) {
            return Err(Error::semantic(format!("{kind} '{path}' is already defined")));
        }
        self.resources.insert(key, json);
        Ok(())
    }

    /// Iterates over JSON resources.
    pub fn resources(&self) -> impl Iterator<Item = (&ResourceKey, &str)> {
        self.resources.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Builds the complete load function: objective creation, constant
    /// initialization, then the user's top-level commands.
    #[must_use]
    pub fn load_commands(&self) -> Vec<Command> {
        let mut commands: Vec<Command> = self
            .objectives
            .iter()
            .map(|o| {
                Command::new(format!(
                    "scoreboard objectives add {} {}",
                    o.name, o.criteria
                ))
            })
            .collect();
        commands.extend(self.ints.iter().map(|n| {
            Command::new(format!("scoreboard players set {n} {INT_OBJECTIVE} {n}"))
        }));
        if let Some(load) = self.load_function() {
            commands.extend(load.commands().iter().cloned());
        }
        commands
    }

    /// Returns the number of scoreboard setup lines at the top of the load
    /// function.
    #[must_use]
    pub fn setup_len(&self) -> usize {
        self.objectives.len() + self.ints.len()
    }

    /// Iterates over every function that will be written, private ones last.
    pub fn all_functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values().chain(self.private.iter())
    }
}
