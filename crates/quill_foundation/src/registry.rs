//! Registry of compiler-generated private functions.
//!
//! Each feature (`if_else`, `while_loop`, `switch_case`, ...) owns a
//! counter that only ever increases during a compilation, so every private
//! function path `__private__/<feature>/<name>` is unique.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::function::{Command, Function, FunctionPath};

/// Counters and storage for private functions.
#[derive(Clone, Debug, Default)]
pub struct PrivateFunctionRegistry {
    /// Next id per feature.
    counters: HashMap<String, u32>,
    /// Generated functions per feature, keyed by name.
    functions: BTreeMap<String, BTreeMap<String, Function>>,
}

impl PrivateFunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id for `feature` and advances its counter.
    pub fn next_id(&mut self, feature: &str) -> u32 {
        let counter = self.counters.entry(feature.to_string()).or_insert(0);
        let id = *counter;
        *counter += 1;
        id
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) would yield.
    #[must_use]
    pub fn peek_id(&self, feature: &str) -> u32 {
        self.counters.get(feature).copied().unwrap_or(0)
    }

    /// Registers a function under `feature`/`name` and returns its path.
    ///
    /// # Errors
    /// Returns a semantic error if the name is already taken.
    pub fn insert(
        &mut self,
        feature: &str,
        name: &str,
        commands: Vec<Command>,
    ) -> Result<FunctionPath> {
        let path = FunctionPath::private(feature, name);
        let bucket = self.functions.entry(feature.to_string()).or_default();
        if bucket.contains_key(name) {
            return Err(Error::semantic(format!(
                "private function {path} is already defined"
            )));
        }
        bucket.insert(
            name.to_string(),
            Function::with_commands(path.clone(), commands),
        );
        Ok(path)
    }

    /// Allocates a fresh id for `feature` and registers the commands under it.
    ///
    /// # Errors
    /// Returns a semantic error if the generated name collides, which can
    /// only happen if a caller registered a numeric name by hand.
    pub fn insert_next(&mut self, feature: &str, commands: Vec<Command>) -> Result<FunctionPath> {
        let id = self.next_id(feature);
        self.insert(feature, &id.to_string(), commands)
    }

    /// Returns true if `feature`/`name` is registered.
    #[must_use]
    pub fn contains(&self, feature: &str, name: &str) -> bool {
        self.functions
            .get(feature)
            .is_some_and(|bucket| bucket.contains_key(name))
    }

    /// Looks up a registered function.
    #[must_use]
    pub fn get(&self, feature: &str, name: &str) -> Option<&Function> {
        self.functions.get(feature)?.get(name)
    }

    /// Looks up a registered function mutably.
    pub fn get_mut(&mut self, feature: &str, name: &str) -> Option<&mut Function> {
        self.functions.get_mut(feature)?.get_mut(name)
    }

    /// Removes a registered function, returning it.
    pub fn remove(&mut self, feature: &str, name: &str) -> Option<Function> {
        self.functions.get_mut(feature)?.remove(name)
    }

    /// Returns the functions registered for `feature`.
    pub fn feature(&self, feature: &str) -> impl Iterator<Item = &Function> {
        self.functions
            .get(feature)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Returns the number of functions registered for `feature`.
    #[must_use]
    pub fn count(&self, feature: &str) -> usize {
        self.functions.get(feature).map_or(0, BTreeMap::len)
    }

    /// Iterates over every registered function.
    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values().flat_map(BTreeMap::values)
    }

    /// Returns the total number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.values().map(BTreeMap::len).sum()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
