//! Commands, function paths, and functions.
//!
//! A [`Function`] is an ordered, append-only list of [`Command`]s. Its
//! identity is a [`FunctionPath`]: lowercase, slash separated, relative to
//! the pack namespace.

use std::fmt;

/// Path segment under which compiler-generated functions live.
pub const PRIVATE_SEGMENT: &str = "__private__";

/// A single emitted command line.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Command(String);

impl Command {
    /// Creates a command from its text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the command text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this command calls another function.
    #[must_use]
    pub fn is_function_call(&self) -> bool {
        self.0.starts_with("function ") || self.0.contains(" run function ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Command {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Command {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// A function's path inside the namespace, e.g. `utils/reset`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionPath(String);

impl FunctionPath {
    /// Converts a dotted source name (`Utils.Reset`) into a path
    /// (`utils/reset`).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self(name.to_lowercase().replace('.', "/"))
    }

    /// Builds the path of a private function.
    #[must_use]
    pub fn private(feature: &str, name: &str) -> Self {
        Self(format!("{PRIVATE_SEGMENT}/{feature}/{name}"))
    }

    /// Returns the path text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespaced resource location, e.g. `pack:utils/reset`.
    #[must_use]
    pub fn resource_location(&self, namespace: &str) -> String {
        format!("{namespace}:{}", self.0)
    }

    /// Returns true if the path lies under the private segment.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.0 == PRIVATE_SEGMENT || self.0.starts_with(&format!("{PRIVATE_SEGMENT}/"))
    }

    /// Returns a new path with `prefix/` prepended.
    #[must_use]
    pub fn prefixed(&self, prefix: &Self) -> Self {
        if prefix.0.is_empty() {
            self.clone()
        } else {
            Self(format!("{}/{}", prefix.0, self.0))
        }
    }
}

impl fmt::Display for FunctionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered list of commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    path: FunctionPath,
    commands: Vec<Command>,
}

impl Function {
    /// Creates an empty function.
    #[must_use]
    pub fn new(path: FunctionPath) -> Self {
        Self {
            path,
            commands: Vec::new(),
        }
    }

    /// Creates a function holding the given commands.
    #[must_use]
    pub fn with_commands(path: FunctionPath, commands: Vec<Command>) -> Self {
        Self { path, commands }
    }

    /// Returns the function's path.
    #[must_use]
    pub fn path(&self) -> &FunctionPath {
        &self.path
    }

    /// Appends a command.
    pub fn push(&mut self, command: impl Into<Command>) {
        self.commands.push(command.into());
    }

    /// Appends several commands in order.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Removes and returns the trailing command.
    ///
    /// Only used to supersede a placeholder that turned out unnecessary.
    pub fn pop(&mut self) -> Option<Command> {
        self.commands.pop()
    }

    /// Returns the commands.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if the function has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Renders the `.mcfunction` file body.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            out.push_str(command.as_str());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_from_dotted_name() {
        assert_eq!(FunctionPath::from_name("Utils.Reset").as_str(), "utils/reset");
        assert_eq!(FunctionPath::from_name("main").as_str(), "main");
    }

    #[test]
    fn private_path() {
        let path = FunctionPath::private("while_loop", "3");
        assert_eq!(path.as_str(), "__private__/while_loop/3");
        assert!(path.is_private());
        assert!(!FunctionPath::from_name("__private_ish").is_private());
    }

    #[test]
    fn resource_location() {
        let path = FunctionPath::from_name("a.b");
        assert_eq!(path.resource_location("pack"), "pack:a/b");
    }

    #[test]
    fn prefixed_path() {
        let path = FunctionPath::from_name("tick");
        assert_eq!(path.prefixed(&FunctionPath::from_name("player")).as_str(), "player/tick");
        assert_eq!(path.prefixed(&FunctionPath::from_name("")).as_str(), "tick");
    }

    #[test]
    fn function_append_and_pop() {
        let mut f = Function::new(FunctionPath::from_name("main"));
        f.push("say a");
        f.push(Command::new("say b"));
        assert_eq!(f.len(), 2);
        assert_eq!(f.pop(), Some(Command::new("say b")));
        assert_eq!(f.render(), "say a\n");
    }

    #[test]
    fn command_detects_calls() {
        assert!(Command::new("function pack:main").is_function_call());
        assert!(Command::new("execute if entity @s run function pack:x").is_function_call());
        assert!(!Command::new("say function").is_function_call());
    }
}
