//! Compiler configuration.

use std::path::{Path, PathBuf};

use quill_foundation::{Error, Result};

/// Settings for one compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Data pack namespace; every emitted function lives under it.
    pub namespace: String,
    /// Entry file, relative to `base_dir`.
    pub file: PathBuf,
    /// Directory that entry and `import` paths are resolved against.
    pub base_dir: PathBuf,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            namespace: "quill".to_string(),
            file: PathBuf::from("main.quill"),
            base_dir: PathBuf::from("."),
        }
    }
}

impl CompilerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the entry file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    /// Sets the base directory.
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Full path of the entry file.
    #[must_use]
    pub fn entry_path(&self) -> PathBuf {
        self.base_dir.join(&self.file)
    }

    /// Resolves an `import "name";` to a source file.
    #[must_use]
    pub fn import_path(&self, name: &str) -> PathBuf {
        let mut path = self.base_dir.join(name);
        if path.extension().is_none() {
            path.set_extension("quill");
        }
        path
    }

    /// Checks the namespace: non-empty, lowercase `[a-z0-9_.-]`.
    ///
    /// # Errors
    /// Returns a semantic error naming the offending character.
    pub fn validate(&self) -> Result<()> {
        validate_namespace(&self.namespace)
    }

    /// Display name of a source path for diagnostics.
    #[must_use]
    pub fn display_name(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Checks that `namespace` is a valid resource namespace.
///
/// # Errors
/// Returns a semantic error for an empty namespace or an invalid character.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(Error::semantic("namespace must not be empty"));
    }
    if let Some(bad) = namespace
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')))
    {
        return Err(Error::semantic(format!(
            "invalid character '{bad}' in namespace '{namespace}' (allowed: a-z 0-9 _ . -)"
        )));
    }
    Ok(())
}
