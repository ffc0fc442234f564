//! Project configuration stored in `quill.json`.
//!
//! Paths in the file are relative to the directory holding it. A missing
//! file yields the defaults; a malformed one is a resource error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quill_compiler::{CompilerConfig, validate_namespace};
use quill_foundation::{Error, ErrorKind, Result, SourceLocation};
use serde::{Deserialize, Serialize};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "quill.json";

/// Settings for building one data pack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Data pack namespace.
    pub namespace: String,
    /// Description written to `pack.mcmeta`.
    pub description: String,
    /// `pack_format` written to `pack.mcmeta`.
    pub pack_format: u32,
    /// Entry source file.
    pub target: PathBuf,
    /// Output directory; the pack root.
    pub output: PathBuf,
    /// Log debug output.
    pub verbose: bool,
    /// Directory the file was loaded from.
    #[serde(skip)]
    pub(crate) root: PathBuf,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            namespace: "quill".to_string(),
            description: "Compiled with Quill".to_string(),
            pack_format: 26,
            target: PathBuf::from("main.quill"),
            output: PathBuf::from("build"),
            verbose: false,
            root: PathBuf::from("."),
        }
    }
}

impl PackConfig {
    /// Loads a configuration file, falling back to the defaults when it
    /// does not exist.
    ///
    /// # Errors
    /// Returns an I/O error if the file exists but cannot be read, and a
    /// resource error if it is not valid configuration JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("'{}' not found, using default configuration", path.display());
                return Ok(Self::default().with_root(root));
            }
            Err(err) => return Err(io_error(path, &err)),
        };
        let config: Self = serde_json::from_str(&text).map_err(|err| {
            let line = u32::try_from(err.line()).unwrap_or(0);
            let column = u32::try_from(err.column()).unwrap_or(0);
            let file = path.display().to_string();
            Error::resource(format!("invalid configuration: {err}"))
                .with_location(SourceLocation::in_source(file, &text, line, column))
        })?;
        Ok(config.with_root(root))
    }

    /// Writes the configuration as pretty JSON.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| Error::internal(format!("cannot encode configuration: {err}")))?;
        fs::write(path, json + "\n").map_err(|err| io_error(path, &err))
    }

    /// Sets the directory relative paths are resolved against.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Directory relative paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute or root-relative output directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    /// Compiler settings for this project.
    #[must_use]
    pub fn compiler_config(&self) -> CompilerConfig {
        CompilerConfig::new()
            .with_namespace(self.namespace.clone())
            .with_base_dir(self.root.clone())
            .with_file(self.target.clone())
    }

    /// Checks the namespace and pack format.
    ///
    /// # Errors
    /// Returns a semantic error describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        validate_namespace(&self.namespace)?;
        if self.pack_format == 0 {
            return Err(Error::semantic("pack_format must be positive"));
        }
        Ok(())
    }
}

/// An I/O error naming the path it concerns.
pub(crate) fn io_error(path: &Path, err: &io::Error) -> Error {
    Error::new(ErrorKind::Io(io::Error::new(
        err.kind(),
        format!("{}: {err}", path.display()),
    )))
}
