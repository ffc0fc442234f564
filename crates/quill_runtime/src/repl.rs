//! The interactive shell.
//!
//! Lines starting with a shell command (`compile`, `config`, `help`,
//! `exit`) run it. Anything else is compiled as a Quill snippet and the
//! commands it produces are printed. Errors are reported and the loop
//! keeps going.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use quill_compiler::{Compiler, compile};
use quill_foundation::{DataPack, Error, ErrorKind, Result};

use crate::config::PackConfig;
use crate::editor::{LineEditor, ReadResult, RustylineEditor, default_keywords, open_brackets};
use crate::package::{PackSummary, write_pack};

/// Compiles the configured entry file and writes the pack.
///
/// # Errors
///
/// Returns the first configuration, compile, or I/O error.
pub fn build(config: &PackConfig) -> Result<PackSummary> {
    config.validate()?;
    let mut compiler = Compiler::new(config.compiler_config());
    compiler.compile_entry()?;
    let warnings = compiler.warnings().len();
    let pack = compiler.into_pack();
    let summary = write_pack(&pack, config)?;
    if warnings > 0 {
        log::info!("finished with {warnings} warning(s)");
    }
    Ok(summary)
}

/// What one line of input asks the shell to do.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Input<'a> {
    Compile,
    ShowConfig,
    ReloadConfig,
    Help,
    Exit,
    Snippet(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "compile" => Self::Compile,
            "config" => Self::ShowConfig,
            "config reload" => Self::ReloadConfig,
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            source => Self::Snippet(source),
        }
    }
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Where the configuration was loaded from.
    config_path: PathBuf,

    /// Current project configuration.
    config: PackConfig,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,

    /// Continuation prompt (for multi-line input).
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(config_path: impl Into<PathBuf>, config: PackConfig) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, config_path, config))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(mut editor: E, config_path: impl Into<PathBuf>, config: PackConfig) -> Self {
        editor.set_keywords(default_keywords());
        Self {
            editor,
            config_path: config_path.into(),
            config,
            show_banner: true,
            prompt: "quill> ".to_string(),
            continuation_prompt: "...... ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Path the configuration is reloaded from.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };
        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        match self.eval(&input) {
            Ok(Some(output)) => {
                println!("{output}");
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                self.print_error(&e);
                Ok(true)
            }
        }
    }

    /// Reads a potentially multi-line input.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = String::new();
        let mut first_line = true;

        loop {
            let prompt = if first_line {
                &self.prompt
            } else {
                &self.continuation_prompt
            };

            match self.editor.read_line(prompt)? {
                ReadResult::Line(line) => {
                    if first_line {
                        input = line;
                    } else {
                        input.push('\n');
                        input.push_str(&line);
                    }
                    if Self::is_complete(&input) {
                        return Ok(Some(input));
                    }
                    first_line = false;
                }
                ReadResult::Interrupted => {
                    if !first_line {
                        println!("\nInput cancelled.");
                    }
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    if first_line {
                        return Ok(None);
                    }
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
    }

    /// Checks if input has no open brackets.
    fn is_complete(input: &str) -> bool {
        open_brackets(input) <= 0
    }

    /// Evaluates one complete input.
    ///
    /// Returns the text to print, or `None` when the shell should exit.
    ///
    /// # Errors
    ///
    /// Returns any error the command or snippet produced.
    pub fn eval(&mut self, input: &str) -> Result<Option<String>> {
        let output = match Input::parse(input) {
            Input::Exit => return Ok(None),
            Input::Help => Self::help_text(),
            Input::Compile => {
                let summary = build(&self.config)?;
                format!(
                    "wrote {} functions and {} resources to {}",
                    summary.functions,
                    summary.resources,
                    self.config.output_dir().display()
                )
            }
            Input::ShowConfig => serde_json::to_string_pretty(&self.config)
                .map_err(|e| Error::internal(format!("cannot encode configuration: {e}")))?,
            Input::ReloadConfig => {
                let config = PackConfig::load(&self.config_path)?;
                config.validate()?;
                self.config = config;
                format!("reloaded {}", self.config_path.display())
            }
            Input::Snippet(source) => {
                let pack = compile("<repl>", source, self.config.compiler_config())?;
                Self::format_pack(&pack)
            }
        };
        Ok(Some(output))
    }

    /// Lists the user commands of the load function, then every other
    /// function under a header.
    fn format_pack(pack: &DataPack) -> String {
        let mut lines: Vec<String> = pack
            .load_commands()
            .iter()
            .skip(pack.setup_len())
            .map(ToString::to_string)
            .collect();
        for function in pack.all_functions() {
            if pack.load_function().is_some_and(|load| load.path() == function.path()) {
                continue;
            }
            lines.push(format!(
                "\x1b[1m# {}\x1b[0m",
                function.path().resource_location(pack.namespace())
            ));
            lines.extend(function.commands().iter().map(|c| format!("  {c}")));
        }
        lines.join("\n")
    }

    fn help_text() -> String {
        "\x1b[1mCommands:\x1b[0m
    compile          Compile the entry file and write the pack
    config           Show the current configuration
    config reload    Re-read the configuration file
    help             Show this message
    exit             Leave the shell

Any other input is compiled as Quill source and the emitted commands are shown."
            .to_string()
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    fn print_banner(&self) {
        println!("\x1b[1;36mQuill\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!(
            "Project '{}' from {}. Type 'help' for commands, Ctrl+D to exit.\n",
            self.config.namespace,
            self.config_path.display()
        );
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// A simple mock editor for testing.
    struct MockEditor {
        inputs: Vec<String>,
        index: usize,
    }

    impl MockEditor {
        fn new(inputs: Vec<&str>) -> Self {
            Self {
                inputs: inputs.into_iter().map(String::from).collect(),
                index: 0,
            }
        }
    }

    impl LineEditor for MockEditor {
        fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
            if self.index < self.inputs.len() {
                let line = self.inputs[self.index].clone();
                self.index += 1;
                Ok(ReadResult::Line(line))
            } else {
                Ok(ReadResult::Eof)
            }
        }

        fn add_history(&mut self, _line: &str) {}

        fn set_keywords(&mut self, _keywords: Vec<String>) {}
    }

    fn project(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quill-repl-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn repl(inputs: Vec<&str>, dir: &Path) -> Repl<MockEditor> {
        let path = dir.join("quill.json");
        let config = PackConfig::load(&path).unwrap();
        Repl::with_editor(MockEditor::new(inputs), path, config).without_banner()
    }

    #[test]
    fn input_commands() {
        assert_eq!(Input::parse(" compile "), Input::Compile);
        assert_eq!(Input::parse("config"), Input::ShowConfig);
        assert_eq!(Input::parse("config reload"), Input::ReloadConfig);
        assert_eq!(Input::parse("quit"), Input::Exit);
        assert_eq!(Input::parse("say hi;"), Input::Snippet("say hi;"));
    }

    #[test]
    fn snippets_show_emitted_commands() {
        let dir = project("snippet");
        let mut repl = repl(vec![], &dir);
        let out = repl.eval("$x = 3; if ($x > 1) { say a; say b; }").unwrap().unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "scoreboard players set $x __variable__ 3");
        assert_eq!(
            lines[1],
            "execute if score $x __variable__ matches 2.. run function quill:__private__/if_else/0"
        );
        assert!(lines[2].contains("# quill:__private__/if_else/0"));
        assert_eq!(lines[3], "  say a");
    }

    #[test]
    fn errors_do_not_end_the_loop() {
        let dir = project("errors");
        let mut repl = repl(vec!["else { say a; }", "help", "exit", "say unreachable;"], &dir);
        repl.run().unwrap();
        // `exit` stops before the last line is read
        assert_eq!(repl.editor.index, 3);
    }

    #[test]
    fn multi_line_input() {
        let dir = project("multiline");
        let mut repl = repl(vec!["while ($i < 3) {", "  $i++;", "}"], &dir);
        let input = repl.read_input().unwrap().unwrap();
        assert_eq!(input, "while ($i < 3) {\n  $i++;\n}");
        assert!(repl.read_input().unwrap().is_none());
    }

    #[test]
    fn eof_inside_block_is_an_error() {
        let dir = project("eof");
        let mut repl = repl(vec!["if ($x) {"], &dir);
        assert!(repl.read_input().is_err());
    }

    #[test]
    fn compile_and_reload() {
        let dir = project("compile");
        fs::write(dir.join("main.quill"), "say built;").unwrap();
        let mut repl = repl(vec![], &dir);
        let out = repl.eval("compile").unwrap().unwrap();
        assert!(out.starts_with("wrote 1 functions"));
        assert!(dir.join("build/data/quill/functions/__load__.mcfunction").exists());

        fs::write(dir.join("quill.json"), r#"{ "namespace": "arena" }"#).unwrap();
        repl.eval("config reload").unwrap();
        assert_eq!(repl.config().namespace, "arena");
        assert!(repl.eval("config").unwrap().unwrap().contains("\"arena\""));

        fs::write(dir.join("quill.json"), r#"{ "namespace": "No Caps" }"#).unwrap();
        assert!(repl.eval("config reload").is_err());
        assert_eq!(repl.config().namespace, "arena");
    }

    #[test]
    fn build_reports_missing_entry() {
        let dir = project("missing");
        let config = PackConfig::default().with_root(&dir);
        assert!(build(&config).unwrap_err().is_resource());
    }
}
