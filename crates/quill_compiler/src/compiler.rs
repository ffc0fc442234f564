//! Compiler for transforming Quill statements into a data pack.
//!
//! Each statement is classified by [`CommandKind`] and handed to its
//! handler. Handlers append commands to the output list of the body being
//! compiled; control flow and built-ins additionally register private
//! functions in the pack.

#![allow(clippy::needless_pass_by_value)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use quill_foundation::{
    Command, DataPack, Error, FunctionPath, LOAD_FUNCTION, Result, SourceLocation, TICK_FUNCTION,
    Warning,
};
use quill_language::{
    ConditionContext, ParenKind, RenderedCondition, Statement, Token, TokenKind, Tokenizer,
    VariableScope, compile_condition, join_tokens,
};

use crate::boxes::BlockBoxes;
use crate::command::{CommandKind, is_function_name};
use crate::config::CompilerConfig;
use crate::feature::LOGIC;
use crate::scope::ScopeStack;

/// Where a body is being compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Level {
    /// A file's top level; commands go to the load function.
    TopLevel,
    /// Inside `class name { ... }`; functions get the class path prefix.
    Class(FunctionPath),
    /// Inside a function, loop, branch, or event handler.
    Body,
}

/// Compiler state for one data pack.
#[derive(Debug)]
pub struct Compiler {
    /// Namespace and source locations.
    pub(crate) config: CompilerConfig,
    /// Everything produced so far.
    pub(crate) pack: DataPack,
    /// Warnings from every compiled file.
    warnings: Vec<Warning>,
    /// Number of warnings already logged.
    logged: usize,
    /// Active `for` loop variable renamings.
    pub(crate) scopes: ScopeStack,
    /// Canonical paths of files already compiled.
    imported: BTreeSet<PathBuf>,
    /// The user has defined `__tick__`.
    tick_defined: bool,
    /// The square root helper functions have been emitted.
    pub(crate) sqrt_emitted: bool,
}

impl Compiler {
    /// Creates a compiler with an empty pack.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        let pack = DataPack::new(config.namespace.clone());
        Self {
            config,
            pack,
            warnings: Vec::new(),
            logged: 0,
            scopes: ScopeStack::new(),
            imported: BTreeSet::new(),
            tick_defined: false,
            sqrt_emitted: false,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns the pack built so far.
    #[must_use]
    pub fn pack(&self) -> &DataPack {
        &self.pack
    }

    /// Consumes the compiler, returning the pack.
    #[must_use]
    pub fn into_pack(self) -> DataPack {
        self.pack
    }

    /// Returns every warning raised so far.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Compiles source text as if read from `file_name`.
    ///
    /// # Errors
    /// Returns the first syntax, semantic, or resource error, located in
    /// the file it occurred in.
    pub fn compile_str(&mut self, file_name: &str, source: &str) -> Result<()> {
        self.config.validate()?;
        let result = self.compile_source(file_name, source);
        self.flush_warnings();
        result
    }

    /// Compiles a source file from disk.
    ///
    /// # Errors
    /// Returns a resource error if the file cannot be read, otherwise see
    /// [`compile_str`](Self::compile_str).
    pub fn compile_file(&mut self, path: &Path) -> Result<()> {
        self.config.validate()?;
        let result = self.import_file(path, None);
        self.flush_warnings();
        result
    }

    /// Compiles the configured entry file.
    ///
    /// # Errors
    /// See [`compile_file`](Self::compile_file).
    pub fn compile_entry(&mut self) -> Result<()> {
        let path = self.config.entry_path();
        self.compile_file(&path)
    }

    fn flush_warnings(&mut self) {
        for warning in &self.warnings[self.logged..] {
            log::warn!("{warning}");
        }
        self.logged = self.warnings.len();
    }

    /// Records a warning.
    pub(crate) fn warn(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.warnings.push(Warning::new(message).with_location(location));
    }

    fn import_file(&mut self, path: &Path, at: Option<SourceLocation>) -> Result<()> {
        let source = fs::read_to_string(path).map_err(|err| {
            let error = Error::resource(format!("cannot read '{}': {err}", path.display()));
            match at {
                Some(location) => error.with_location(location),
                None => error,
            }
        })?;
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !self.imported.insert(key) {
            log::debug!("'{}' already compiled, skipping", path.display());
            return Ok(());
        }
        let name = self.config.display_name(path);
        self.compile_source(&name, &source)
    }

    /// Compiles one file and fills its name and line text into errors and
    /// warnings raised while compiling it.
    fn compile_source(&mut self, file_name: &str, source: &str) -> Result<()> {
        log::debug!("compiling {file_name}");
        let first_warning = self.warnings.len();
        let result = self.compile_top_level(source);
        for warning in &mut self.warnings[first_warning..] {
            if let Some(location) = warning.location.as_mut() {
                location.fill(file_name, source);
            }
        }
        result.map_err(|err| err.in_file(file_name, source))
    }

    fn compile_top_level(&mut self, source: &str) -> Result<()> {
        let statements = self.tokenize(source, 1, 1, true)?;
        let commands = self.compile_block(statements, &Level::TopLevel)?;
        self.pack.load_function_mut().extend(commands);
        Ok(())
    }

    fn tokenize(
        &mut self,
        source: &str,
        line: u32,
        column: u32,
        expect_semicolon: bool,
    ) -> Result<Vec<Statement>> {
        let mut tokenizer = Tokenizer::new(source)
            .starting_at(line, column)
            .expect_semicolon(expect_semicolon);
        let statements = tokenizer.tokenize()?;
        self.warnings.extend(tokenizer.take_warnings());
        Ok(statements)
    }

    /// Re-tokenizes the interior of a bracket group.
    pub(crate) fn tokenize_inner(
        &mut self,
        token: &Token,
        expect_semicolon: bool,
    ) -> Result<Vec<Statement>> {
        let Some(inner) = token.inner() else {
            return Err(self.error(token, format!("expected a bracket group, found '{}'", token.text)));
        };
        let (line, column) = token.inner_start();
        self.tokenize(inner, line, column, expect_semicolon)
    }

    /// Compiles the statements of a `{ ... }` body.
    pub(crate) fn compile_body(&mut self, curly: &Token) -> Result<Vec<Command>> {
        if !curly.is_paren(ParenKind::Curly) {
            return Err(self.error(curly, format!("expected '{{', found '{}'", curly.text)));
        }
        let statements = self.tokenize_inner(curly, true)?;
        self.compile_block(statements, &Level::Body)
    }

    /// Compiles a list of statements into commands.
    pub(crate) fn compile_block(
        &mut self,
        statements: Vec<Statement>,
        level: &Level,
    ) -> Result<Vec<Command>> {
        let mut out = Vec::new();
        let mut boxes = BlockBoxes::default();
        for statement in statements {
            let kind = CommandKind::classify(&statement);
            if kind != CommandKind::Else {
                self.flush_if_else(&mut boxes, &mut out)?;
            }
            if let Some(pending) = &boxes.do_while {
                if kind != CommandKind::While {
                    return Err(Error::syntax("expected 'while (condition);' after 'do' body")
                        .with_location(pending.location.clone()));
                }
            }
            self.compile_statement(statement, kind, level, &mut out, &mut boxes)?;
        }
        self.flush_if_else(&mut boxes, &mut out)?;
        if let Some(pending) = boxes.do_while {
            return Err(Error::syntax("expected 'while (condition);' after 'do' body")
                .with_location(pending.location));
        }
        Ok(out)
    }

    fn compile_statement(
        &mut self,
        statement: Statement,
        kind: CommandKind,
        level: &Level,
        out: &mut Vec<Command>,
        boxes: &mut BlockBoxes,
    ) -> Result<()> {
        let Some(first) = statement.first() else {
            return Ok(());
        };
        if matches!(level, Level::Class(_)) && kind != CommandKind::Function {
            return Err(self.error(first, "only function definitions may appear in a class"));
        }
        if *level != Level::TopLevel
            && matches!(kind, CommandKind::Class | CommandKind::Import | CommandKind::New)
        {
            return Err(self.error(first, format!("'{}' is only allowed at top level", first.text)));
        }

        match kind {
            CommandKind::Function => self.compile_function(&statement, level),
            CommandKind::Class => self.compile_class(&statement),
            CommandKind::Import => self.compile_import(&statement, out),
            CommandKind::New => self.compile_new(&statement),
            CommandKind::If => self.compile_if(&statement, boxes),
            CommandKind::Else => self.compile_else(&statement, boxes),
            CommandKind::While => self.compile_while(&statement, out, boxes),
            CommandKind::Do => self.compile_do(&statement, boxes),
            CommandKind::For => self.compile_for(&statement, out),
            CommandKind::Switch => self.compile_switch(&statement, out),
            CommandKind::Case => Err(self.error(first, "'case' outside of a switch")),
            CommandKind::Break => Err(self.error(first, "'break' outside of a switch")),
            CommandKind::Variable => self.compile_variable(&statement, out),
            CommandKind::Builtin(builtin) => self.compile_builtin(builtin, &statement, None, out),
            CommandKind::Call => {
                let call = self.compile_call(&statement)?;
                out.push(call);
                Ok(())
            }
            CommandKind::Vanilla => {
                out.push(Command::new(join_tokens(statement.tokens())));
                Ok(())
            }
        }
    }

    fn compile_function(&mut self, statement: &Statement, level: &Level) -> Result<()> {
        let tokens = statement.tokens();
        let keyword = &tokens[0];
        let [_, name, params, body] = tokens else {
            return Err(self.error(keyword, "expected 'function name() { ... }'"));
        };
        let prefix = match level {
            Level::TopLevel => None,
            Level::Class(prefix) => Some(prefix.clone()),
            Level::Body => {
                return Err(self.error(
                    keyword,
                    "function definitions are only allowed at top level or inside a class",
                ));
            }
        };
        let Some(name_text) = name.as_keyword().filter(|n| is_function_name(n)) else {
            return Err(self.error(name, format!("invalid function name '{}'", name.text)));
        };
        if !params.is_paren(ParenKind::Round) {
            return Err(self.error(params, "expected '()' after function name"));
        }
        if params.inner().is_some_and(|inner| !inner.trim().is_empty()) {
            return Err(self.error(params, "functions take no parameters"));
        }
        if !body.is_paren(ParenKind::Curly) {
            return Err(self.error(body, "expected '{' after function head"));
        }

        let mut path = FunctionPath::from_name(name_text);
        if let Some(prefix) = prefix {
            path = path.prefixed(&prefix);
        }
        let is_tick = path.as_str() == TICK_FUNCTION;
        if path.as_str() == LOAD_FUNCTION {
            return Err(Error::semantic(format!("'{LOAD_FUNCTION}' is reserved for the load function"))
                .with_location(name.span.location()));
        }
        if (is_tick && self.tick_defined) || (!is_tick && self.pack.has_function(&path)) {
            return Err(Error::semantic(format!("function '{path}' is already defined"))
                .with_location(name.span.location()));
        }
        if path.is_private() {
            self.warn(
                format!("function '{path}' is inside the private namespace and may be overwritten"),
                name.span.location(),
            );
        }

        log::debug!("defining function {path}");
        let commands = self.compile_body(body)?;
        if is_tick {
            self.tick_defined = true;
            self.pack.tick_function_mut().extend(commands);
        } else {
            self.pack
                .add_function(path)
                .map_err(|err| err.or_location(name.span.location()))?
                .extend(commands);
        }
        Ok(())
    }

    fn compile_class(&mut self, statement: &Statement) -> Result<()> {
        let tokens = statement.tokens();
        let [_, name, body] = tokens else {
            return Err(self.error(&tokens[0], "expected 'class name { ... }'"));
        };
        let Some(name_text) = name.as_keyword().filter(|n| is_function_name(n)) else {
            return Err(self.error(name, format!("invalid class name '{}'", name.text)));
        };
        if !body.is_paren(ParenKind::Curly) {
            return Err(self.error(body, "expected '{' after class name"));
        }
        let prefix = FunctionPath::from_name(name_text);
        let statements = self.tokenize_inner(body, true)?;
        self.compile_block(statements, &Level::Class(prefix))?;
        Ok(())
    }

    fn compile_import(&mut self, statement: &Statement, out: &mut Vec<Command>) -> Result<()> {
        let tokens = statement.tokens();
        let [_, target] = tokens else {
            return Err(self.error(&tokens[0], "expected 'import \"path\";'"));
        };
        if !matches!(target.kind, TokenKind::String(_)) {
            return Err(self.error(target, "import path must be a string"));
        }
        // Commands before the import keep their place in the load function.
        self.pack.load_function_mut().extend(out.drain(..));
        let path = self.config.import_path(target.value());
        self.import_file(&path, Some(target.span.location()))
    }

    fn compile_new(&mut self, statement: &Statement) -> Result<()> {
        let tokens = statement.tokens();
        let [_, kind, path, body] = tokens else {
            return Err(self.error(&tokens[0], "expected 'new kind(path) { json }'"));
        };
        let Some(kind_text) = kind
            .as_keyword()
            .filter(|k| k.chars().all(|c| c.is_ascii_lowercase() || matches!(c, '_' | '/')))
        else {
            return Err(self.error(kind, format!("invalid resource kind '{}'", kind.text)));
        };
        let path_text = path
            .inner()
            .filter(|_| path.is_paren(ParenKind::Round))
            .map(|inner| inner.trim().trim_matches('"').to_lowercase())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| self.error(path, "expected '(path)' after resource kind"))?;
        if !body.is_paren(ParenKind::Curly) {
            return Err(self.error(body, "expected '{' with JSON content"));
        }

        let value: serde_json::Value = serde_json::from_str(&body.text).map_err(|err| {
            let line = u32::try_from(err.line()).unwrap_or(1).max(1);
            let column = u32::try_from(err.column()).unwrap_or(1).max(1);
            let location = if line == 1 {
                SourceLocation::new("", body.line(), body.col() + column - 1)
            } else {
                SourceLocation::new("", body.line() + line - 1, column)
            };
            Error::resource(format!("invalid JSON in {kind_text} '{path_text}': {err}"))
                .with_location(location)
        })?;
        let json = serde_json::to_string_pretty(&value)
            .map_err(|err| Error::internal(format!("cannot serialize JSON: {err}")))?;
        self.pack
            .add_resource(kind_text, &path_text, json)
            .map_err(|err| err.or_location(path.span.location()))
    }

    /// Compiles `name();` into a `function` command.
    pub(crate) fn compile_call(&mut self, statement: &Statement) -> Result<Command> {
        let tokens = statement.tokens();
        let [name, paren] = tokens else {
            return Err(self.error(&tokens[0], "expected 'name()'"));
        };
        if paren.inner().is_some_and(|inner| !inner.trim().is_empty()) {
            return Err(self.error(paren, "functions take no arguments"));
        }
        let path = FunctionPath::from_name(&name.text);
        Ok(Command::new(self.call(&path)))
    }

    /// `function <namespace>:<path>`.
    pub(crate) fn call(&self, path: &FunctionPath) -> String {
        format!("function {}", path.resource_location(&self.config.namespace))
    }

    /// Parses and renders a condition with this compiler's scopes.
    pub(crate) fn condition(&mut self, paren: &Token) -> Result<RenderedCondition> {
        compile_condition(paren, self)
    }

    /// A syntax error located at `token`.
    pub(crate) fn error(&self, token: &Token, message: impl Into<String>) -> Error {
        Error::syntax(message).with_location(token.span.location())
    }
}

impl VariableScope for Compiler {
    fn resolve(&self, name: &str) -> Option<String> {
        self.scopes.resolve(name)
    }
}

impl ConditionContext for Compiler {
    fn next_logic_id(&mut self) -> u32 {
        self.pack.private_mut().next_id(LOGIC)
    }
}

/// Compiles a single source string into a pack.
///
/// # Errors
/// See [`Compiler::compile_str`].
pub fn compile(file_name: &str, source: &str, config: CompilerConfig) -> Result<DataPack> {
    let mut compiler = Compiler::new(config);
    compiler.compile_str(file_name, source)?;
    Ok(compiler.into_pack())
}
