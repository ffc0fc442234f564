//! Quill CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use quill_runtime::{CONFIG_FILE, Logger, PackConfig, Repl, build};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    config: Option<PathBuf>,
    batch_mode: bool,
    verbose: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    for arg in args.into_iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "-v" | "--verbose" => config.verbose = true,
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}").into());
            }
            path => {
                if config.config.is_some() {
                    return Err(format!("unexpected argument: {path}").into());
                }
                config.config = Some(PathBuf::from(path));
            }
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("quill {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = PackConfig::load(&path)?;
    config.validate()?;
    Logger::init(cli.verbose || config.verbose);

    if cli.batch_mode {
        build(&config)?;
        return Ok(());
    }

    let mut repl = Repl::new(path, config)?;
    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mQuill\x1b[0m - Compile Quill scripts into data pack functions

\x1b[1mUSAGE:\x1b[0m
    quill [OPTIONS] [CONFIG]

\x1b[1mARGUMENTS:\x1b[0m
    [CONFIG]    Project configuration file (default: {CONFIG_FILE})

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -b, --batch        Compile once and exit (no REPL)
    -v, --verbose      Log every file read and written

\x1b[1mEXAMPLES:\x1b[0m
    quill                        Start the shell for ./{CONFIG_FILE}
    quill -b                     Build the pack and exit
    quill -b -v game/quill.json  Build another project with debug logging

\x1b[1mREPL COMMANDS:\x1b[0m
    compile              Compile the entry file and write the pack
    config               Show the configuration
    config reload        Re-read the configuration file
    help                 List commands
    exit                 Leave (or Ctrl+D)
    <source>             Compile a snippet and show its commands"
    );
}
