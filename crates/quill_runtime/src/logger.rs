//! A minimal stderr backend for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes `warn`/`info`/`debug` records to stderr with colored level tags.
pub struct Logger {
    level: LevelFilter,
}

impl Logger {
    /// Creates a logger that passes records at or above `level`.
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Installs a logger as the global `log` backend.
    ///
    /// Only the first call installs; later calls just adjust the maximum
    /// level.
    pub fn init(verbose: bool) {
        let level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        if log::set_boxed_logger(Box::new(Self::new(level))).is_err() {
            log::debug!("logger already installed");
        }
        log::set_max_level(level);
    }

    /// Formats a record's level tag and message.
    #[must_use]
    pub fn format(level: Level, message: &str) -> String {
        let tag = match level {
            Level::Error => "\x1b[31merror\x1b[0m",
            Level::Warn => "\x1b[33mwarning\x1b[0m",
            Level::Info => "\x1b[32minfo\x1b[0m",
            Level::Debug => "\x1b[2mdebug\x1b[0m",
            Level::Trace => "\x1b[2mtrace\x1b[0m",
        };
        format!("{tag}: {message}")
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", Self::format(record.level(), &record.args().to_string()));
        }
    }

    fn flush(&self) {}
}
