//! Stderr logging backend for the `log` facade.
//!
//! The library logs through `log::` macros only; this module provides the
//! binary's backend. Stderr keeps stdout clean for the JSON summary, and
//! the level is controlled with the `COREBENCH_LOG` environment variable
//! (error|warn|info|debug|trace, default info).

use log::{Level, LevelFilter, Log, Metadata, Record};

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        eprintln!("[{}] {}", tag, record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Level requested via `COREBENCH_LOG`, defaulting to info.
fn level_from_env() -> LevelFilter {
    match std::env::var("COREBENCH_LOG").as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") => LevelFilter::Warn,
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        Ok("off") => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Install the stderr logger. Safe to call more than once; later calls are
/// no-ops because the facade accepts a single global logger.
pub fn initialize_logging() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level_from_env());
    }
}
