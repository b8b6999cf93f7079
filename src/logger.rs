//! Append-only file logger, installed once per process behind the `log`
//! facade.
//!
//! Grounded on `original_source/src/logger.c` / `include/logger.h`: a
//! `t_logger` wraps a `FILE *` opened in append mode plus a verbosity
//! level, and `LOGGER_log` branches on level and verbosity to decide which
//! sinks (stdout, stderr, file) receive a given record. This module keeps
//! that branching but expresses it as a `log::Log` implementation so the
//! rest of the crate logs with the ordinary `log::info!`/`log::error!`
//! macros instead of a bespoke varargs call.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Mirrors `t_logger`: a file sink plus a verbosity threshold.
pub struct Logger {
    file: Mutex<File>,
    verbosity: usize,
}

impl Logger {
    /// Opens (creating if necessary) `file_path` in append mode. Matches
    /// `LOGGER_initialize`'s failure behavior: a bad path is surfaced to
    /// the caller rather than silently falling back to stderr-only.
    pub fn initialize(file_path: &Path, verbosity: usize) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(file_path)?;
        Ok(Logger {
            file: Mutex::new(file),
            verbosity,
        })
    }

    /// Installs `self` as the global logger for the `log` crate. Must be
    /// called at most once per process, matching the one-shot
    /// initialization discipline of the builtin registry (spec §4.5).
    pub fn install(self, max_level: LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_max_level(max_level);
        log::set_boxed_logger(Box::new(self))
    }

    fn level_name(level: Level) -> &'static str {
        match level {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug | Level::Trace => "DEBUG",
        }
    }

    /// `<unix-seconds> [LEVEL]: <message>` — see spec §6. We avoid pulling
    /// in a date/time crate (the teacher's own `logger.c` has no
    /// dependency beyond libc `time()`), so the timestamp is seconds since
    /// the epoch rather than a calendar string.
    fn format(level: Level, args: &fmt::Arguments<'_>) -> String {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        format!("{secs} [{}]: {args}\n", Self::level_name(level))
    }
}

use std::fmt;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let is_info = record.level() == Level::Info;
        let line = Self::format(record.level(), record.args());

        if record.level() == Level::Error {
            eprint!("{line}");
        } else if self.verbosity > 0 {
            print!("{line}");
        }

        if !is_info || self.verbosity > 0 {
            if let Ok(mut file) = self.file.lock() {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_name_matches_spec_wire_format() {
        assert_eq!(Logger::level_name(Level::Error), "ERROR");
        assert_eq!(Logger::level_name(Level::Warn), "WARNING");
        assert_eq!(Logger::level_name(Level::Info), "INFO");
        assert_eq!(Logger::level_name(Level::Debug), "DEBUG");
    }

    #[test]
    fn initialize_appends_to_existing_file() {
        let dir = std::env::temp_dir().join(format!("lukac-logger-test-{:?}", std::thread::current().id()));
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("luka.log");
        let _ = std::fs::remove_file(&path);

        {
            let logger = Logger::initialize(&path, 1).expect("first open");
            drop(logger);
        }
        let logger = Logger::initialize(&path, 1);
        assert!(logger.is_ok());
    }
}
