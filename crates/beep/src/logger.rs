//! Stderr logger for the command line.
//!
//! Messages go out as `beep: <level>: <message>`. The level filter is raised
//! from the default (errors and warnings) by `--verbose`.

use std::io::{self, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct StderrLogger {
    program: &'static str,
}

impl StderrLogger {
    pub const fn new(program: &'static str) -> Self {
        Self { program }
    }

    fn format(&self, record: &Record) -> String {
        let level = match record.level() {
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        format!("{}: {}: {}", self.program, level, record.args())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(io::stderr().lock(), "{}", self.format(record));
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger::new("beep");

/// Maps the number of `--verbose` flags to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(max_level: LevelFilter) {
    match log::set_logger(&LOGGER) {
        Ok(()) => {
            log::set_max_level(max_level);
        }
        Err(_) => {
            // Logger already set
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(3), LevelFilter::Trace);
        assert_eq!(level_for(u8::MAX), LevelFilter::Trace);
    }

    #[test]
    fn test_line_format() {
        let logger = StderrLogger::new("beep");
        let line = logger.format(
            &Record::builder()
                .args(format_args!("Could not open any device"))
                .level(Level::Error)
                .build(),
        );
        assert_eq!(line, "beep: error: Could not open any device");
    }
}
