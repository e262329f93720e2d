// src/utils/logger.rs

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::io::Write;

static LOGGER: ConsoleLogger = ConsoleLogger;

struct ConsoleLogger;

/// Installs the stderr logger; `level` comes from the -v/-q flags
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
  log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Maps `-v` / `-q` counts onto a level, starting from Info
pub fn level_from_verbosity(verbose: u8, quiet: u8) -> LevelFilter {
  match verbose as i16 - quiet as i16 {
    i16::MIN..=-2 => LevelFilter::Error,
    -1 => LevelFilter::Warn,
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

fn icon(level: Level) -> &'static str {
  match level {
    Level::Error => "❌",
    Level::Warn => "⚠️",
    Level::Info => "✅",
    Level::Debug => "⚪",
    Level::Trace => "▫️",
  }
}

fn format_record(level: Level, target: &str, args: &std::fmt::Arguments) -> String {
  match level {
    Level::Debug | Level::Trace => format!("{}  [{}] {}", icon(level), target, args),
    _ => format!("{}  {}", icon(level), args),
  }
}

impl log::Log for ConsoleLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }

  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      let line = format_record(record.level(), record.target(), record.args());
      // Worker threads log concurrently; one locked write per record
      let stderr = std::io::stderr();
      let mut handle = stderr.lock();
      let _ = writeln!(handle, "{}", line);
    }
  }

  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
