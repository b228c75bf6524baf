use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr with a colored level tag.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{} {}", level_tag(record.level()), record.args());
    }

    fn flush(&self) {}
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "[error]".red().bold(),
        Level::Warn => "[warn]".yellow().bold(),
        Level::Info => "[info]".green(),
        Level::Debug => "[debug]".blue(),
        Level::Trace => "[trace]".bright_black(),
    }
}

/// Installs the console logger. Calling it again only updates the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
