//! `log` backend that writes to the debugger's log window.
//!
//! The sink is a plain function so the plugin can hand in the x64dbg log
//! printer and tests can hand in a recorder.

use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use crate::PLUGIN_NAME;

/// Receives one fully formatted line, newline included.
pub type Sink = fn(&str);

pub struct HostLogger {
    sink: Sink,
}

static LOGGER: OnceLock<HostLogger> = OnceLock::new();

impl HostLogger {
    pub const fn new(sink: Sink) -> Self {
        Self { sink }
    }
}

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            (self.sink)(&format_line(record));
        }
    }

    fn flush(&self) {}
}

/// `[abc_cache] WARN: message\n`
pub fn format_line(record: &Record<'_>) -> String {
    format!("[{PLUGIN_NAME}] {}: {}\n", record.level(), record.args())
}

/// Install the host logger as the global `log` backend.
///
/// The sink of the first call wins for the lifetime of the module.
pub fn init(sink: Sink, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| HostLogger::new(sink));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}
