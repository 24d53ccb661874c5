//! Rolling Logger
//!
//! `log` backend that prints to the console and keeps the last N records in memory.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogRecord {
    pub fn line(&self, app_name: &str) -> String {
        format!(
            "[{}] {} {} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            app_name,
            self.level,
            self.target,
            self.message
        )
    }
}

pub struct RollingLogger {
    app_name: String,
    level: LevelFilter,
    capacity: usize,
    buffer: Mutex<VecDeque<LogRecord>>,
}

impl RollingLogger {
    pub fn new(app_name: &str, level: LevelFilter, capacity: usize) -> Self {
        Self {
            app_name: app_name.to_string(),
            level,
            capacity: capacity.max(1),
            buffer: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    fn push(&self, record: LogRecord) {
        if let Ok(mut buffer) = self.buffer.lock() {
            if buffer.len() == self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(record);
        }
    }

    /// Oldest first
    pub fn records(&self) -> Vec<LogRecord> {
        self.buffer
            .lock()
            .map(|b| b.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogRecord {
            timestamp: Local::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        write_console(entry.level, &entry.line(&self.app_name));
        self.push(entry);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: Level, line: &str) {
    eprintln!("{}", line);
}

// ========================
// Global logger
// ========================

/// Install the global logger. Fails if a logger is already set.
pub fn init_logger(app_name: &str, level: LevelFilter, capacity: usize) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, level, capacity));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Records retained by the global logger, oldest first
pub fn recent() -> Vec<LogRecord> {
    LOGGER.get().map(RollingLogger::records).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(logger: &RollingLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("test")
                .args(format_args!("{}", message))
                .build(),
        );
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let logger = RollingLogger::new("Test", LevelFilter::Trace, 3);
        for i in 0..5 {
            emit(&logger, Level::Info, &format!("m{}", i));
        }
        let messages: Vec<String> = logger.records().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_level_filter() {
        let logger = RollingLogger::new("Test", LevelFilter::Warn, 10);
        emit(&logger, Level::Debug, "hidden");
        emit(&logger, Level::Error, "shown");
        let records = logger.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Error);
    }

    #[test]
    fn test_line_format() {
        let logger = RollingLogger::new("CoreCRM", LevelFilter::Info, 2);
        emit(&logger, Level::Warn, "[KANBAN] move failed");
        let line = logger.records()[0].line("CoreCRM");
        assert!(line.ends_with("CoreCRM WARN test: [KANBAN] move failed"));
    }
}
