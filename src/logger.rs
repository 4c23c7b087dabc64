// Logger - Frontend diagnostic messages
//
// Provides:
// - Leveled messages (error, warning, info, debug, trace)
// - A bounded in-memory buffer for later inspection
// - Optional echo to stderr and to a log file
//
// The logger is shared between components through `Rc<Logger>`, so all of
// its state lives behind interior mutability.

use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// No logging
    None,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warning,
    /// Info, warnings, and errors
    Info,
    /// Debug information (per-write SRAM tracing)
    Debug,
    /// Verbose trace logging (every key event)
    Trace,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::None => "NONE",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// A single logged message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Level the message was logged at
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level.label(), self.message)
    }
}

/// Logger
///
/// Messages above the configured level are dropped before they are
/// formatted into the buffer.
pub struct Logger {
    log_level: Cell<LogLevel>,
    echo_stderr: Cell<bool>,
    buffer: RefCell<Vec<LogEntry>>,
    /// Maximum number of entries in the buffer (0 = unlimited)
    max_buffer_size: Cell<usize>,
    output_file: RefCell<Option<File>>,
}

impl Logger {
    /// Create a new logger at `Info` level with stderr echo enabled
    pub fn new() -> Self {
        Logger {
            log_level: Cell::new(LogLevel::Info),
            echo_stderr: Cell::new(true),
            buffer: RefCell::new(Vec::new()),
            max_buffer_size: Cell::new(1000),
            output_file: RefCell::new(None),
        }
    }

    /// Create a logger that only buffers messages (used by tests)
    pub fn silent() -> Self {
        let logger = Self::new();
        logger.set_echo_stderr(false);
        logger
    }

    /// Set the log level
    pub fn set_log_level(&self, level: LogLevel) {
        self.log_level.set(level);
    }

    /// Get the current log level
    pub fn log_level(&self) -> LogLevel {
        self.log_level.get()
    }

    /// Check whether a message at `level` would be recorded
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level <= self.log_level.get()
    }

    /// Enable or disable echoing messages to stderr
    pub fn set_echo_stderr(&self, echo: bool) {
        self.echo_stderr.set(echo);
    }

    /// Set maximum buffer size
    ///
    /// When the buffer exceeds this size, old entries are removed.
    /// Set to 0 for unlimited size.
    pub fn set_max_buffer_size(&self, size: usize) {
        self.max_buffer_size.set(size);

        let mut buffer = self.buffer.borrow_mut();
        if size > 0 && buffer.len() > size {
            let excess = buffer.len() - size;
            buffer.drain(0..excess);
        }
    }

    /// Open a log file for output
    pub fn open_log_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        *self.output_file.borrow_mut() = Some(file);
        Ok(())
    }

    /// Close the log file
    pub fn close_log_file(&self) {
        *self.output_file.borrow_mut() = None;
    }

    /// Log a message
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.into(),
        };

        if self.echo_stderr.get() {
            eprintln!("{}", entry);
        }

        if let Some(ref mut file) = *self.output_file.borrow_mut() {
            let _ = writeln!(file, "{}", entry);
        }

        let mut buffer = self.buffer.borrow_mut();
        buffer.push(entry);

        let max = self.max_buffer_size.get();
        if max > 0 && buffer.len() > max {
            buffer.remove(0);
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    /// Copy of the buffered entries, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.buffer.borrow().clone()
    }

    /// Check whether any buffered message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.buffer
            .borrow()
            .iter()
            .any(|entry| entry.message.contains(needle))
    }

    /// Clear the buffer
    pub fn clear_buffer(&self) {
        self.buffer.borrow_mut().clear();
    }

    /// Format the last N entries as a string
    pub fn format_last_entries(&self, count: usize) -> String {
        let buffer = self.buffer.borrow();
        let start = buffer.len().saturating_sub(count);

        let mut output = String::new();
        for entry in &buffer[start..] {
            output.push_str(&format!("{}\n", entry));
        }
        output
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("log_level", &self.log_level.get())
            .field("entries", &self.buffer.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = Logger::silent();
        assert_eq!(logger.log_level(), LogLevel::Info);
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_level_filtering() {
        let logger = Logger::silent();

        logger.debug("hidden");
        logger.info("shown");
        assert_eq!(logger.entries().len(), 1);

        logger.set_log_level(LogLevel::Debug);
        logger.debug("now shown");
        assert_eq!(logger.entries().len(), 2);

        logger.set_log_level(LogLevel::None);
        logger.error("dropped");
        assert_eq!(logger.entries().len(), 2);
    }

    #[test]
    fn test_log_file_output() {
        let dir = std::env::temp_dir()
            .join(format!("a7800-frontend-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("frontend.log");

        let logger = Logger::silent();
        logger.open_log_file(&path).unwrap();
        logger.warning("HSC save failed");
        logger.debug("below level");
        logger.close_log_file();
        logger.info("after close");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[WARN] HSC save failed\n");
        assert_eq!(logger.entries().len(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_entry_display() {
        let entry = LogEntry {
            level: LogLevel::Warning,
            message: "storage unavailable".to_string(),
        };
        assert_eq!(entry.to_string(), "[WARN] storage unavailable");
    }

    #[test]
    fn test_buffer_limit() {
        let logger = Logger::silent();
        logger.set_max_buffer_size(2);

        logger.info("one");
        logger.info("two");
        logger.info("three");

        let messages: Vec<_> = logger.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_format_last_entries() {
        let logger = Logger::silent();
        logger.info("first");
        logger.error("second");

        assert_eq!(logger.format_last_entries(1), "[ERROR] second\n");
        assert!(logger.contains("first"));
        logger.clear_buffer();
        assert!(!logger.contains("first"));
    }
}
