//! Logging
//!
//! Leveled logging port used by the API client, with no-op, stdout,
//! in-memory and `tracing` sinks.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Correlation context for a log record. Every field is optional and an empty
/// context is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogContext {
    /// Request ID for correlation.
    pub request_id: Option<String>,
    /// Operation name.
    pub operation: Option<String>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

/// A key-value pair attached to a log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogArgument {
    pub key: String,
    pub value: String,
}

impl LogArgument {
    pub fn new(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Logger interface.
pub trait Logger: Send + Sync {
    /// Log an informational message.
    fn info(&self, context: &LogContext, message: &str, arguments: &[LogArgument]);

    /// Log an error message.
    fn error(&self, context: &LogContext, message: &str, arguments: &[LogArgument]);
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn info(&self, _context: &LogContext, _message: &str, _arguments: &[LogArgument]) {}
    fn error(&self, _context: &LogContext, _message: &str, _arguments: &[LogArgument]) {}
}

pub fn no_op_logger() -> NoOpLogger {
    NoOpLogger
}

/// Renders `"<level>: <message>: k1: v1, k2: v2"`.
fn format_line(level: LogLevel, message: &str, arguments: &[LogArgument]) -> String {
    let mut line = format!("{}: {}", level, message);
    if !arguments.is_empty() {
        let rendered = arguments
            .iter()
            .map(|a| format!("{}: {}", a.key, a.value))
            .collect::<Vec<_>>()
            .join(", ");
        line.push_str(": ");
        line.push_str(&rendered);
    }
    line
}

/// Logger writing one line per record to stdout, or any other writer.
pub struct StdOutLogger {
    out: Mutex<Box<dyn Write + Send>>,
    timestamps: bool,
}

impl StdOutLogger {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(Box::new(std::io::stdout())),
            timestamps: true,
        }
    }

    /// Write to `out` instead of stdout.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            timestamps: true,
        }
    }

    /// Enable or disable the leading unix timestamp.
    pub fn timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    fn log(&self, level: LogLevel, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        let mut line = format_line(level, message, arguments);
        if let Some(request_id) = &context.request_id {
            line.push_str(&format!(" request_id={}", request_id));
        }
        if self.timestamps {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs();
            line = format!("[{}] {}", now, line);
        }

        // A poisoned or failing sink must not fail the request being logged.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", line);
        }
    }
}

impl Default for StdOutLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for StdOutLogger {
    fn info(&self, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        self.log(LogLevel::Info, context, message, arguments);
    }

    fn error(&self, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        self.log(LogLevel::Error, context, message, arguments);
    }
}

/// Logger forwarding records to the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        tracing::info!(
            request_id = context.request_id.as_deref().unwrap_or(""),
            operation = context.operation.as_deref().unwrap_or(""),
            "{}",
            format_line(LogLevel::Info, message, arguments)
        );
    }

    fn error(&self, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        tracing::error!(
            request_id = context.request_id.as_deref().unwrap_or(""),
            operation = context.operation.as_deref().unwrap_or(""),
            "{}",
            format_line(LogLevel::Error, message, arguments)
        );
    }
}

/// Log entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: LogContext,
    pub arguments: Vec<LogArgument>,
}

impl LogEntry {
    /// Value of the first argument named `key`.
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// In-memory logger for testing.
#[derive(Default)]
pub struct InMemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl InMemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all log entries.
    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Get entries by level.
    pub fn get_entries_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.get_entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn log(&self, level: LogLevel, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry {
                level,
                message: message.to_string(),
                context: context.clone(),
                arguments: arguments.to_vec(),
            });
        }
    }
}

impl Logger for InMemoryLogger {
    fn info(&self, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        self.log(LogLevel::Info, context, message, arguments);
    }

    fn error(&self, context: &LogContext, message: &str, arguments: &[LogArgument]) {
        self.log(LogLevel::Error, context, message, arguments);
    }
}
