//! Telemetry
//!
//! Structured logging for Vipps requests.

pub mod logging;

pub use logging::{
    no_op_logger, InMemoryLogger, LogArgument, LogContext, LogEntry, LogLevel, Logger,
    NoOpLogger, StdOutLogger, TracingLogger,
};
