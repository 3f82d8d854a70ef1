//! # Scope Logger
//!
//! A scoped, structured logging facade for services.
//!
//! ## Features
//!
//! - **Leveled**: `debug` through `fatal`, plus an `Undefined` level that silences a logger
//! - **Scoped**: every entry carries scope, instance, log type and optional app id
//! - **Derived loggers**: `with_fields` / `with_log_type` overlay fields without touching the parent
//! - **Two formats**: JSON lines or `key=value` text, switchable at runtime
//!
//! ```
//! use scope_logger::prelude::*;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::new("svc");
//! logger.set_writer(buffer.clone());
//! logger.enable_json_output(true);
//!
//! logger.with_log_type(LOG_TYPE_REQUEST).info("GET /healthz");
//! assert!(buffer.contents().contains("\"type\":\"request\""));
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, SharedBuffer, WriterAppender};
    pub use crate::core::{
        Appender, ExitHook, FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerMetrics, LoggerOptions, LoggerRegistry, OutputFormat, Result, Severity,
        TimestampFormat, FATAL_EXIT_CODE, LOG_TYPE_LOG, LOG_TYPE_REQUEST,
    };
}

pub use appenders::{ConsoleAppender, SharedBuffer, WriterAppender};
pub use core::{
    Appender, ExitHook, FieldValue, Fields, LogEntry, LogLevel, Logger, LoggerBuilder,
    LoggerError, LoggerMetrics, LoggerOptions, LoggerRegistry, OutputFormat, Result, Severity,
    TimestampFormat, FATAL_EXIT_CODE, LOG_TYPE_LOG, LOG_TYPE_REQUEST,
};
