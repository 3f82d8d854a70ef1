//! Core logger types and traits

pub mod appender;
pub mod error;
pub mod keys;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod registry;
pub mod severity;
pub mod timestamp;

pub use appender::Appender;
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, Fields, LoggerContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{ExitHook, Logger, LoggerBuilder, FATAL_EXIT_CODE, LOG_TYPE_LOG, LOG_TYPE_REQUEST};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use registry::{LoggerOptions, LoggerRegistry};
pub use severity::Severity;
pub use timestamp::TimestampFormat;
