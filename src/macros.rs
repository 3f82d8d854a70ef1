//! Logging macros for ergonomic log message formatting.
//!
//! The level macros are the formatted variants of the logger methods. Format
//! arguments are only rendered when the level is enabled.
//!
//! # Examples
//!
//! ```
//! use scope_logger::prelude::*;
//! use scope_logger::{fields, info};
//!
//! let logger = Logger::new("api");
//! logger.set_writer(std::io::sink());
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let request = logger.with_fields(fields! { "method" => "GET", "status" => 200 });
//! info!(request, "request served");
//! ```

/// Log a formatted message at the given level.
///
/// ```
/// # use scope_logger::prelude::*;
/// # let logger = Logger::new("svc");
/// # logger.set_writer(std::io::sink());
/// use scope_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(format_args!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(format_args!($($arg)+))
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(format_args!($($arg)+))
    };
}

/// Log a fatal-level message, then run the logger's exit hook.
///
/// ```
/// # use scope_logger::prelude::*;
/// # let logger = Logger::new("svc");
/// # logger.set_writer(std::io::sink());
/// # logger.set_exit_hook(|_| {});
/// use scope_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(format_args!($($arg)+))
    };
}

/// Build a [`Fields`](crate::Fields) set from `key => value` pairs.
///
/// ```
/// use scope_logger::fields;
///
/// let fields = fields! { "answer" => 42, "hello" => "world" };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(fields.insert($key, $value);)+
        fields
    }};
}
