//! Scoped logger facade
//!
//! A [`Logger`] is a cheap handle. Clones and derived loggers share one set of
//! output settings (level, format, appender, exit hook) and one set of
//! standing fields. Each handle carries its own immutable overlay fields.

use super::{
    appender::Appender,
    error::Result,
    keys,
    log_context::{FieldValue, Fields, LoggerContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    severity::Severity,
    timestamp::TimestampFormat,
};
use crate::appenders::{ConsoleAppender, WriterAppender};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Log type of general operational entries
pub const LOG_TYPE_LOG: &str = "log";
/// Log type of per-request (access) entries
pub const LOG_TYPE_REQUEST: &str = "request";

/// Code passed to the exit hook after a fatal entry
pub const FATAL_EXIT_CODE: i32 = 1;

/// Called after a fatal entry has been written
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

fn process_exit_hook() -> ExitHook {
    Arc::new(|code| std::process::exit(code))
}

fn host_identity() -> String {
    let host = gethostname::gethostname().to_string_lossy().into_owned();
    if host.is_empty() {
        "localhost".to_string()
    } else {
        host
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Output settings shared by a logger and everything derived from it
struct Shared {
    output_level: RwLock<LogLevel>,
    output_format: RwLock<OutputFormat>,
    timestamp_format: RwLock<TimestampFormat>,
    appender: Mutex<Box<dyn Appender>>,
    exit_hook: RwLock<ExitHook>,
    metrics: LoggerMetrics,
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Err(e) = self.appender.get_mut().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Scoped logger handle
///
/// Cloning is cheap. [`with_fields`](Logger::with_fields) and
/// [`with_log_type`](Logger::with_log_type) derive children that add overlay
/// fields while sharing output settings and standing fields with `self`.
#[derive(Clone)]
pub struct Logger {
    scope: Arc<str>,
    standing: LoggerContext,
    overlay: Arc<Fields>,
    shared: Arc<Shared>,
}

impl Logger {
    /// Create a logger for `scope` writing text lines to stdout at `Info`.
    ///
    /// Standing fields start as `scope`, `type="log"` and `instance` set to
    /// the host name.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self::from_parts(
            scope.into(),
            LogLevel::Info,
            OutputFormat::Text,
            TimestampFormat::default(),
            Box::new(ConsoleAppender::new()),
            process_exit_hook(),
        )
    }

    fn from_parts(
        scope: String,
        output_level: LogLevel,
        output_format: OutputFormat,
        timestamp_format: TimestampFormat,
        appender: Box<dyn Appender>,
        exit_hook: ExitHook,
    ) -> Self {
        let standing = LoggerContext::new();
        standing.set(keys::SCOPE, scope.as_str());
        standing.set(keys::LOG_TYPE, LOG_TYPE_LOG);
        standing.set(keys::INSTANCE, host_identity());

        Self {
            scope: Arc::from(scope),
            standing,
            overlay: Arc::new(Fields::new()),
            shared: Arc::new(Shared {
                output_level: RwLock::new(output_level),
                output_format: RwLock::new(output_format),
                timestamp_format: RwLock::new(timestamp_format),
                appender: Mutex::new(appender),
                exit_hook: RwLock::new(exit_hook),
                metrics: LoggerMetrics::new(),
            }),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    // ------------------------------------------------------------------
    // Level
    // ------------------------------------------------------------------

    /// Set the minimum level that is written. `Undefined` silences everything.
    pub fn set_output_level(&self, level: LogLevel) {
        *self.shared.output_level.write() = level;
    }

    pub fn output_level(&self) -> LogLevel {
        *self.shared.output_level.read()
    }

    /// Whether a call at `level` would be written.
    pub fn is_output_level_enabled(&self, level: LogLevel) -> bool {
        let configured = self.output_level();
        level != LogLevel::Undefined && configured != LogLevel::Undefined && level >= configured
    }

    // ------------------------------------------------------------------
    // Format and output
    // ------------------------------------------------------------------

    /// Switch between JSON and text lines. Fields and level are untouched.
    pub fn enable_json_output(&self, enabled: bool) {
        let format = if enabled {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        self.set_output_format(format);
    }

    pub fn set_output_format(&self, format: OutputFormat) {
        *self.shared.output_format.write() = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        *self.shared.output_format.read()
    }

    pub fn is_json_output(&self) -> bool {
        self.output_format() == OutputFormat::Json
    }

    /// Change the `time` rendering. An invalid custom pattern is rejected and
    /// the current format is kept.
    pub fn set_timestamp_format(&self, format: TimestampFormat) -> Result<()> {
        format.validate()?;
        *self.shared.timestamp_format.write() = format;
        Ok(())
    }

    /// Replace the appender serialized lines are written to.
    ///
    /// The previous appender is flushed first.
    pub fn set_output<A: Appender + 'static>(&self, appender: A) {
        let mut current = self.shared.appender.lock();
        if let Err(e) = current.flush() {
            eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", current.name(), e);
        }
        *current = Box::new(appender);
    }

    /// Redirect output to any writer, one line per entry.
    pub fn set_writer<W: Write + Send + 'static>(&self, writer: W) {
        self.set_output(WriterAppender::new(writer));
    }

    /// Replace what happens after a fatal entry is written.
    ///
    /// # Example
    ///
    /// ```
    /// use scope_logger::Logger;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let exit_code = Arc::new(AtomicI32::new(0));
    /// let seen = Arc::clone(&exit_code);
    ///
    /// let logger = Logger::new("svc");
    /// logger.set_writer(std::io::sink());
    /// logger.set_exit_hook(move |code| seen.store(code, Ordering::SeqCst));
    /// logger.fatal("unrecoverable");
    ///
    /// assert_eq!(exit_code.load(Ordering::SeqCst), 1);
    /// ```
    pub fn set_exit_hook<F>(&self, hook: F)
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        *self.shared.exit_hook.write() = Arc::new(hook);
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.appender.lock().flush()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    // ------------------------------------------------------------------
    // Standing fields
    // ------------------------------------------------------------------

    /// Tag every entry with an application id
    pub fn set_app_id(&self, app_id: impl Into<String>) {
        self.standing.set(keys::APP_ID, app_id.into());
    }

    pub fn app_id(&self) -> Option<String> {
        self.standing_string(keys::APP_ID)
    }

    /// Override the host name reported in `instance`
    pub fn set_instance(&self, instance: impl Into<String>) {
        self.standing.set(keys::INSTANCE, instance.into());
    }

    pub fn instance(&self) -> Option<String> {
        self.standing_string(keys::INSTANCE)
    }

    /// Tag every entry with the runtime version (`ver`)
    pub fn set_version(&self, version: impl Into<String>) {
        self.standing.set(keys::VERSION, version.into());
    }

    pub fn version(&self) -> Option<String> {
        self.standing_string(keys::VERSION)
    }

    fn standing_string(&self, key: &str) -> Option<String> {
        match self.standing.get(key) {
            Some(FieldValue::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Derive a logger whose entries also carry `fields`.
    ///
    /// The new overlay is this logger's overlay with `fields` layered on top.
    /// `self` is not modified.
    #[must_use]
    pub fn with_fields(&self, fields: impl Into<Fields>) -> Logger {
        let overlay = self.overlay.merged(&fields.into());
        Logger {
            scope: Arc::clone(&self.scope),
            standing: self.standing.clone(),
            overlay: Arc::new(overlay),
            shared: Arc::clone(&self.shared),
        }
    }

    /// Derive a logger with one extra field
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Logger
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.with_fields(Fields::new().with_field(key, value))
    }

    /// Derive a logger whose entries carry `type=<log_type>`.
    #[must_use]
    pub fn with_log_type(&self, log_type: &str) -> Logger {
        self.with_field(keys::LOG_TYPE, log_type)
    }

    pub fn log_type(&self) -> String {
        match self.effective_fields().get(keys::LOG_TYPE) {
            Some(FieldValue::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => LOG_TYPE_LOG.to_string(),
        }
    }

    /// Standing fields with this logger's overlay applied
    pub fn effective_fields(&self) -> Fields {
        self.standing.snapshot().merged(&self.overlay)
    }

    /// Overlay fields attached by derivation
    pub fn overlay_fields(&self) -> &Fields {
        &self.overlay
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if let Some(severity) = self.guard(level) {
            self.write(severity, message.as_ref());
        }
    }

    /// Formatted variant of [`log`](Self::log).
    ///
    /// `args` is only rendered when the level is enabled.
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if let Some(severity) = self.guard(level) {
            match args.as_str() {
                Some(s) => self.write(severity, s),
                None => self.write(severity, &args.to_string()),
            }
        }
    }

    fn guard(&self, level: LogLevel) -> Option<Severity> {
        if !self.is_output_level_enabled(level) {
            self.shared.metrics.record_filtered();
            return None;
        }
        level.to_severity()
    }

    /// Serialize and hand one entry to the appender.
    ///
    /// Appender errors and panics are reported on stderr and counted, never
    /// returned to the caller.
    fn write(&self, severity: Severity, message: &str) {
        let entry = LogEntry::new(severity, message).with_fields(self.effective_fields());
        let format = self.output_format();
        let line = {
            let timestamp_format = self.shared.timestamp_format.read();
            format.format(&entry, &timestamp_format)
        };

        let mut appender = self.shared.appender.lock();
        let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            appender.append(severity, &line)
        }));

        match append_result {
            Ok(Ok(())) => {
                self.shared.metrics.record_logged();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                self.shared.metrics.record_dropped();
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Appender '{}' panicked: {}",
                    appender.name(),
                    panic_message(panic_info.as_ref())
                );
                self.shared.metrics.record_dropped();
            }
        }
    }

    fn exit(&self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        let hook = self.shared.exit_hook.read().clone();
        hook(FATAL_EXIT_CODE);
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Write a fatal entry, then run the exit hook.
    ///
    /// Nothing happens, exit included, when `Fatal` is disabled.
    pub fn fatal(&self, message: impl AsRef<str>) {
        if self.is_output_level_enabled(LogLevel::Fatal) {
            self.log(LogLevel::Fatal, message);
            self.exit();
        } else {
            self.shared.metrics.record_filtered();
        }
    }

    #[inline]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Debug, args);
    }

    #[inline]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Info, args);
    }

    #[inline]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Warn, args);
    }

    #[inline]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logf(LogLevel::Error, args);
    }

    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        if self.is_output_level_enabled(LogLevel::Fatal) {
            self.logf(LogLevel::Fatal, args);
            self.exit();
        } else {
            self.shared.metrics.record_filtered();
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("scope", &self.scope)
            .field("output_level", &self.output_level())
            .field("output_format", &self.output_format())
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use scope_logger::prelude::*;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder()
///     .output_level(LogLevel::Debug)
///     .json(true)
///     .app_id("checkout")
///     .writer(buffer.clone())
///     .build("payments");
///
/// logger.debug("ready");
/// assert!(buffer.contents().contains("\"app_id\":\"checkout\""));
/// ```
pub struct LoggerBuilder {
    output_level: LogLevel,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    app_id: Option<String>,
    instance: Option<String>,
    version: Option<String>,
    appender: Option<Box<dyn Appender>>,
    exit_hook: Option<ExitHook>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            output_level: LogLevel::Info,
            output_format: OutputFormat::Text,
            timestamp_format: TimestampFormat::default(),
            app_id: None,
            instance: None,
            version: None,
            appender: None,
            exit_hook: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_level(mut self, level: LogLevel) -> Self {
        self.output_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn json(mut self, enabled: bool) -> Self {
        self.output_format = if enabled {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the appender; defaults to stdout
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(self, writer: W) -> Self {
        self.appender(WriterAppender::new(writer))
    }

    #[must_use = "builder methods return a new value"]
    pub fn exit_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit_hook = Some(Arc::new(hook));
        self
    }

    /// Build the Logger
    pub fn build(self, scope: impl Into<String>) -> Logger {
        let logger = Logger::from_parts(
            scope.into(),
            self.output_level,
            self.output_format,
            self.timestamp_format,
            self.appender
                .unwrap_or_else(|| Box::new(ConsoleAppender::new())),
            self.exit_hook.unwrap_or_else(process_exit_hook),
        );

        if let Some(app_id) = self.app_id {
            logger.set_app_id(app_id);
        }
        if let Some(instance) = self.instance {
            logger.set_instance(instance);
        }
        if let Some(version) = self.version {
            logger.set_version(version);
        }

        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
