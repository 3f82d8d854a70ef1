//! Logger registry and shared options
//!
//! A service usually creates one logger per subsystem and configures them
//! all together. `LoggerRegistry` keeps those loggers by scope so options can
//! be applied in one pass.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::Logger;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_OUTPUT_LEVEL: &str = "info";

pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_AS_JSON: &str = "LOG_AS_JSON";
pub const ENV_APP_ID: &str = "APP_ID";

/// Options applied to every logger of a registry
///
/// # Example
///
/// ```
/// use scope_logger::LoggerOptions;
///
/// let options = LoggerOptions::from_json(r#"{"app_id":"orders","json_format_enabled":true}"#)
///     .unwrap();
/// assert_eq!(options.output_level, "info");
/// assert!(options.json_format_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    pub app_id: Option<String>,
    pub json_format_enabled: bool,
    pub output_level: String,
    pub version: Option<String>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            app_id: None,
            json_format_enabled: false,
            output_level: DEFAULT_OUTPUT_LEVEL.to_string(),
            version: None,
        }
    }
}

impl LoggerOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: LoggerOptions = serde_json::from_str(json)?;
        options.level()?;
        Ok(options)
    }

    /// Read options from `LOG_LEVEL`, `LOG_AS_JSON` and `APP_ID`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary variable lookup; unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = LoggerOptions::default();

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            options.set_output_level(&level)?;
        }
        if let Some(json) = lookup(ENV_LOG_AS_JSON) {
            options.json_format_enabled = match json.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(LoggerError::config(
                        ENV_LOG_AS_JSON,
                        format!("expected a boolean, got '{}'", other),
                    ))
                }
            };
        }
        if let Some(app_id) = lookup(ENV_APP_ID).filter(|id| !id.is_empty()) {
            options.app_id = Some(app_id);
        }

        Ok(options)
    }

    /// Set the output level after checking it names a real level
    pub fn set_output_level(&mut self, level: &str) -> Result<()> {
        level.parse::<LogLevel>()?;
        self.output_level = level.trim().to_lowercase();
        Ok(())
    }

    pub fn level(&self) -> Result<LogLevel> {
        self.output_level.parse()
    }

    /// Apply these options to a single logger
    pub fn apply_to(&self, logger: &Logger) -> Result<()> {
        let level = self.level()?;
        self.apply_checked(logger, level);
        Ok(())
    }

    fn apply_checked(&self, logger: &Logger, level: LogLevel) {
        if let Some(ref app_id) = self.app_id {
            logger.set_app_id(app_id.as_str());
        }
        if let Some(ref version) = self.version {
            logger.set_version(version.as_str());
        }
        logger.enable_json_output(self.json_format_enabled);
        logger.set_output_level(level);
    }
}

/// Loggers keyed by lower-cased scope
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<String, Logger>>,
    options: RwLock<Option<LoggerOptions>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the logger registered for `scope`, creating it if needed.
    ///
    /// Scope lookup is case-insensitive. A newly created logger receives the
    /// options most recently applied to the registry.
    pub fn logger(&self, scope: &str) -> Logger {
        let key = scope.to_lowercase();
        if let Some(logger) = self.loggers.read().get(&key) {
            return logger.clone();
        }

        let mut loggers = self.loggers.write();
        loggers
            .entry(key)
            .or_insert_with(|| {
                let logger = Logger::new(scope);
                if let Some(ref options) = *self.options.read() {
                    if let Ok(level) = options.level() {
                        options.apply_checked(&logger, level);
                    }
                }
                logger
            })
            .clone()
    }

    /// Register an externally built logger, replacing any with the same scope
    pub fn register(&self, logger: Logger) {
        self.loggers
            .write()
            .insert(logger.scope().to_lowercase(), logger);
    }

    pub fn get(&self, scope: &str) -> Option<Logger> {
        self.loggers.read().get(&scope.to_lowercase()).cloned()
    }

    pub fn loggers(&self) -> Vec<Logger> {
        self.loggers.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Apply `options` to every registered logger and remember them for
    /// loggers created later.
    ///
    /// An invalid output level is rejected before any logger is touched.
    /// The logger map stays write-locked until both steps are done, so a
    /// logger created concurrently is either updated by this pass or created
    /// with the new options.
    pub fn apply_options(&self, options: &LoggerOptions) -> Result<()> {
        let level = options.level()?;
        // lock order: loggers, then options
        let loggers = self.loggers.write();
        *self.options.write() = Some(options.clone());
        for logger in loggers.values() {
            options.apply_checked(logger, level);
        }
        Ok(())
    }
}
