//! Log level definitions

use super::error::LoggerError;
use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output level of a logger and severity of a log call.
///
/// `Undefined` sits below every real level. As an output level it silences
/// the logger completely; as a call severity it is never enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Undefined = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// All levels that can be attached to a message, lowest first.
    pub const SEVERITIES: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Undefined => "undefined",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Map onto the backend severity vocabulary.
    ///
    /// The mapping is one-to-one for every message level. `Undefined` has no
    /// backend counterpart and yields `None`.
    #[must_use]
    pub const fn to_severity(self) -> Option<Severity> {
        match self {
            LogLevel::Undefined => None,
            LogLevel::Debug => Some(Severity::Debug),
            LogLevel::Info => Some(Severity::Info),
            LogLevel::Warn => Some(Severity::Warn),
            LogLevel::Error => Some(Severity::Error),
            LogLevel::Fatal => Some(Severity::Fatal),
        }
    }

    /// Parse a level, falling back to `Undefined` for unknown input.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(LogLevel::Undefined)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}
