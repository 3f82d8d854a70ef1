//! Log entry structure

use super::log_context::Fields;
use super::severity::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single log record, built at call time and discarded after writing.
///
/// `fields` already holds the merged standing and overlay fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Fields,
}

impl LogEntry {
    /// The message is kept verbatim. Each output format escapes it so the
    /// entry stays on one line.
    pub fn new(severity: Severity, message: impl AsRef<str>) -> Self {
        Self {
            severity,
            message: message.as_ref().to_string(),
            timestamp: Utc::now(),
            fields: Fields::new(),
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
