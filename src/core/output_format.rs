//! Output format configuration for log entries
//!
//! Provides the two serializations a logger can switch between:
//! - Text: `key=value` pairs, one entry per line
//! - Json: one JSON object per line
//!
//! Both formats carry exactly the same keys and values.

use super::keys;
use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `time="2025-01-08T10:30:45Z" level=info msg="Request processed" scope=api type=log`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"info","msg":"Request processed","scope":"api","time":"2025-01-08T10:30:45Z","type":"log"}`
    Json,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    ///
    /// The returned line has no trailing newline.
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => self.format_text(entry, timestamp_format),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
        }
    }

    /// Format as key=value text
    fn format_text(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut parts = Vec::with_capacity(entry.fields.len() + 3);

        parts.push(format!(
            "{}={}",
            keys::TIME,
            self.escape_text_value(&timestamp_format.format(&entry.timestamp))
        ));
        parts.push(format!("{}={}", keys::LEVEL, entry.severity.as_str()));

        // Message is always quoted
        parts.push(format!(
            "{}={}",
            keys::MESSAGE,
            self.quote_text_value(&entry.message)
        ));

        for (key, value) in entry.fields.iter() {
            let key = keys::resolve_field_key(key, |k| entry.fields.contains_key(k));
            let formatted_value = match value {
                FieldValue::String(s) => self.escape_text_value(s),
                FieldValue::Int(i) => i.to_string(),
                FieldValue::Uint(u) => u.to_string(),
                FieldValue::Bool(b) => b.to_string(),
                FieldValue::Null => "null".to_string(),
                other => self.escape_text_value(&other.to_string()),
            };
            parts.push(format!(
                "{}={}",
                self.escape_text_key(&key),
                formatted_value
            ));
        }

        parts.join(" ")
    }

    /// Format as JSON
    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in entry.fields.iter() {
            let key = keys::resolve_field_key(key, |k| entry.fields.contains_key(k));
            json_obj.insert(key.into_owned(), value.to_json_value());
        }

        json_obj.insert(
            keys::TIME.to_string(),
            serde_json::Value::String(timestamp_format.format(&entry.timestamp)),
        );
        json_obj.insert(
            keys::LEVEL.to_string(),
            serde_json::Value::String(entry.severity.as_str().to_string()),
        );
        json_obj.insert(
            keys::MESSAGE.to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    /// Make a key safe for `key=value` output
    fn escape_text_key(&self, key: &str) -> String {
        if key.is_empty() {
            return "_".to_string();
        }
        key.chars()
            .map(|c| {
                if c.is_whitespace() || c == '=' || c == '"' {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    }

    /// Quote a text value unless it is made of plain token characters
    fn escape_text_value(&self, value: &str) -> String {
        if Self::needs_quoting(value) {
            self.quote_text_value(value)
        } else {
            value.to_string()
        }
    }

    fn needs_quoting(value: &str) -> bool {
        value.is_empty()
            || !value.chars().all(|c| {
                c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '/' | '@' | '^' | '+')
            })
    }

    /// Quote a text value
    fn quote_text_value(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for c in value.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }
}
