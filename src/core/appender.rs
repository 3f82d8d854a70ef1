//! Appender trait for log output destinations
//!
//! An appender receives an already serialized line. It is responsible for
//! the line terminator and for any buffering of its own.

use super::{error::Result, severity::Severity};

pub trait Appender: Send {
    fn append(&mut self, severity: Severity, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
