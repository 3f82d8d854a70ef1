//! Console appender implementation

use crate::core::{Appender, Result, Severity};
use std::io::Write;

#[cfg(feature = "console")]
use colored::Colorize;

/// Standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes every line to stdout (or stderr), optionally colored by severity.
pub struct ConsoleAppender {
    use_colors: bool,
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: false,
            target: ConsoleTarget::default(),
        }
    }

    /// Color whole lines by severity. Has no effect without the `console` feature.
    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            target: ConsoleTarget::default(),
        }
    }

    /// Set the stream lines are written to
    ///
    /// # Example
    ///
    /// ```
    /// use scope_logger::appenders::{ConsoleAppender, ConsoleTarget};
    ///
    /// let appender = ConsoleAppender::new().with_target(ConsoleTarget::Stderr);
    /// ```
    #[must_use]
    pub fn with_target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    fn render(&self, severity: Severity, line: &str) -> String {
        #[cfg(feature = "console")]
        if self.use_colors {
            return line.color(severity.color_code()).to_string();
        }
        let _ = severity;
        line.to_string()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, severity: Severity, line: &str) -> Result<()> {
        let output = self.render(severity, line);
        match self.target {
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", output)?,
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", output)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
