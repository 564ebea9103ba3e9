//! Run-scoped diagnostics.
//!
//! Every extraction or compile run owns one [`RunLog`]. Components append to it
//! instead of printing, and the CLI reports the whole log once the run is over.
//! Nothing here is global: a log is created by the caller and threaded through
//! each operation by `&mut` reference.

use std::{fmt, path::Path};

/// Severity level of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single human-readable diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Ordered diagnostics accumulated over one run.
#[derive(Debug, Default, Clone)]
pub struct RunLog {
    entries: Vec<LogEntry>,
    /// Absolute prefix rewritten to `.` in messages, so paths stay readable.
    root: Option<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that shortens paths under `root` to `./...`.
    pub fn with_root(root: &Path) -> Self {
        let root = root.to_string_lossy().trim_end_matches('/').to_string();
        Self {
            entries: Vec::new(),
            root: (!root.is_empty()).then_some(root),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        let message = match &self.root {
            Some(root) => message.replace(root.as_str(), "."),
            None => message,
        };
        self.entries.push(LogEntry { severity, message });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|e| e.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Entries of the given severity, in log order.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.message.as_str())
            .collect()
    }
}
