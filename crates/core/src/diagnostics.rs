//! Accumulated diagnostics of a generation run.
//!
//! The collector is owned by the caller of a run and threaded through as `&mut`. Every entry
//! is mirrored to `tracing` at the time it is recorded.

use std::fmt;

use tracing::{error, warn};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Degraded but usable output (skipped node, dangling reference, ...).
    Warning,
    /// A declaration, file or fragment could not be produced.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How bad it is.
    pub severity: Severity,
    /// Namespace being processed, `None` for file-level problems.
    pub namespace: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{} [{}]: {}", self.severity, namespace, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Collector for diagnostics.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it.
    pub fn warn(&mut self, namespace: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        warn!(namespace = namespace.unwrap_or("-"), "{message}");
        self.push(Severity::Warning, namespace, message);
    }

    /// Record an error and log it.
    pub fn error(&mut self, namespace: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        error!(namespace = namespace.unwrap_or("-"), "{message}");
        self.push(Severity::Error, namespace, message);
    }

    fn push(&mut self, severity: Severity, namespace: Option<&str>, message: String) {
        self.entries.push(Diagnostic {
            severity,
            namespace: namespace.map(str::to_string),
            message,
        });
    }

    /// Append all entries of another collector, without logging them again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Entries in the order they were recorded.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Iterate over the entries in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of entries of either severity.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Whether at least one error was reported.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(Some("tabs"), "first");
        diagnostics.error(None, "second");

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.entries()[0].to_string(), "warning [tabs]: first");
        assert_eq!(diagnostics.entries()[1].to_string(), "error: second");
    }

    #[test]
    fn test_extend() {
        let mut a = Diagnostics::new();
        a.warn(None, "a");
        let mut b = Diagnostics::new();
        b.warn(None, "b");
        a.extend(b);
        let messages: Vec<_> = a.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "b"]);
    }
}
