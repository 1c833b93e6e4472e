//! Append-only diagnostics collected during a compile.
//!
//! Unsupported features and recoverable structural problems never abort a
//! compile. They are recorded here, forwarded to the `log` facade, and shown
//! to the user once the operation finishes.

use std::fmt;

use crate::document::DesignNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One warning or error, optionally tied to a design node.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Guid and name of the offending node.
    pub node: Option<(String, String)>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.node {
            Some((_, name)) => write!(f, "{}: {} ('{}')", tag, self.message, name),
            None => write!(f, "{}: {}", tag, self.message),
        }
    }
}

/// Diagnostics sink for one copy/export operation.
#[derive(Debug, Default, Clone)]
pub struct Log {
    entries: Vec<Diagnostic>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>, node: Option<&DesignNode>) {
        self.push(Severity::Warning, message.into(), node);
    }

    pub fn error(&mut self, message: impl Into<String>, node: Option<&DesignNode>) {
        self.push(Severity::Error, message.into(), node);
    }

    fn push(&mut self, severity: Severity, message: String, node: Option<&DesignNode>) {
        match severity {
            Severity::Warning => log::warn!("{}", message),
            Severity::Error => log::error!("{}", message),
        }
        self.entries.push(Diagnostic {
            severity,
            message,
            node: node.map(|n| (n.guid.clone(), n.name.clone())),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove and return every entry.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}
