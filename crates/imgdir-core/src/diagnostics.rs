//! Sinks that receive scan notes.

use crate::error::{ScanWarning, Severity};

/// Receives the notes a scan emits while it builds a tree.
///
/// The scanner never logs globally; whoever starts a scan decides where
/// its notes go.
pub trait DiagnosticSink {
    /// Record one note.
    fn record(&mut self, warning: ScanWarning);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, warning: ScanWarning) {
        (**self).record(warning);
    }
}

/// Forwards notes to `tracing` at their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, warning: ScanWarning) {
        let path = warning.path.display();
        match warning.severity {
            Severity::Debug => {
                tracing::debug!(target: "imgdir::scan", kind = ?warning.kind, %path, "{}", warning.message)
            }
            Severity::Warn => {
                tracing::warn!(target: "imgdir::scan", kind = ?warning.kind, %path, "{}", warning.message)
            }
            Severity::Error => {
                tracing::error!(target: "imgdir::scan", kind = ?warning.kind, %path, "{}", warning.message)
            }
        }
    }
}

/// Keeps every note in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    warnings: Vec<ScanWarning>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notes, in the order they were emitted.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Notes at or above `severity`.
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &ScanWarning> {
        self.warnings.iter().filter(move |w| w.severity >= severity)
    }

    /// Consume the sink, returning its notes.
    pub fn into_warnings(self) -> Vec<ScanWarning> {
        self.warnings
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }
}
