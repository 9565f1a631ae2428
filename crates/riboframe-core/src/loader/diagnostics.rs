//! Non-fatal findings collected while loading a structure.
//!
//! Recoverable oddities (an unknown assembly, a residue that cannot be
//! normalized) are recorded here and mirrored to `tracing`, so callers can
//! inspect them after a successful load without scraping log output.

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// One recorded finding, tagged with the loader stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub context: String,
    pub message: String,
}

/// An ordered sink of findings for one load.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, context: &str, message: impl Into<String>) {
        let message = message.into();
        info!(context, "{}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Info,
            context: context.to_string(),
            message,
        });
    }

    pub fn warn(&mut self, context: &str, message: impl Into<String>) {
        let message = message.into();
        warn!(context, "{}", message);
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            context: context.to_string(),
            message,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
