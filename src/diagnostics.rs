// ABOUTME: Diagnostics accumulator for non-fatal warnings during a promotion.
// ABOUTME: Partial batch failures land here instead of aborting the run.

/// Collects non-fatal warnings during a promotion run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Count warnings of one kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}

/// A non-fatal warning collected during a promotion.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// One member of a fan-out batch failed.
    pub fn partial_batch(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PartialBatch,
            message: message.into(),
        }
    }

    /// An input was supplied but had no effect.
    pub fn ignored_input(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::IgnoredInput,
            message: message.into(),
        }
    }

    /// No service domain could be reported.
    pub fn missing_domain(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MissingDomain,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Some members of a fan-out failed; a re-run will retry them.
    PartialBatch,
    /// An input was overridden or matched nothing.
    IgnoredInput,
    /// No service matched the domain rules.
    MissingDomain,
}
