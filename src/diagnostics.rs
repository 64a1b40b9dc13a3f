// ABOUTME: Diagnostics accumulator for non-fatal warnings during a push.
// ABOUTME: Collects warnings that shouldn't fail a push but should be shown to users.

/// Collects non-fatal warnings during a push.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// A non-fatal warning collected during a push.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Log streaming could not be started; the push carries on without it.
    pub fn log_streaming(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogStreaming,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The log cache could not be reached or derived.
    LogStreaming,
}
