//! Append-only diagnostic log entries attached to an import task.

use super::ParseSeverityError;
use crate::text::clip_chars;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters stored per diagnostic entry.
pub const MAX_DIAGNOSTIC_CHARS: usize = 255;

/// Severity of a diagnostic entry.
///
/// `Success` and `Failed` are terminal-status severities: exactly one of
/// them is appended as the final entry of a completed run, matching the
/// resolved task outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Progress information.
    Info,
    /// A rule violation the pipeline recovered from.
    Warning,
    /// A rule violation counted against the final task state.
    Error,
    /// Terminal status entry for a run that completed without errors.
    Success,
    /// Terminal status entry for a run that completed with errors.
    Failed,
}

impl Severity {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    /// Returns true for [`Severity::Error`].
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true for [`Severity::Warning`].
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::Warning)
    }
}

impl TryFrom<&str> for Severity {
    type Error = ParseSeverityError;

    // Spelled `Severity::` throughout: `Self::Error` in this impl would be
    // ambiguous with the associated `Error` type.
    fn try_from(value: &str) -> Result<Self, ParseSeverityError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "SUCCESS" => Ok(Severity::Success),
            "FAILED" => Ok(Severity::Failed),
            _ => Err(ParseSeverityError(value.to_owned())),
        }
    }
}

/// One immutable diagnostic entry.
///
/// Entries are ordered by a monotonically increasing sequence number
/// assigned at append time and are never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    sequence: u64,
    severity: Severity,
    text: String,
    recorded_at: DateTime<Utc>,
}

impl DiagnosticMessage {
    /// Creates an entry, clipping the text to [`MAX_DIAGNOSTIC_CHARS`].
    #[must_use]
    pub fn new(
        sequence: u64,
        severity: Severity,
        text: &str,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sequence,
            severity,
            text: clip_chars(text, MAX_DIAGNOSTIC_CHARS),
            recorded_at,
        }
    }

    /// Returns the append-order sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the entry severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the clipped entry text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the append timestamp.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Running error/warning counters consulted when a run finalizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    /// Number of ERROR entries recorded so far.
    pub errors: u64,
    /// Number of WARNING entries recorded so far.
    pub warnings: u64,
}

impl DiagnosticCounts {
    /// Bumps the counter matching `severity`, ignoring other severities.
    pub const fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info | Severity::Success | Severity::Failed => {}
        }
    }
}
