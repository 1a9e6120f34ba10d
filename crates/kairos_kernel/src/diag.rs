//! Assertion and report diagnostics.
//!
//! User processes raise diagnostics through the runtime ABI's `assert_fail`
//! operation. A diagnostic line is `<time>+<iteration>: <kind> <severity>:
//! <message>`, written to standard error; severities at `Error` and above
//! stop the simulation with a failure status.

use crate::time::CycleRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a user assertion, least to most severe.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
pub enum Severity {
    /// Informational only.
    Note,
    /// Suspicious but not fatal.
    Warning,
    /// Stops the simulation with failure status.
    Error,
    /// Stops the simulation with failure status.
    Failure,
}

impl Severity {
    /// Converts a raw severity level as emitted by compiled code.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Severity::Note),
            1 => Some(Severity::Warning),
            2 => Some(Severity::Error),
            3 => Some(Severity::Failure),
            _ => None,
        }
    }

    /// Returns `true` if this severity stops the simulation.
    pub fn is_fatal(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "Note"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
            Severity::Failure => write!(f, "Failure"),
        }
    }
}

/// Whether a diagnostic came from an `assert` or a `report` statement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum AssertKind {
    /// A failed assertion.
    Assertion,
    /// A report statement.
    Report,
}

impl fmt::Display for AssertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertKind::Assertion => write!(f, "Assertion"),
            AssertKind::Report => write!(f, "Report"),
        }
    }
}

/// Formats one diagnostic line, without trailing newline.
pub fn assert_message(stamp: CycleRef, kind: AssertKind, severity: Severity, msg: &str) -> String {
    format!("{stamp}: {kind} {severity}: {msg}")
}
