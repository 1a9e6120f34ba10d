//! Kernel error types.

use crate::diag::Severity;
use crate::time::CycleRef;

/// Errors surfaced by kernel setup or by a simulation run.
///
/// Kernel-internal invariant violations are not represented here; they are
/// bugs and assert. Process callables never return errors either — a fatal
/// user assertion is recorded during dispatch and reported from `run` as
/// [`AssertionFailed`](KernelError::AssertionFailed).
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// The named design has no elaborated form the code generator can use.
    #[error("design `{design}` has not been elaborated")]
    NotElaborated {
        /// The design identifier.
        design: String,
    },

    /// A process has no compiled entry point.
    #[error("no compiled entry point for process `{process}`")]
    MissingEntryPoint {
        /// The process name.
        process: String,
    },

    /// A user assertion of `Error` or `Failure` severity stopped the run.
    #[error("simulation stopped at {stamp} by {severity} assertion: {message}")]
    AssertionFailed {
        /// Time and iteration at which the assertion fired.
        stamp: CycleRef,
        /// The assertion severity (`Error` or `Failure`).
        severity: Severity,
        /// The assertion message.
        message: String,
    },
}
