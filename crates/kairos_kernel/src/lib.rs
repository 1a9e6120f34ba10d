//! Discrete-event simulation kernel for the Kairos HDL simulator.
//!
//! The kernel drives an elaborated design — a flat collection of signal
//! declarations and processes — forward through simulated time. Compiled
//! process bodies call back into the runtime ABI to drive signals and
//! suspend themselves; the cycle driver drains a time-ordered event queue,
//! commits driver transactions, and wakes processes so that every process
//! observes a consistent snapshot of signal values per delta cycle.
//!
//! # Architecture
//!
//! - `time` — femtosecond time plus the delta-iteration counter
//! - `waveform` — per-driver transaction queues (transport delay)
//! - `signal` — runtime signal records with `ACTIVE`/`EVENT` flags
//! - `queue` — the delta queue, ordered by cumulative relative offsets
//! - `abi` — the runtime ABI exposed to compiled process code
//! - `jit` — the code-generator interface the kernel binds against
//! - `kernel` — setup and the simulation cycle loop
//! - `diag` — assertion/report diagnostics
//! - `error` — kernel error types
//!
//! # Usage
//!
//! ```ignore
//! use kairos_kernel::{simulate, SimConfig};
//!
//! let config = SimConfig::default();
//! let result = simulate(&design, &config, &interner, codegen)?;
//! println!("simulation ended at {}", result.final_time);
//! ```

#![warn(missing_docs)]

pub mod abi;
pub mod diag;
pub mod error;
pub mod jit;
pub mod kernel;
pub mod queue;
pub mod signal;
pub mod time;
pub mod waveform;

pub use abi::{BuiltinFn, ProcFn, ProcessId, RtState};
pub use diag::{AssertKind, Severity};
pub use error::KernelError;
pub use jit::CodeGenerator;
pub use kernel::{SimKernel, SimResult};
pub use queue::{DeltaQueue, Event};
pub use signal::{SignalFlags, SignalId, SignalState};
pub use time::{CycleRef, SimTime};
pub use waveform::{DriverQueue, Waveform};

use kairos_ir::{ElabDesign, Interner};

/// Configuration for a simulation run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimConfig {
    /// Optional cap on simulated time; events beyond it never execute.
    pub time_limit: Option<SimTime>,
    /// Whether to emit trace output on standard error.
    pub trace: bool,
}

/// High-level entry point: binds `design` and runs it to completion.
pub fn simulate(
    design: &ElabDesign,
    config: &SimConfig,
    interner: &Interner,
    codegen: Box<dyn CodeGenerator>,
) -> Result<SimResult, KernelError> {
    let mut kernel = SimKernel::new(design, interner, codegen)?;
    kernel.set_trace(config.trace);
    if let Some(limit) = config.time_limit {
        kernel.set_time_limit(limit);
    }
    kernel.run()
}
