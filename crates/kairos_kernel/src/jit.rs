//! Interface to the code generator.
//!
//! The kernel never compiles anything itself; it binds an elaborated design
//! against a [`CodeGenerator`] that turns each process into a callable and
//! receives the runtime identity of every signal. The trait mirrors the
//! setup sequence: `init`, per-signal [`bind_var`](CodeGenerator::bind_var),
//! per-builtin [`bind_fn`](CodeGenerator::bind_fn), per-process
//! [`fun_ptr`](CodeGenerator::fun_ptr), and finally `shutdown` when the
//! simulation completes.

use crate::abi::{BuiltinFn, ProcFn};
use crate::error::KernelError;
use crate::signal::SignalId;

/// Provider of compiled process bodies.
pub trait CodeGenerator {
    /// Prepares generated code for the named elaborated unit.
    fn init(&mut self, unit: &str) -> Result<(), KernelError>;

    /// Releases generated code. Called once after a clean run.
    fn shutdown(&mut self);

    /// Looks up the compiled entry point of the named process.
    ///
    /// Returns `None` when no entry point exists, which the kernel treats
    /// as a setup error.
    fn fun_ptr(&mut self, name: &str) -> Option<ProcFn>;

    /// Announces the runtime ID of the named signal, so compiled code can
    /// reach its storage by identifier.
    fn bind_var(&mut self, name: &str, signal: SignalId);

    /// Exports a kernel built-in to compiled code under the given name.
    fn bind_fn(&mut self, name: &str, f: BuiltinFn);
}
