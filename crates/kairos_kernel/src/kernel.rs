//! The cycle driver: setup, initialisation, and the simulation loop.
//!
//! [`SimKernel`] binds an elaborated design to runtime records, runs every
//! process once in reset mode, and then repeatedly executes the classical
//! simulation cycle: advance time to the next scheduled event, dispatch the
//! whole `(time, iteration)` cohort in queue order, and clear the per-cycle
//! signal flags. The run ends when the event queue drains, a fatal user
//! assertion fires, or the optional time limit is reached.

use crate::abi::{rt_trace, ProcFn, ProcessId, RtState};
use crate::error::KernelError;
use crate::jit::CodeGenerator;
use crate::queue::Event;
use crate::signal::{SignalFlags, SignalId, SignalState};
use crate::time::{CycleRef, SimTime};
use kairos_ir::{Arena, ElabDesign, Interner, ProcessDeclId, SignalDeclId};
use std::collections::HashMap;

/// A process bound to its compiled entry point.
struct ProcessRec {
    /// Back-reference to the statement in the elaborated tree.
    decl: ProcessDeclId,
    /// Resolved process name, kept for diagnostics and tracing.
    name: String,
    proc_fn: ProcFn,
}

/// Statistics of a completed simulation run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SimResult {
    /// Simulated time when the run ended.
    pub final_time: SimTime,
    /// Number of simulation cycles executed.
    pub total_cycles: u64,
    /// How many of those cycles were delta iterations (`iteration > 0`).
    pub delta_cycles: u64,
}

/// The simulation kernel.
///
/// Created from an elaborated design, an interner resolving its names, and
/// the code generator holding the compiled process bodies. Drive it with
/// [`run`](SimKernel::run), or step it manually with
/// [`initialise`](SimKernel::initialise) and [`cycle`](SimKernel::cycle).
pub struct SimKernel {
    rt: RtState,
    procs: Arena<ProcessId, ProcessRec>,
    codegen: Box<dyn CodeGenerator>,
    /// Non-owning side-table from tree declarations to runtime records.
    signal_of_decl: HashMap<SignalDeclId, SignalId>,
    time_limit: Option<SimTime>,
    initialised: bool,
    total_cycles: u64,
    delta_cycles: u64,
}

impl SimKernel {
    /// Binds `design` to runtime records.
    ///
    /// Allocates one signal record per declaration (with one driver queue
    /// per elaborated driver), announces each signal's runtime ID to the
    /// code generator, exports the `STD.STANDARD.NOW` built-in, and
    /// resolves every process's entry point.
    pub fn new(
        design: &ElabDesign,
        interner: &Interner,
        mut codegen: Box<dyn CodeGenerator>,
    ) -> Result<Self, KernelError> {
        codegen.init(interner.resolve(design.name))?;
        codegen.bind_fn("STD.STANDARD.NOW", |rt| rt.now().fs());

        let mut rt = RtState::new();
        let mut signal_of_decl = HashMap::new();
        for (decl_id, decl) in design.signals.iter() {
            let name = interner.resolve(decl.name).to_string();
            let id = rt
                .signals
                .alloc(SignalState::new(decl_id, name.clone(), decl.drivers));
            signal_of_decl.insert(decl_id, id);
            codegen.bind_var(&name, id);
        }

        let mut procs = Arena::new();
        for (decl_id, pdecl) in design.processes.iter() {
            let name = interner.resolve(pdecl.name).to_string();
            let proc_fn = codegen
                .fun_ptr(&name)
                .ok_or_else(|| KernelError::MissingEntryPoint {
                    process: name.clone(),
                })?;
            procs.alloc(ProcessRec {
                decl: decl_id,
                name,
                proc_fn,
            });
        }

        Ok(Self {
            rt,
            procs,
            codegen,
            signal_of_decl,
            time_limit: None,
            initialised: false,
            total_cycles: 0,
            delta_cycles: 0,
        })
    }

    /// Enables or disables trace output on standard error.
    pub fn set_trace(&mut self, enabled: bool) {
        self.rt.trace = enabled;
    }

    /// Caps the run: cycles whose events lie beyond `limit` never execute.
    pub fn set_time_limit(&mut self, limit: SimTime) {
        self.time_limit = Some(limit);
    }

    /// Returns the current simulated time.
    pub fn current_time(&self) -> SimTime {
        self.rt.now()
    }

    /// Returns the current delta iteration (`-1` before the first cycle).
    pub fn iteration(&self) -> i32 {
        self.rt.iteration()
    }

    /// Returns the full `(time, iteration)` stamp.
    pub fn stamp(&self) -> CycleRef {
        self.rt.stamp()
    }

    /// Returns a signal's current resolved value.
    pub fn signal_value(&self, signal: SignalId) -> u64 {
        self.rt.signal_value(signal)
    }

    /// Returns a signal's `ACTIVE`/`EVENT` flags.
    pub fn signal_flags(&self, signal: SignalId) -> SignalFlags {
        self.rt.signal_flags(signal)
    }

    /// Looks up a runtime signal by name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        self.rt
            .signals
            .iter()
            .find(|(_, s)| s.name == name)
            .map(|(id, _)| id)
    }

    /// Returns the runtime record bound to a tree declaration.
    pub fn signal_of_decl(&self, decl: SignalDeclId) -> Option<SignalId> {
        self.signal_of_decl.get(&decl).copied()
    }

    /// Returns the tree declaration behind a runtime signal.
    pub fn signal_decl(&self, signal: SignalId) -> SignalDeclId {
        self.rt.signals[signal].decl
    }

    /// Returns the tree statement behind a process record.
    pub fn process_decl(&self, process: ProcessId) -> ProcessDeclId {
        self.procs[process].decl
    }

    /// Returns the number of runtime signal records.
    pub fn signal_count(&self) -> usize {
        self.rt.signals.len()
    }

    /// Returns the number of bound processes.
    pub fn process_count(&self) -> usize {
        self.procs.len()
    }

    /// Returns the number of scheduled events still in the queue.
    pub fn pending_events(&self) -> usize {
        self.rt.queue.len()
    }

    /// Runs the initialisation phase: every process once with `reset =
    /// true`, at time zero and iteration `-1`.
    ///
    /// Reset invocations install initial driver values and suspend their
    /// process; the events they schedule form the first cycle's cohort.
    /// Idempotent: a second call does nothing.
    pub fn initialise(&mut self) -> Result<(), KernelError> {
        if self.initialised {
            return Ok(());
        }
        self.initialised = true;

        self.rt.now = SimTime::ZERO;
        self.rt.iteration = -1;

        let ids: Vec<ProcessId> = self.procs.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.run_process(id, true);
            if self.rt.stop.is_some() {
                return Err(self.take_stop());
            }
        }
        Ok(())
    }

    /// Executes one simulation cycle.
    ///
    /// Advances time to the queue head, dispatches every event of the
    /// current `(time, iteration)` cohort in queue order, then clears the
    /// `ACTIVE`/`EVENT` flags of all signals touched in the cycle.
    ///
    /// # Panics
    ///
    /// Panics if the event queue is empty.
    pub fn cycle(&mut self) {
        let consumed = self.rt.queue.advance();
        if consumed > 0 {
            self.rt.now = self.rt.now.offset(consumed);
            debug_assert_eq!(
                self.rt.queue.head_iteration(),
                Some(0),
                "time advance must land on iteration 0"
            );
            self.rt.iteration = 0;
        } else {
            self.rt.iteration = self.rt.queue.head_iteration().expect("cycle on empty queue");
            if self.rt.iteration > 0 {
                self.delta_cycles += 1;
            }
        }

        rt_trace!(self.rt, "begin cycle");
        if self.rt.trace_enabled() {
            self.dump_deltaq();
        }

        loop {
            match self.rt.queue.pop().expect("cohort event") {
                Event::Wake(pid) => self.run_process(pid, false),
                Event::Commit(sid) => self.rt.update_driver(sid),
            }
            if self.rt.stop.is_some() {
                break;
            }
            let cohort_continues = self.rt.queue.head_delta() == Some(0)
                && self.rt.queue.head_iteration() == Some(self.rt.iteration);
            if !cohort_continues {
                break;
            }
        }

        self.rt.clear_active_signals();
        self.total_cycles += 1;
    }

    /// Runs the simulation to completion.
    ///
    /// Initialises if necessary, then cycles until the event queue drains
    /// or the time limit is passed. A fatal user assertion ends the run
    /// with [`KernelError::AssertionFailed`]; everything else is a clean
    /// termination.
    pub fn run(&mut self) -> Result<SimResult, KernelError> {
        self.initialise()?;

        while !self.rt.queue.is_empty() {
            if let Some(limit) = self.time_limit {
                let head = self.rt.queue.head_delta().expect("non-empty queue");
                if self.rt.now.offset(head) > limit {
                    break;
                }
            }
            self.cycle();
            if self.rt.stop.is_some() {
                return Err(self.take_stop());
            }
        }

        self.codegen.shutdown();
        Ok(SimResult {
            final_time: self.rt.now,
            total_cycles: self.total_cycles,
            delta_cycles: self.delta_cycles,
        })
    }

    /// Dispatches one process, maintaining the ambient active-process slot.
    fn run_process(&mut self, id: ProcessId, reset: bool) {
        rt_trace!(
            self.rt,
            "{} process {}",
            if reset { "reset" } else { "run" },
            self.procs[id].name
        );
        // Saved and restored so a future re-entrant dispatch stays correct.
        let prev = self.rt.active_proc.replace(id);
        (self.procs[id].proc_fn)(&mut self.rt, reset);
        self.rt.active_proc = prev;
    }

    fn take_stop(&mut self) -> KernelError {
        let stop = self.rt.stop.take().expect("pending stop");
        KernelError::AssertionFailed {
            stamp: stop.stamp,
            severity: stop.severity,
            message: stop.message,
        }
    }

    fn dump_deltaq(&self) {
        for (delta, iteration, event) in self.rt.queue.iter() {
            match event {
                Event::Wake(pid) => eprintln!(
                    "TRACE\t{}+{iteration}\tprocess\t{}",
                    SimTime::from_fs(delta),
                    self.procs[*pid].name
                ),
                Event::Commit(sid) => eprintln!(
                    "TRACE\t{}+{iteration}\tdriver\t{}",
                    SimTime::from_fs(delta),
                    self.rt.signals[*sid].name
                ),
            }
        }
    }
}
