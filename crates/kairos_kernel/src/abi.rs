//! The runtime ABI: operations exposed to compiled process code.
//!
//! Every process body is compiled to a [`ProcFn`] that receives a mutable
//! borrow of the runtime state [`RtState`] and a `reset` flag. The only
//! side effects available to a process are the methods here: suspending
//! itself with [`sched_process`], driving signals with [`sched_waveform`],
//! raising diagnostics with [`assert_fail`], and reading the clock and
//! signal values. Process callables never return errors; a fatal assertion
//! is recorded in the state and honoured by the cycle driver.
//!
//! [`sched_process`]: RtState::sched_process
//! [`sched_waveform`]: RtState::sched_waveform
//! [`assert_fail`]: RtState::assert_fail

use crate::diag::{self, AssertKind, Severity};
use crate::queue::{DeltaQueue, Event};
use crate::signal::{SignalFlags, SignalId, SignalState};
use crate::time::{CycleRef, SimTime};
use kairos_ir::{Arena, ArenaId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ID of a process record in the kernel's process table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Creates an ID from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl ArenaId for ProcessId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A compiled process body.
///
/// Invoked once with `reset = true` during initialisation and with
/// `reset = false` on every subsequent wake-up. The callable runs to
/// completion each time; it suspends by re-scheduling itself through
/// [`RtState::sched_process`] and returning.
pub type ProcFn = Box<dyn FnMut(&mut RtState, bool)>;

/// A kernel built-in exported to compiled code, such as `STD.STANDARD.NOW`.
pub type BuiltinFn = fn(&RtState) -> u64;

/// A pending fatal stop raised by a user assertion.
#[derive(Clone, Debug)]
pub(crate) struct FatalStop {
    pub stamp: CycleRef,
    pub severity: Severity,
    pub message: String,
}

/// The mutable runtime state shared between the cycle driver and process
/// callables.
///
/// Single-threaded by design: the cycle driver owns the state and lends it
/// to one process at a time. The `active_proc` slot identifies the process
/// currently being dispatched, so [`sched_process`](RtState::sched_process)
/// needs no explicit self argument.
pub struct RtState {
    pub(crate) now: SimTime,
    pub(crate) iteration: i32,
    pub(crate) active_proc: Option<ProcessId>,
    pub(crate) queue: DeltaQueue,
    pub(crate) signals: Arena<SignalId, SignalState>,
    pub(crate) active_signals: Vec<SignalId>,
    pub(crate) stop: Option<FatalStop>,
    pub(crate) trace: bool,
}

macro_rules! rt_trace {
    ($rt:expr, $($arg:tt)*) => {
        if $rt.trace_enabled() {
            $rt.trace_line(format_args!($($arg)*));
        }
    };
}
pub(crate) use rt_trace;

impl RtState {
    pub(crate) fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            iteration: -1,
            active_proc: None,
            queue: DeltaQueue::new(),
            signals: Arena::new(),
            active_signals: Vec::new(),
            stop: None,
            trace: false,
        }
    }

    /// Returns the current simulated time (the `STD.STANDARD.NOW` built-in).
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Returns the current delta iteration; `-1` during initialisation.
    pub fn iteration(&self) -> i32 {
        self.iteration
    }

    /// Returns the full `(time, iteration)` stamp.
    pub fn stamp(&self) -> CycleRef {
        CycleRef {
            time: self.now,
            iteration: self.iteration,
        }
    }

    /// Schedules the currently active process to wake at `now + delay`.
    ///
    /// A zero delay wakes the process in the next delta iteration of the
    /// same simulated time.
    ///
    /// # Panics
    ///
    /// Panics if called outside a process dispatch; only process code may
    /// suspend a process.
    pub fn sched_process(&mut self, delay: u64) {
        rt_trace!(self, "sched_process delay={}", SimTime::from_fs(delay));
        let proc = self
            .active_proc
            .expect("sched_process called outside a process dispatch");
        self.queue.schedule(delay, self.iteration, Event::Wake(proc));
    }

    /// Schedules a transaction on driver `source` of `signal`, taking
    /// effect at `now + after`, and enqueues the matching driver update.
    pub fn sched_waveform(&mut self, signal: SignalId, source: u32, value: u64, after: u64) {
        rt_trace!(
            self,
            "sched_waveform {} source={} value={:#x} after={}",
            self.signals[signal].name,
            source,
            value,
            SimTime::from_fs(after)
        );
        let when = self.now.offset(after);
        let sig = &mut self.signals[signal];
        debug_assert!((source as usize) < sig.drivers.len(), "driver out of range");
        sig.drivers[source as usize].schedule(crate::waveform::Waveform { value, when });
        self.queue
            .schedule(after, self.iteration, Event::Commit(signal));
    }

    /// Emits an assertion or report diagnostic to standard error.
    ///
    /// Severities of `Error` and above record a fatal stop; the cycle
    /// driver halts the simulation at the next dispatch boundary and the
    /// run ends with failure status.
    pub fn assert_fail(&mut self, kind: AssertKind, msg: &str, severity: Severity) {
        eprintln!("{}", diag::assert_message(self.stamp(), kind, severity, msg));
        if severity.is_fatal() && self.stop.is_none() {
            self.stop = Some(FatalStop {
                stamp: self.stamp(),
                severity,
                message: msg.to_string(),
            });
        }
    }

    /// Returns the current resolved value of a signal.
    pub fn signal_value(&self, signal: SignalId) -> u64 {
        self.signals[signal].resolved
    }

    /// Returns a signal's `ACTIVE`/`EVENT` flags for the current cycle.
    pub fn signal_flags(&self, signal: SignalId) -> SignalFlags {
        self.signals[signal].flags
    }

    /// Commits due transactions on all drivers of `signal` and tracks the
    /// signal in the active set.
    pub(crate) fn update_driver(&mut self, signal: SignalId) {
        let first_cycle = self.iteration == 0 && self.now == SimTime::ZERO;
        let outcome = self.signals[signal].update_drivers(self.now, first_cycle);
        if outcome.newly_active {
            self.active_signals.push(signal);
        }
        if let Some(value) = outcome.committed {
            rt_trace!(
                self,
                "update signal {} value {}",
                self.signals[signal].name,
                value
            );
        }
    }

    /// Clears `ACTIVE`/`EVENT` on every signal touched this cycle and
    /// empties the active set.
    pub(crate) fn clear_active_signals(&mut self) {
        while let Some(id) = self.active_signals.pop() {
            self.signals[id].flags.clear();
        }
    }

    pub(crate) fn trace_enabled(&self) -> bool {
        self.trace
    }

    pub(crate) fn trace_line(&self, args: fmt::Arguments<'_>) {
        if self.iteration < 0 {
            eprintln!("TRACE (init): {args}");
        } else {
            eprintln!("TRACE {}: {args}", self.stamp());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairos_ir::SignalDeclId;

    fn state_with_signal(drivers: u32) -> (RtState, SignalId) {
        let mut rt = RtState::new();
        let id = rt.signals.alloc(SignalState::new(
            SignalDeclId::from_index(0),
            "x".to_string(),
            drivers,
        ));
        (rt, id)
    }

    #[test]
    fn now_and_stamp_start_at_init() {
        let rt = RtState::new();
        assert_eq!(rt.now(), SimTime::ZERO);
        assert_eq!(rt.iteration(), -1);
        assert_eq!(rt.stamp(), CycleRef::INIT);
    }

    #[test]
    fn sched_process_wakes_active_process() {
        let mut rt = RtState::new();
        rt.active_proc = Some(ProcessId::from_raw(3));
        rt.sched_process(500);
        // The event sits 500 fs in the future at iteration 0.
        assert_eq!(rt.queue.len(), 1);
        assert_eq!(rt.queue.head_delta(), Some(500));
        assert_eq!(rt.queue.head_iteration(), Some(0));
    }

    #[test]
    #[should_panic(expected = "outside a process dispatch")]
    fn sched_process_requires_active_process() {
        let mut rt = RtState::new();
        rt.sched_process(0);
    }

    #[test]
    fn sched_waveform_queues_transaction_and_update() {
        let (mut rt, id) = state_with_signal(1);
        rt.sched_waveform(id, 0, 42, 0);
        // The driver holds the synthesized head plus the real transaction,
        // and a commit event is scheduled for the same time.
        assert_eq!(rt.signals[id].drivers[0].len(), 2);
        assert_eq!(rt.queue.len(), 1);
        assert_eq!(rt.queue.head_delta(), Some(0));
    }

    #[test]
    fn update_driver_commits_and_tracks_active() {
        let (mut rt, id) = state_with_signal(1);
        rt.sched_waveform(id, 0, 1, 0);
        rt.iteration = 1;
        rt.update_driver(id);
        assert_eq!(rt.signal_value(id), 1);
        assert!(rt.signal_flags(id).contains(SignalFlags::EVENT));
        assert_eq!(rt.active_signals, vec![id]);
    }

    #[test]
    fn first_cycle_update_is_silent() {
        let (mut rt, id) = state_with_signal(1);
        rt.sched_waveform(id, 0, 9, 0);
        rt.iteration = 0;
        rt.update_driver(id);
        assert_eq!(rt.signal_value(id), 9);
        assert!(rt.signal_flags(id).is_empty());
        assert!(rt.active_signals.is_empty());
    }

    #[test]
    fn clear_active_signals_resets_flags() {
        let (mut rt, id) = state_with_signal(1);
        rt.sched_waveform(id, 0, 1, 0);
        rt.iteration = 1;
        rt.update_driver(id);
        rt.clear_active_signals();
        assert!(rt.signal_flags(id).is_empty());
        assert!(rt.active_signals.is_empty());
    }

    #[test]
    fn fatal_assertion_records_stop() {
        let mut rt = RtState::new();
        rt.assert_fail(AssertKind::Assertion, "bad", Severity::Failure);
        let stop = rt.stop.as_ref().unwrap();
        assert_eq!(stop.severity, Severity::Failure);
        assert_eq!(stop.message, "bad");
        assert_eq!(stop.stamp, CycleRef::INIT);
    }

    #[test]
    fn non_fatal_assertion_continues() {
        let mut rt = RtState::new();
        rt.assert_fail(AssertKind::Report, "just saying", Severity::Warning);
        assert!(rt.stop.is_none());
    }

    #[test]
    fn first_fatal_stop_is_kept() {
        let mut rt = RtState::new();
        rt.assert_fail(AssertKind::Assertion, "first", Severity::Error);
        rt.assert_fail(AssertKind::Assertion, "second", Severity::Failure);
        assert_eq!(rt.stop.as_ref().unwrap().message, "first");
    }
}
