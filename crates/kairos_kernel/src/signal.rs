//! Runtime signal records.
//!
//! Each elaborated signal declaration gets one [`SignalState`]: the current
//! resolved value, the per-cycle `ACTIVE`/`EVENT` flags, and one
//! [`DriverQueue`] per driver. Records are arena-allocated at setup and live
//! for the entire run.

use crate::time::SimTime;
use crate::waveform::DriverQueue;
use kairos_ir::{ArenaId, SignalDeclId};
use serde::{Deserialize, Serialize};

/// ID of a runtime signal record in the kernel's signal arena.
///
/// Distinct from [`SignalDeclId`]: the declaration belongs to the elaborated
/// tree, the record to the kernel. Compiled process code refers to signals
/// by this ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates an ID from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl ArenaId for SignalId {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-cycle status flags of a signal.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize, Deserialize)]
pub struct SignalFlags(u8);

impl SignalFlags {
    /// The signal was updated this cycle.
    pub const ACTIVE: SignalFlags = SignalFlags(1 << 0);
    /// The signal's committed value changed this cycle.
    pub const EVENT: SignalFlags = SignalFlags(1 << 1);

    /// The empty flag set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every flag in `other` is set in `self`.
    pub fn contains(self, other: SignalFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no flag is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Sets the flags in `other`.
    pub fn insert(&mut self, other: SignalFlags) {
        self.0 |= other.0;
    }

    /// Clears all flags.
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// What a call to [`SignalState::update_drivers`] did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UpdateOutcome {
    /// The value committed by the last promoting driver, if any committed.
    pub committed: Option<u64>,
    /// `true` when this call made the signal active and it was not already
    /// active this cycle.
    pub newly_active: bool,
}

/// The runtime state of one signal.
#[derive(Debug)]
pub struct SignalState {
    /// Back-reference to the declaration in the elaborated tree.
    pub decl: SignalDeclId,
    /// Resolved signal name, kept for diagnostics and tracing.
    pub name: String,
    /// The current value, an opaque 64-bit word.
    pub resolved: u64,
    /// `ACTIVE`/`EVENT` flags for the current cycle.
    pub flags: SignalFlags,
    /// One transaction queue per driver; the length is the declaration's
    /// driver count.
    pub drivers: Vec<DriverQueue>,
}

impl SignalState {
    /// Creates a signal record with `drivers` empty driver queues.
    pub fn new(decl: SignalDeclId, name: String, drivers: u32) -> Self {
        Self {
            decl,
            name,
            resolved: 0,
            flags: SignalFlags::empty(),
            drivers: (0..drivers).map(|_| DriverQueue::new()).collect(),
        }
    }

    /// Commits every driver transaction due at `now` into `resolved`.
    ///
    /// Drivers are scanned in index order; when several commit in the same
    /// call the last one wins (single-source semantics, no resolution
    /// function). Outside the first cycle each commit sets `ACTIVE` and, if
    /// the committed word differs bitwise from the previous value, `EVENT`.
    /// On the first cycle (`now == 0`, iteration 0) the initial value is
    /// installed without flags.
    ///
    /// The outcome's `newly_active` field tells the caller to record the
    /// signal in the active-signal set, and is reported at most once per
    /// cycle.
    pub fn update_drivers(&mut self, now: SimTime, first_cycle: bool) -> UpdateOutcome {
        let was_active = self.flags.contains(SignalFlags::ACTIVE);
        let mut committed = None;
        for queue in &mut self.drivers {
            if let Some(value) = queue.commit(now) {
                if !first_cycle {
                    self.flags.insert(SignalFlags::ACTIVE);
                    if value != self.resolved {
                        self.flags.insert(SignalFlags::EVENT);
                    }
                }
                self.resolved = value;
                committed = Some(value);
            }
        }
        UpdateOutcome {
            committed,
            newly_active: committed.is_some() && !first_cycle && !was_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::Waveform;

    fn make_signal(drivers: u32) -> SignalState {
        SignalState::new(SignalDeclId::from_index(0), "x".to_string(), drivers)
    }

    fn drive(sig: &mut SignalState, driver: usize, value: u64, when_fs: u64) {
        sig.drivers[driver].schedule(Waveform {
            value,
            when: SimTime::from_fs(when_fs),
        });
    }

    #[test]
    fn flags_insert_contains_clear() {
        let mut flags = SignalFlags::empty();
        assert!(flags.is_empty());
        flags.insert(SignalFlags::ACTIVE);
        assert!(flags.contains(SignalFlags::ACTIVE));
        assert!(!flags.contains(SignalFlags::EVENT));
        flags.insert(SignalFlags::EVENT);
        assert!(flags.contains(SignalFlags::EVENT));
        flags.clear();
        assert!(flags.is_empty());
    }

    #[test]
    fn new_signal_has_driver_slots() {
        let sig = make_signal(3);
        assert_eq!(sig.drivers.len(), 3);
        assert_eq!(sig.resolved, 0);
        assert!(sig.flags.is_empty());
    }

    #[test]
    fn first_cycle_commit_sets_no_flags() {
        let mut sig = make_signal(1);
        drive(&mut sig, 0, 5, 0);
        let outcome = sig.update_drivers(SimTime::ZERO, true);
        assert_eq!(sig.resolved, 5);
        assert!(sig.flags.is_empty());
        assert_eq!(outcome.committed, Some(5));
        assert!(!outcome.newly_active);
    }

    #[test]
    fn later_commit_sets_active_and_event() {
        let mut sig = make_signal(1);
        drive(&mut sig, 0, 0, 0);
        sig.update_drivers(SimTime::ZERO, true);

        drive(&mut sig, 0, 1, 1_000);
        let outcome = sig.update_drivers(SimTime::from_fs(1_000), false);
        assert!(outcome.newly_active);
        assert_eq!(sig.resolved, 1);
        assert!(sig.flags.contains(SignalFlags::ACTIVE));
        assert!(sig.flags.contains(SignalFlags::EVENT));
    }

    #[test]
    fn same_value_commit_is_active_but_no_event() {
        let mut sig = make_signal(1);
        drive(&mut sig, 0, 7, 0);
        sig.update_drivers(SimTime::ZERO, true);

        drive(&mut sig, 0, 7, 1_000);
        sig.update_drivers(SimTime::from_fs(1_000), false);
        assert!(sig.flags.contains(SignalFlags::ACTIVE));
        assert!(!sig.flags.contains(SignalFlags::EVENT));
    }

    #[test]
    fn second_update_in_cycle_is_not_newly_active() {
        let mut sig = make_signal(1);
        drive(&mut sig, 0, 0, 0);
        sig.update_drivers(SimTime::ZERO, true);

        drive(&mut sig, 0, 1, 1_000);
        drive(&mut sig, 0, 2, 1_000);
        let now = SimTime::from_fs(1_000);
        assert!(sig.update_drivers(now, false).newly_active);
        // The second driver-update event of the same cycle must not
        // register the signal in the active set again.
        assert!(!sig.update_drivers(now, false).newly_active);
        assert_eq!(sig.resolved, 2);
    }

    #[test]
    fn last_driver_wins() {
        let mut sig = make_signal(2);
        drive(&mut sig, 0, 1, 0);
        drive(&mut sig, 1, 2, 0);
        sig.update_drivers(SimTime::ZERO, true);
        assert_eq!(sig.resolved, 2);
    }

    #[test]
    fn undue_transactions_leave_signal_untouched() {
        let mut sig = make_signal(1);
        drive(&mut sig, 0, 4, 0);
        sig.update_drivers(SimTime::ZERO, true);

        drive(&mut sig, 0, 9, 5_000);
        let outcome = sig.update_drivers(SimTime::from_fs(1_000), false);
        assert_eq!(outcome.committed, None);
        assert!(!outcome.newly_active);
        assert_eq!(sig.resolved, 4);
        assert!(sig.flags.is_empty());
    }
}
