//! Per-driver transaction queues.
//!
//! Every driver of a signal owns an ordered list of [`Waveform`]
//! transactions. The front entry is always the driver's *committed*
//! transaction — its current contribution to the signal — and later entries
//! are pending, sorted by non-decreasing scheduled time. Scheduling is
//! transport-delay only: a new transaction never cancels pending ones.

use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A single scheduled transaction: drive `value` at time `when`.
///
/// The value is an opaque 64-bit word; the kernel compares it bitwise and
/// never interprets its payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Waveform {
    /// The driven value.
    pub value: u64,
    /// Absolute time at which the value takes effect.
    pub when: SimTime,
}

/// The ordered transaction queue of one driver.
///
/// Invariant: once initialised, the queue is non-empty and sorted by
/// non-decreasing `when`; the front entry is the committed transaction.
#[derive(Clone, Debug, Default)]
pub struct DriverQueue {
    pending: VecDeque<Waveform>,
}

impl DriverQueue {
    /// Creates an empty, uninitialised driver queue.
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Returns `true` if no transaction has ever been scheduled.
    pub fn is_uninitialised(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the committed transaction, if the driver is initialised.
    pub fn committed(&self) -> Option<&Waveform> {
        self.pending.front()
    }

    /// Returns the number of queued transactions, committed head included.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if the queue holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Inserts a transaction, keeping `when` non-decreasing. Equal times
    /// append after the existing run, so same-time scheduling is stable.
    ///
    /// The very first schedule also installs a committed head carrying the
    /// same value at time zero, so the real transaction sits behind it and
    /// is promoted by the ordinary commit path on the first cycle.
    pub fn schedule(&mut self, w: Waveform) {
        if self.pending.is_empty() {
            self.pending.push_back(Waveform {
                value: w.value,
                when: SimTime::ZERO,
            });
            self.pending.push_back(w);
            return;
        }
        let idx = self.pending.partition_point(|p| p.when <= w.when);
        self.pending.insert(idx, w);
    }

    /// Promotes the next transaction if it is due at `now`.
    ///
    /// When the committed head's successor has `when == now`, the head is
    /// dropped, the successor becomes the new committed transaction, and its
    /// value is returned. At most one transaction is promoted per call; a
    /// run of equal-time transactions is consumed by the matching run of
    /// driver-update events that scheduled them.
    pub fn commit(&mut self, now: SimTime) -> Option<u64> {
        debug_assert!(
            !self.pending.is_empty(),
            "driver updated before initialisation"
        );
        match self.pending.get(1) {
            Some(next) if next.when == now => {
                self.pending.pop_front();
                Some(self.pending.front().expect("promoted transaction").value)
            }
            _ => None,
        }
    }
}
