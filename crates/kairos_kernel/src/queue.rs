//! The delta queue: time-ordered scheduled events.
//!
//! The queue keeps every scheduled event sorted by absolute time, but stores
//! that time as *cumulative relative offsets*: the front slot's delta is the
//! offset from the current simulation time, and every later slot's delta is
//! relative to its predecessor. Advancing simulation time is then a single
//! subtraction on the front slot. The source's singly linked list becomes a
//! `VecDeque` here; the offset representation and insertion semantics are
//! unchanged.

use crate::abi::ProcessId;
use crate::signal::SignalId;
use std::collections::VecDeque;

/// A scheduled event: either a process wake-up or a signal driver update.
///
/// The two kinds are mutually exclusive by construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Event {
    /// Wake the given process.
    Wake(ProcessId),
    /// Commit due transactions on the given signal's drivers.
    Commit(SignalId),
}

#[derive(Clone, Debug)]
struct Slot {
    /// Offset in femtoseconds from the predecessor slot (from `now` for the
    /// front slot).
    delta: u64,
    /// Delta iteration in which the event runs, valid when `delta == 0`.
    iteration: i32,
    event: Event,
}

/// Time-ordered event queue with relative offsets.
#[derive(Debug, Default)]
pub struct DeltaQueue {
    slots: VecDeque<Slot>,
}

impl DeltaQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
        }
    }

    /// Returns `true` if no events are scheduled.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of scheduled events.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Schedules `event` at `offset` femtoseconds from the current time.
    ///
    /// A zero offset lands the event in the next delta iteration
    /// (`current_iteration + 1`); a positive offset lands it at iteration 0
    /// of the later time. Events with equal absolute time keep insertion
    /// order.
    pub fn schedule(&mut self, offset: u64, current_iteration: i32, event: Event) {
        let iteration = if offset == 0 { current_iteration + 1 } else { 0 };

        // Walk the prefix sums until the landing position, then store the
        // residual and take it out of the successor.
        let mut sum = 0u64;
        let mut idx = 0usize;
        for slot in &self.slots {
            if sum + slot.delta > offset {
                break;
            }
            sum += slot.delta;
            idx += 1;
        }
        let residual = offset - sum;
        if let Some(next) = self.slots.get_mut(idx) {
            next.delta -= residual;
        }
        self.slots.insert(
            idx,
            Slot {
                delta: residual,
                iteration,
                event,
            },
        );
    }

    /// Consumes and returns the front slot's time offset, leaving it zero.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    pub fn advance(&mut self) -> u64 {
        let head = self.slots.front_mut().expect("advance on empty queue");
        std::mem::take(&mut head.delta)
    }

    /// Returns the front slot's time offset without consuming it.
    pub fn head_delta(&self) -> Option<u64> {
        self.slots.front().map(|s| s.delta)
    }

    /// Returns the front slot's iteration field.
    pub fn head_iteration(&self) -> Option<i32> {
        self.slots.front().map(|s| s.iteration)
    }

    /// Removes and returns the front event.
    ///
    /// Only events whose offset has been consumed by [`advance`]
    /// (or that were scheduled in the current cohort) are popped, so the
    /// successor's delta remains the offset from the current time.
    ///
    /// [`advance`]: DeltaQueue::advance
    pub fn pop(&mut self) -> Option<Event> {
        let slot = self.slots.pop_front()?;
        debug_assert_eq!(slot.delta, 0, "popped event still in the future");
        Some(slot.event)
    }

    /// Iterates over `(relative offset, iteration, event)` triples in queue
    /// order, for trace dumps.
    pub fn iter(&self) -> impl Iterator<Item = (u64, i32, &Event)> {
        self.slots.iter().map(|s| (s.delta, s.iteration, &s.event))
    }
}
