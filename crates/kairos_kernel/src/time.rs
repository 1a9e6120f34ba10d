//! Simulated time with femtosecond resolution.
//!
//! The kernel orders work by a two-level key: physical time in femtoseconds
//! plus a delta-iteration counter that resets whenever physical time
//! advances. [`SimTime`] is the physical component; [`CycleRef`] is the full
//! `(time, iteration)` stamp used for diagnostics and ordering checks.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;

/// A point in simulated time, counted in femtoseconds.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
pub struct SimTime(u64);

impl SimTime {
    /// Time zero.
    pub const ZERO: SimTime = SimTime(0);

    /// Creates a time from a femtosecond count.
    pub fn from_fs(fs: u64) -> Self {
        Self(fs)
    }

    /// Creates a time from a picosecond count.
    pub fn from_ps(ps: u64) -> Self {
        Self(ps * FS_PER_PS)
    }

    /// Creates a time from a nanosecond count.
    pub fn from_ns(ns: u64) -> Self {
        Self(ns * FS_PER_NS)
    }

    /// Creates a time from a microsecond count.
    pub fn from_us(us: u64) -> Self {
        Self(us * FS_PER_US)
    }

    /// Returns the femtosecond count.
    pub fn fs(self) -> u64 {
        self.0
    }

    /// Returns this time advanced by `fs` femtoseconds.
    pub fn offset(self, fs: u64) -> Self {
        Self(self.0 + fs)
    }
}

impl fmt::Display for SimTime {
    /// Renders with the largest unit that divides the value exactly,
    /// falling back to femtoseconds: `500ps`, `10ns`, `3fs`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.0;
        if fs == 0 {
            write!(f, "0fs")
        } else if fs.is_multiple_of(FS_PER_MS) {
            write!(f, "{}ms", fs / FS_PER_MS)
        } else if fs.is_multiple_of(FS_PER_US) {
            write!(f, "{}us", fs / FS_PER_US)
        } else if fs.is_multiple_of(FS_PER_NS) {
            write!(f, "{}ns", fs / FS_PER_NS)
        } else if fs.is_multiple_of(FS_PER_PS) {
            write!(f, "{}ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs}fs")
        }
    }
}

/// A full simulation-cycle stamp: physical time plus delta iteration.
///
/// The iteration counter is `-1` before the first cycle, `0` on each cycle
/// that advances physical time, and increments per delta iteration within a
/// single time. Ordering is lexicographic on `(time, iteration)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CycleRef {
    /// Physical simulated time.
    pub time: SimTime,
    /// Delta iteration within `time`.
    pub iteration: i32,
}

impl CycleRef {
    /// The stamp before the first simulation cycle: `(0, -1)`.
    pub const INIT: CycleRef = CycleRef {
        time: SimTime::ZERO,
        iteration: -1,
    };
}

impl Ord for CycleRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.iteration.cmp(&other.iteration))
    }
}

impl PartialOrd for CycleRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CycleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.time, self.iteration)
    }
}
