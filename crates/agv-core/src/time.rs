//! Simulation time model.
//!
//! # Design
//!
//! Time is continuous: a `SimTime` is a number of simulated seconds since the
//! start of the run, stored as `f64`.  Travel and charge durations are
//! fractional, so an integer tick would either lose precision or force an
//! arbitrary resolution on every duration in the model.
//!
//! `f64` is not `Ord`, so `SimTime` supplies a total order via
//! [`f64::total_cmp`].  That is what lets it key the scheduler's `BTreeMap`.
//! Construction rejects nothing; the clock is what refuses to move backward.

use std::cmp::Ordering;
use std::fmt;

use crate::{SimError, SimResult};

pub const SECS_PER_MINUTE: f64 = 60.0;
pub const SECS_PER_HOUR:   f64 = 3_600.0;
pub const SECS_PER_DAY:    f64 = 86_400.0;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated instant, in seconds since the run started.
#[derive(Copy, Clone, Debug, Default)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn hours(self) -> f64 {
        self.0 / SECS_PER_HOUR
    }

    /// Seconds elapsed from `earlier` to `self`, never negative.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}s", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The run's single clock.  Owned by the scheduler; everyone else reads it.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `t`.
    ///
    /// Fails with [`SimError::TimeRegression`] if `t` is earlier than the
    /// current time.  Advancing to the current time is a no-op.
    pub fn advance_to(&mut self, t: SimTime) -> SimResult<()> {
        if t < self.now {
            return Err(SimError::TimeRegression { now: self.now, requested: t });
        }
        self.now = t;
        Ok(())
    }

    /// Break elapsed time into (day, hour, minute) components from sim start.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_secs = self.now.0.max(0.0) as u64;
        let days = total_secs / 86_400;
        let hours = ((total_secs % 86_400) / 3_600) as u32;
        let minutes = ((total_secs % 3_600) / 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "{} (day {} {:02}:{:02})", self.now, d, h, m)
    }
}
