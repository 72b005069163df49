//! Time model.
//!
//! # Design
//!
//! Times are integer seconds of the simulated day (`Seconds`).  Observed and
//! simulated flows are bucketed on one global grid:
//!
//!   slot(t) = (t - begin) / step        for begin <= t < end
//!
//! The number of slots is `(end - begin) / step` (integer division).  Two flow
//! series are comparable only if they were recorded on the same grid.

use std::fmt;

use crate::{OdrError, OdrResult};

/// Seconds since midnight of the simulated day.
pub type Seconds = i64;

// ── TimeGrid ──────────────────────────────────────────────────────────────────

/// The `[begin, end)` window and slot width shared by every flow series.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    pub begin: Seconds,
    pub end:   Seconds,
    pub step:  Seconds,
}

impl TimeGrid {
    /// Validate and build a grid.  `step` must be positive and `end > begin`.
    pub fn new(begin: Seconds, end: Seconds, step: Seconds) -> OdrResult<Self> {
        if step <= 0 {
            return Err(OdrError::Config(format!("time step must be positive, got {step}")));
        }
        if end <= begin {
            return Err(OdrError::Config(format!(
                "end time {end} must be greater than begin time {begin}"
            )));
        }
        Ok(Self { begin, end, step })
    }

    /// Number of whole slots in the window.
    #[inline]
    pub fn slot_count(&self) -> usize {
        ((self.end - self.begin) / self.step) as usize
    }

    /// Slot holding `t`, or `None` outside the grid.
    #[inline]
    pub fn slot_of(&self, t: Seconds) -> Option<usize> {
        if t < self.begin || t >= self.end {
            return None;
        }
        let slot = ((t - self.begin) / self.step) as usize;
        (slot < self.slot_count()).then_some(slot)
    }

    /// Like [`slot_of`](Self::slot_of) but reports the miss as an error.
    pub fn require_slot(&self, t: Seconds) -> OdrResult<usize> {
        self.slot_of(t).ok_or(OdrError::OutOfGrid {
            time:  t,
            begin: self.begin,
            end:   self.end,
        })
    }

    /// Start time of slot `i`.
    #[inline]
    pub fn slot_start(&self, i: usize) -> Seconds {
        self.begin + i as Seconds * self.step
    }
}

impl fmt::Display for TimeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) step {}", self.begin, self.end, self.step)
    }
}

// ── Clock strings ─────────────────────────────────────────────────────────────

/// Parse an `HH.MM` clock time into seconds since midnight.
///
/// Hours must lie in `0..=23` and minutes in `0..=59`.
pub fn parse_hhmm(s: &str) -> OdrResult<Seconds> {
    let bad = || OdrError::Parse(format!("'{s}' is not an HH.MM time"));
    let (h, m) = s.trim().split_once('.').ok_or_else(bad)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(bad());
    }
    let hours: i64 = h.parse().map_err(|_| bad())?;
    let minutes: i64 = m.parse().map_err(|_| bad())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(bad());
    }
    Ok(hours * 3_600 + minutes * 60)
}
