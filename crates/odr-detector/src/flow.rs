//! Observed and simulated detector flows.
//!
//! # Layout
//!
//! One series per detector, one [`FlowRecord`] per slot of the shared
//! [`TimeGrid`].  A series is created zero-filled on the first insert for its
//! detector, so every known detector has exactly `grid.slot_count()` records
//! and two stores on the same grid compare slot by slot.

use rustc_hash::FxHashMap;

use odr_core::{DetectorId, Seconds, TimeGrid};

use crate::DetectorResult;

// ── FlowRecord ────────────────────────────────────────────────────────────────

/// Counts (vehicles) and mean speeds (km/h) of one detector in one slot.
///
/// `pkw` is passenger cars, `lkw` is trucks.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowRecord {
    pub q_pkw: f64,
    pub v_pkw: f64,
    pub q_lkw: f64,
    pub v_lkw: f64,
}

impl FlowRecord {
    pub fn cars(q_pkw: f64, v_pkw: f64) -> Self {
        Self { q_pkw, v_pkw, ..Self::default() }
    }

    /// Cars plus trucks.
    #[inline]
    pub fn total(&self) -> f64 {
        self.q_pkw + self.q_lkw
    }

    #[inline]
    pub fn has_traffic(&self) -> bool {
        self.q_pkw > 0.0 || self.q_lkw > 0.0
    }

    /// Fold `other` into `self`: counts add, speeds are count-weighted.
    fn accumulate(&mut self, other: &FlowRecord) {
        self.v_pkw = weighted_speed(self.q_pkw, self.v_pkw, other.q_pkw, other.v_pkw);
        self.v_lkw = weighted_speed(self.q_lkw, self.v_lkw, other.q_lkw, other.v_lkw);
        self.q_pkw += other.q_pkw;
        self.q_lkw += other.q_lkw;
    }
}

fn weighted_speed(q_a: f64, v_a: f64, q_b: f64, v_b: f64) -> f64 {
    let q = q_a + q_b;
    if q > 0.0 {
        (q_a * v_a + q_b * v_b) / q
    } else {
        v_b
    }
}

// ── DetectorFlowStore ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Series {
    records: Vec<FlowRecord>,
    /// Slots that received at least one value.
    filled: Vec<bool>,
}

/// Per-detector flow series on one [`TimeGrid`].
#[derive(Clone, Debug)]
pub struct DetectorFlowStore {
    grid: TimeGrid,
    series: FxHashMap<DetectorId, Series>,
}

impl DetectorFlowStore {
    pub fn new(grid: TimeGrid) -> Self {
        Self { grid, series: FxHashMap::default() }
    }

    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    /// Add `record` to the slot holding `time`.
    ///
    /// The first value for a slot replaces the zero fill; later values
    /// accumulate.  Fails with `OutOfGrid` when `time` lies outside the grid.
    pub fn add(&mut self, det: DetectorId, time: Seconds, record: FlowRecord) -> DetectorResult<()> {
        let slot = self.grid.require_slot(time)?;
        let slots = self.grid.slot_count();
        let series = self.series.entry(det).or_insert_with(|| Series {
            records: vec![FlowRecord::default(); slots],
            filled: vec![false; slots],
        });
        if series.filled[slot] {
            series.records[slot].accumulate(&record);
        } else {
            series.records[slot] = record;
            series.filled[slot] = true;
        }
        Ok(())
    }

    /// Replace the whole series of `det`.  `records` is padded with zeros or
    /// truncated to the grid's slot count.
    pub fn set_series(&mut self, det: DetectorId, mut records: Vec<FlowRecord>) {
        let slots = self.grid.slot_count();
        records.resize(slots, FlowRecord::default());
        self.series.insert(det, Series { records, filled: vec![true; slots] });
    }

    pub fn remove(&mut self, det: DetectorId) {
        self.series.remove(&det);
    }

    pub fn knows(&self, det: DetectorId) -> bool {
        self.series.contains_key(&det)
    }

    /// The series of `det`; empty when the detector has no flows.
    pub fn flows(&self, det: DetectorId) -> &[FlowRecord] {
        self.series.get(&det).map(|s| s.records.as_slice()).unwrap_or(&[])
    }

    /// Total cars plus trucks over the grid; 0 for an unknown detector.
    pub fn flow_sum_secure(&self, det: DetectorId) -> f64 {
        self.flows(det).iter().map(FlowRecord::total).sum()
    }

    /// [`flow_sum_secure`](Self::flow_sum_secure) summed over `dets`.
    pub fn sum_over<'d>(&self, dets: impl IntoIterator<Item = &'d DetectorId>) -> f64 {
        dets.into_iter().map(|&d| self.flow_sum_secure(d)).sum()
    }

    /// Detectors with a series, in id order.
    pub fn detectors(&self) -> Vec<DetectorId> {
        let mut ids: Vec<DetectorId> = self.series.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
