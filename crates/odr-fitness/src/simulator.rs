//! The seam between the dynamic scorer and whatever executes a route plan.

use thiserror::Error;

use odr_core::{RouteId, Seconds};
use odr_detector::DetectorFlowStore;

/// One vehicle of a dynamic genome: a catalog route and its depart time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Departure {
    pub route: RouteId,
    pub depart: Seconds,
}

/// Any reason a simulation produced no usable flows.
#[derive(Debug, Error)]
#[error("simulation failed: {reason}")]
pub struct SimulationFailed {
    pub reason: String,
}

impl SimulationFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Runs a set of departures and measures the resulting detector flows.
///
/// The returned store must use the goal flows' time grid.  Calls may come
/// from several threads at once, one per deme.
pub trait FlowSimulator: Send + Sync {
    fn simulate(&self, departures: &[Departure]) -> Result<DetectorFlowStore, SimulationFailed>;
}
