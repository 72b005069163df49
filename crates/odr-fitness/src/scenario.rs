//! The read-only inputs of a disaggregation run.

use odr_core::{DetectorId, EdgeId, Logger, RouteId};
use odr_detector::{DetectorFlowStore, DetectorRegistry};
use odr_network::RoadNetwork;
use odr_routes::{DistrictRegistry, RouteCatalog};

use crate::{FitnessError, FitnessResult};

/// Borrowed views of everything built once per run.
///
/// `Copy`, so each builder and scorer keeps its own handle.  Nothing here is
/// mutated after construction, which lets deme threads evaluate genomes
/// against the same scenario without locking.
#[derive(Copy, Clone)]
pub struct Scenario<'a> {
    pub network: &'a RoadNetwork,
    pub detectors: &'a DetectorRegistry,
    pub districts: &'a DistrictRegistry,
    pub catalog: &'a RouteCatalog,
    /// Observed flows.
    pub goal: &'a DetectorFlowStore,
    pub logger: &'a dyn Logger,
}

impl<'a> Scenario<'a> {
    /// First edge of `route` and the detector standing on it.
    ///
    /// Every catalog route starts at a source detector's edge, so a miss
    /// means the catalog and the registry disagree.
    pub fn origin_detector(&self, route: RouteId) -> FitnessResult<(EdgeId, DetectorId)> {
        let desc = self.catalog.get(route).ok_or(FitnessError::UnknownRoute(route))?;
        let edge = desc.first_edge().ok_or_else(|| FitnessError::NoOriginDetector {
            route: desc.name.clone(),
            edge: String::new(),
        })?;
        let det = self
            .detectors
            .any_detector_for_edge(edge)
            .ok_or_else(|| FitnessError::NoOriginDetector {
                route: desc.name.clone(),
                edge: self.network.edge_name(edge).to_owned(),
            })?;
        Ok((edge, det))
    }
}
