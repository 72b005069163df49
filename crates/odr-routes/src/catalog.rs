//! Candidate routes, trips, and the k-shortest catalog builder.
//!
//! # Naming
//!
//! A route is named after its first and last edge, `<first>_to_<last>`.
//! The n-th distinct route between the same two edges gets the suffix
//! `_n`.  Routes are deduplicated by edge sequence, so registering the same
//! path twice returns the existing id.

use rustc_hash::FxHashMap;

use odr_core::{DetectorId, EdgeId, Logger, RouteId, SimRng, TripId};
use odr_detector::{DetectorRegistry, DetectorType};
use odr_network::{RoadNetwork, Route, YenRouter};

use crate::{DistrictRegistry, RouteError, RouteResult};

// ── RouteDesc / Trip ──────────────────────────────────────────────────────────

/// An immutable candidate route.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteDesc {
    pub name: String,
    pub edges: Vec<EdgeId>,
    pub distance_m: f64,
    /// Free-flow travel time in seconds.
    pub duration_s: f64,
    /// Selection probability metadata.
    pub overall_prob: f64,
    pub factor: f64,
}

impl RouteDesc {
    pub fn first_edge(&self) -> Option<EdgeId> {
        self.edges.first().copied()
    }

    pub fn last_edge(&self) -> Option<EdgeId> {
        self.edges.last().copied()
    }
}

/// Every candidate route between one origin edge and one destination edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub origin: EdgeId,
    pub destination: EdgeId,
    pub routes: Vec<RouteId>,
}

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct CatalogOptions {
    /// Paths searched per detector pair.
    pub k: usize,
    /// Paths kept per detector pair, drawn uniformly without replacement.
    /// `None` keeps all `k`.
    pub k_selected: Option<usize>,
}

impl CatalogOptions {
    pub fn validate(&self) -> RouteResult<()> {
        if self.k == 0 {
            return Err(RouteError::Config("k-shortest-routes must be at least 1".into()));
        }
        if let Some(sel) = self.k_selected {
            if sel > self.k {
                return Err(RouteError::Config(format!(
                    "k-shortest-selected ({sel}) must not exceed k-shortest-routes ({})",
                    self.k
                )));
            }
        }
        Ok(())
    }

    fn kept(&self) -> usize {
        self.k_selected.unwrap_or(self.k)
    }
}

// ── RouteCatalog ──────────────────────────────────────────────────────────────

/// Arena of candidate routes and the trips and detectors that use them.
#[derive(Default)]
pub struct RouteCatalog {
    routes: Vec<RouteDesc>,
    by_name: FxHashMap<String, RouteId>,
    by_edges: FxHashMap<Vec<EdgeId>, RouteId>,
    /// Distinct routes seen per (first, last) edge, for name suffixes.
    endpoint_count: FxHashMap<(EdgeId, EdgeId), usize>,
    trips: Vec<Trip>,
    trip_index: FxHashMap<(EdgeId, EdgeId), TripId>,
    by_detector: FxHashMap<DetectorId, Vec<RouteId>>,
}

impl RouteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run Yen's search for every source × sink detector pair whose
    /// districts lie in different groups.
    ///
    /// Pairs whose edges belong to no district, and unreachable pairs,
    /// contribute nothing.
    pub fn build(
        network: &RoadNetwork,
        detectors: &DetectorRegistry,
        districts: &DistrictRegistry,
        options: CatalogOptions,
        rng: &mut SimRng,
        logger: &dyn Logger,
    ) -> RouteResult<Self> {
        options.validate()?;
        logger.info(&format!("Compute the k='{}' shortest routes", options.k));

        let router = YenRouter::new(options.k);
        let sources = detectors.of_type(DetectorType::Source);
        let sinks = detectors.of_type(DetectorType::Sink);
        let mut catalog = Self::new();

        for &src in &sources {
            let src_det = detectors.get(src);
            let Some(src_group) = districts.source_group(src_det.edge) else {
                logger.debug(&format!(
                    "Source detector '{}' lies on no district source edge",
                    src_det.name
                ));
                continue;
            };
            for &snk in &sinks {
                let snk_det = detectors.get(snk);
                let Some(snk_group) = districts.sink_group(snk_det.edge) else {
                    continue;
                };
                if src_group == snk_group {
                    continue;
                }

                let mut paths = router.between_edges(network, src_det.edge, snk_det.edge);
                logger.debug(&format!(
                    "{} shortest paths from [{}] to [{}]",
                    paths.len(),
                    network.edge_name(src_det.edge),
                    network.edge_name(snk_det.edge)
                ));
                while paths.len() > options.kept() {
                    let i = rng.index(paths.len());
                    paths.remove(i);
                }
                for path in &paths {
                    let id = catalog.add_route(network, path);
                    catalog.register(src, id);
                    logger.debug(&format!("\tAdd route [{}]", catalog.route(id).name));
                }
            }
        }

        logger.info(&format!(
            "Built {} candidate routes over {} trips",
            catalog.len(),
            catalog.trips.len()
        ));
        Ok(catalog)
    }

    /// Insert `path` (or find its twin) and return its id.
    ///
    /// An empty path is stored under the name `empty`.
    pub fn add_route(&mut self, network: &RoadNetwork, path: &Route) -> RouteId {
        if let Some(&id) = self.by_edges.get(&path.edges) {
            return id;
        }

        let name = match (path.edges.first(), path.edges.last()) {
            (Some(&first), Some(&last)) => {
                let base = format!("{}_to_{}", network.edge_name(first), network.edge_name(last));
                let seen = self.endpoint_count.entry((first, last)).or_insert(0);
                let name = if *seen == 0 { base } else { format!("{base}_{seen}") };
                *seen += 1;
                name
            }
            _ => "empty".to_owned(),
        };

        let id = RouteId::from_index(self.routes.len());
        self.routes.push(RouteDesc {
            name: name.clone(),
            edges: path.edges.clone(),
            distance_m: path.distance_m(network),
            duration_s: path.total_travel_secs,
            overall_prob: 0.0,
            factor: 1.0,
        });
        self.by_name.insert(name, id);
        self.by_edges.insert(path.edges.clone(), id);
        id
    }

    /// List `route` under `detector` and under the trip between its first
    /// and last edge.
    pub fn register(&mut self, detector: DetectorId, route: RouteId) {
        let list = self.by_detector.entry(detector).or_default();
        if !list.contains(&route) {
            list.push(route);
        }

        let desc = &self.routes[route.index()];
        let (Some(origin), Some(destination)) = (desc.first_edge(), desc.last_edge()) else {
            return;
        };
        let trips = &mut self.trips;
        let trip = *self.trip_index.entry((origin, destination)).or_insert_with(|| {
            trips.push(Trip { origin, destination, routes: Vec::new() });
            TripId::from_index(trips.len() - 1)
        });
        let routes = &mut self.trips[trip.index()].routes;
        if !routes.contains(&route) {
            routes.push(route);
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    #[inline]
    pub fn route(&self, id: RouteId) -> &RouteDesc {
        &self.routes[id.index()]
    }

    /// Like [`route`](Self::route) but `None` for an id from elsewhere.
    pub fn get(&self, id: RouteId) -> Option<&RouteDesc> {
        self.routes.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<RouteId> {
        self.by_name.get(name).copied()
    }

    pub fn routes(&self) -> impl Iterator<Item = (RouteId, &RouteDesc)> + '_ {
        self.routes
            .iter()
            .enumerate()
            .map(|(i, r)| (RouteId::from_index(i), r))
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// The trip from `origin` to `destination`, if any route connects them.
    pub fn trip(&self, origin: EdgeId, destination: EdgeId) -> Option<&Trip> {
        self.trip_index
            .get(&(origin, destination))
            .map(|t| &self.trips[t.index()])
    }

    /// Routes built from `detector`; empty for a detector without routes.
    pub fn routes_of_detector(&self, detector: DetectorId) -> &[RouteId] {
        self.by_detector.get(&detector).map(Vec::as_slice).unwrap_or(&[])
    }
}
