//! Detector typing from network topology.
//!
//! # Rules
//!
//! For each detector `d` on edge `e`:
//!
//! - **source** if no other detector lies before `d` on `e` and the search
//!   upstream from `e` reaches network entries without crossing another
//!   detected edge.  Strict mode requires every approach to qualify;
//!   lenient mode is satisfied by one.
//! - **sink** by the symmetric downstream rule, which must hold on every
//!   approach.  A detector passing both tests ends up a sink.
//! - **between** otherwise.
//!
//! A second pass re-types a source as **discarded** when another source is
//! reachable downstream before any sink or between detector.
//!
//! Each search gives up after visiting [`SEEN_EDGE_LIMIT`] edges, logs a
//! warning, and answers "no".

use rustc_hash::FxHashSet;

use odr_core::{DetectorId, EdgeId, Logger};
use odr_network::RoadNetwork;

use crate::{DetectorRegistry, DetectorType};

/// Visited-edge budget of a single typing search.
pub const SEEN_EDGE_LIMIT: usize = 1000;

#[derive(Copy, Clone, Debug, Default)]
pub struct TypeOptions {
    pub strict_sources: bool,
    pub keep_turnarounds: bool,
}

/// Number of detectors per type after [`compute_types`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub sources: usize,
    pub sinks: usize,
    pub between: usize,
    pub discarded: usize,
}

/// Assign a type to every detector in `registry`.
///
/// Types already present are overwritten.
pub fn compute_types(
    registry: &mut DetectorRegistry,
    network: &RoadNetwork,
    options: TypeOptions,
    logger: &dyn Logger,
) -> TypeCounts {
    logger.info("Computing detector types");

    let mut topo = Topology::new(network, registry, options.keep_turnarounds, logger);

    let ids: Vec<DetectorId> = registry.ids().collect();
    for &det in &ids {
        let mut kind = DetectorType::Undefined;
        if topo.is_source(det, registry.get(det).edge, &mut FxHashSet::default(), options.strict_sources) {
            kind = DetectorType::Source;
        }
        if topo.is_destination(det, registry.get(det).edge, &mut FxHashSet::default()) {
            kind = DetectorType::Sink;
        }
        if kind == DetectorType::Undefined {
            kind = DetectorType::Between;
        }
        topo.kinds[det.index()] = kind;
    }

    for &det in &ids {
        if topo.kinds[det.index()] == DetectorType::Source
            && topo.is_false_source(det, registry.get(det).edge, &mut FxHashSet::default())
        {
            topo.kinds[det.index()] = DetectorType::Discarded;
        }
    }

    let kinds = topo.kinds;
    let mut counts = TypeCounts::default();
    for (det, kind) in ids.into_iter().zip(kinds) {
        match kind {
            DetectorType::Source => counts.sources += 1,
            DetectorType::Sink => counts.sinks += 1,
            DetectorType::Between => counts.between += 1,
            DetectorType::Discarded => counts.discarded += 1,
            DetectorType::Undefined => {}
        }
        registry.set_kind(det, kind);
    }

    logger.info(&format!(
        "Computed detector types: {} source, {} sink, {} between, {} discarded",
        counts.sources, counts.sinks, counts.between, counts.discarded
    ));
    counts
}

// ── Search state ──────────────────────────────────────────────────────────────

struct Topology<'a> {
    registry: &'a DetectorRegistry,
    logger: &'a dyn Logger,
    /// `approaching[e]`: edges that lead onto `e`.
    approaching: Vec<Vec<EdgeId>>,
    /// `approached[e]`: edges reachable directly from `e`.
    approached: Vec<Vec<EdgeId>>,
    /// Working copy of the types; the discard pass reads its own updates.
    kinds: Vec<DetectorType>,
}

impl<'a> Topology<'a> {
    fn new(
        network: &RoadNetwork,
        registry: &'a DetectorRegistry,
        keep_turnarounds: bool,
        logger: &'a dyn Logger,
    ) -> Self {
        let mut approaching = vec![Vec::new(); network.edge_count()];
        let mut approached = vec![Vec::new(); network.edge_count()];
        for e in network.regular_edges() {
            for next in network.successors(e, keep_turnarounds) {
                approaching[next.index()].push(e);
                approached[e.index()].push(next);
            }
        }
        Self {
            registry,
            logger,
            approaching,
            approached,
            kinds: vec![DetectorType::Undefined; registry.len()],
        }
    }

    fn has_detector(&self, edge: EdgeId) -> bool {
        !self.registry.on_edge(edge).is_empty()
    }

    fn limit_reached(&self, seen: &FxHashSet<EdgeId>, det: DetectorId, what: &str) -> bool {
        if seen.len() >= SEEN_EDGE_LIMIT {
            self.logger.warning(&format!(
                "Quitting checking for being a {what} for detector '{}' due to seen edge limit.",
                self.registry.get(det).name
            ));
            return true;
        }
        false
    }

    fn is_source(&self, det: DetectorId, edge: EdgeId, seen: &mut FxHashSet<EdgeId>, strict: bool) -> bool {
        if self.limit_reached(seen, det, "source") {
            return false;
        }
        let own = self.registry.get(det);
        if edge == own.edge {
            let earlier = self
                .registry
                .on_edge(edge)
                .iter()
                .any(|&o| o != det && self.registry.get(o).pos_m < own.pos_m);
            if earlier {
                return false;
            }
        }
        let appr = &self.approaching[edge.index()];
        if appr.is_empty() {
            return edge == own.edge || !self.has_detector(edge);
        }
        if edge != own.edge && self.has_detector(edge) {
            return false;
        }

        seen.insert(edge);
        let (mut ok, mut failed, mut skipped) = (0usize, 0usize, 0usize);
        for &a in appr {
            if seen.contains(&a) {
                skipped += 1;
            } else if self.is_source(det, a, seen, strict) {
                ok += 1;
            } else {
                failed += 1;
            }
        }
        if strict {
            ok + skipped == appr.len()
        } else {
            failed + skipped != appr.len()
        }
    }

    fn is_destination(&self, det: DetectorId, edge: EdgeId, seen: &mut FxHashSet<EdgeId>) -> bool {
        if self.limit_reached(seen, det, "destination") {
            return false;
        }
        let own = self.registry.get(det);
        if edge == own.edge {
            let later = self
                .registry
                .on_edge(edge)
                .iter()
                .any(|&o| o != det && self.registry.get(o).pos_m > own.pos_m);
            if later {
                return false;
            }
        }
        let next = &self.approached[edge.index()];
        if next.is_empty() {
            return edge == own.edge || !self.has_detector(edge);
        }
        if edge != own.edge && self.has_detector(edge) {
            return false;
        }

        seen.insert(edge);
        for &n in next {
            if !seen.contains(&n) && !self.is_destination(det, n, seen) {
                return false;
            }
        }
        true
    }

    fn is_false_source(&self, det: DetectorId, edge: EdgeId, seen: &mut FxHashSet<EdgeId>) -> bool {
        if self.limit_reached(seen, det, "false source") {
            return false;
        }
        seen.insert(edge);
        if edge != self.registry.get(det).edge {
            for &other in self.registry.on_edge(edge) {
                match self.kinds[other.index()] {
                    DetectorType::Sink | DetectorType::Between => return false,
                    DetectorType::Source => return true,
                    DetectorType::Discarded | DetectorType::Undefined => {}
                }
            }
        }
        for &n in &self.approached[edge.index()] {
            if !seen.contains(&n) && self.is_false_source(det, n, seen) {
                return true;
            }
        }
        false
    }
}
