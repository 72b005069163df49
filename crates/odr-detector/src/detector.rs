//! Detectors and the detector arena.
//!
//! A detector sits on one lane at a position along it.  Its owning edge is
//! derived from the lane id (`<edge>_<laneIndex>`), so every detector is
//! resolved against the [`RoadNetwork`] when it is registered.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use odr_core::{DetectorId, EdgeId};
use odr_network::RoadNetwork;

use crate::{DetectorError, DetectorResult};

// ── DetectorType ──────────────────────────────────────────────────────────────

/// Role of a detector in the network topology.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DetectorType {
    /// Traffic enters the observed network here.
    Source,
    /// Traffic leaves the observed network here.
    Sink,
    Between,
    /// A source that sees another source downstream.
    Discarded,
    #[default]
    Undefined,
}

impl fmt::Display for DetectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DetectorType::Source => "source",
            DetectorType::Sink => "sink",
            DetectorType::Between => "between",
            DetectorType::Discarded => "discarded",
            DetectorType::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

impl FromStr for DetectorType {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(DetectorType::Source),
            "sink" => Ok(DetectorType::Sink),
            "between" => Ok(DetectorType::Between),
            "discarded" => Ok(DetectorType::Discarded),
            "" | "undefined" => Ok(DetectorType::Undefined),
            _ => Err(DetectorError::UnknownType(s.to_owned())),
        }
    }
}

// ── Detector ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Detector {
    pub name: String,
    pub lane_id: String,
    pub edge: EdgeId,
    /// Position from the start of the edge in metres.
    pub pos_m: f64,
    pub kind: DetectorType,
}

/// Owning edge name of a lane id: everything before the last `_`.
pub fn lane_edge_name(lane_id: &str) -> &str {
    match lane_id.rfind('_') {
        Some(i) => &lane_id[..i],
        None => lane_id,
    }
}

// ── DetectorRegistry ──────────────────────────────────────────────────────────

/// Arena of detectors indexed by [`DetectorId`].
///
/// Ids are assigned in registration order, and every "first detector"
/// lookup follows that order.
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Vec<Detector>,
    by_name: FxHashMap<String, DetectorId>,
    by_edge: FxHashMap<EdgeId, Vec<DetectorId>>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a detector on `lane_id` at `pos_m`.
    ///
    /// A negative position is measured back from the end of the edge.
    pub fn add(
        &mut self,
        network: &RoadNetwork,
        name: &str,
        lane_id: &str,
        pos_m: f64,
        kind: DetectorType,
    ) -> DetectorResult<DetectorId> {
        if self.by_name.contains_key(name) {
            return Err(DetectorError::Duplicate(name.to_owned()));
        }
        let edge_name = lane_edge_name(lane_id);
        let edge = network
            .edge_by_name(edge_name)
            .ok_or_else(|| DetectorError::UnknownEdge {
                detector: name.to_owned(),
                edge: edge_name.to_owned(),
            })?;
        let pos_m = if pos_m >= 0.0 {
            pos_m
        } else {
            network.edge_length_m[edge.index()] + pos_m
        };

        let id = DetectorId::from_index(self.detectors.len());
        self.detectors.push(Detector {
            name: name.to_owned(),
            lane_id: lane_id.to_owned(),
            edge,
            pos_m,
            kind,
        });
        self.by_name.insert(name.to_owned(), id);
        self.by_edge.entry(edge).or_default().push(id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    #[inline]
    pub fn get(&self, id: DetectorId) -> &Detector {
        &self.detectors[id.index()]
    }

    pub fn set_kind(&mut self, id: DetectorId, kind: DetectorType) {
        self.detectors[id.index()].kind = kind;
    }

    pub fn by_name(&self, name: &str) -> Option<DetectorId> {
        self.by_name.get(name).copied()
    }

    /// Detectors on `edge` in registration order.
    pub fn on_edge(&self, edge: EdgeId) -> &[DetectorId] {
        self.by_edge.get(&edge).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first registered detector on `edge`.
    pub fn any_detector_for_edge(&self, edge: EdgeId) -> Option<DetectorId> {
        self.on_edge(edge).first().copied()
    }

    pub fn of_type(&self, kind: DetectorType) -> Vec<DetectorId> {
        self.iter()
            .filter(|(_, d)| d.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// `true` once every detector has a type other than `Undefined`.
    pub fn has_complete_types(&self) -> bool {
        self.detectors.iter().all(|d| d.kind != DetectorType::Undefined)
    }

    pub fn ids(&self) -> impl Iterator<Item = DetectorId> + '_ {
        (0..self.detectors.len()).map(DetectorId::from_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DetectorId, &Detector)> + '_ {
        self.detectors
            .iter()
            .enumerate()
            .map(|(i, d)| (DetectorId::from_index(i), d))
    }
}
