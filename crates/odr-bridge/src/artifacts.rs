//! Simulator input files.
//!
//! Both files are `<additional>` documents:
//!
//! ```text
//! <inductionLoop id="loop_e_0" lane="e_0" pos="10" freq="10" file="measurements.xml"/>
//! <vehicle id="emitter_0000" depart="120" departLane="0" departPos="10" departSpeed="13.89" route="a_to_b"/>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use rustc_hash::FxHashMap;

use odr_core::{DetectorId, Logger, RouteId, Seconds, TimeGrid};
use odr_detector::DetectorRegistry;
use odr_fitness::{Departure, FitnessResult, Scenario};
use odr_routes::RouteCatalog;

use crate::BridgeResult;

/// Observed speeds above this (km/h) are treated as missing.
const MAX_PLAUSIBLE_KMH: f64 = 250.0;

// ── Induction loops ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct LoopDef {
    pub id: String,
    pub detector: DetectorId,
    pub lane: String,
    pub pos_m: f64,
}

/// One induction loop per detector and the loop→detector lookup used when
/// reading measurements back.
///
/// A loop is named `loop_<lane>`; further detectors on the same lane get
/// `loop_<lane>_<n>` so ids stay unique.
#[derive(Clone, Debug, Default)]
pub struct LoopMap {
    loops: Vec<LoopDef>,
    by_id: FxHashMap<String, DetectorId>,
}

impl LoopMap {
    pub fn new(detectors: &DetectorRegistry, logger: &dyn Logger) -> Self {
        let mut map = Self::default();
        let mut per_lane: FxHashMap<&str, usize> = FxHashMap::default();
        for (id, det) in detectors.iter() {
            let seen = per_lane.entry(det.lane_id.as_str()).or_insert(0);
            let loop_id = match *seen {
                0 => format!("loop_{}", det.lane_id),
                n => format!("loop_{}_{n}", det.lane_id),
            };
            *seen += 1;
            logger.debug(&format!("Induction loop [{loop_id}] measures detector [{}]", det.name));
            map.by_id.insert(loop_id.clone(), id);
            map.loops.push(LoopDef {
                id: loop_id,
                detector: id,
                lane: det.lane_id.clone(),
                pos_m: det.pos_m,
            });
        }
        map
    }

    pub fn detector(&self, loop_id: &str) -> Option<DetectorId> {
        self.by_id.get(loop_id).copied()
    }

    pub fn loops(&self) -> &[LoopDef] {
        &self.loops
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

// ── Depart profiles ───────────────────────────────────────────────────────────

/// Where and how fast a vehicle on a route enters the network.
#[derive(Clone, Debug, PartialEq)]
pub struct DepartProfile {
    /// Position of the origin detector on the first edge.
    pub pos_m: f64,
    /// Free-flow speed of the first edge.
    pub free_mps: f64,
    /// Per goal slot, the faster vehicle class observed at the origin
    /// detector, or free flow where that reading is missing or implausible.
    pub slot_speeds_mps: Vec<f64>,
    grid: TimeGrid,
}

impl DepartProfile {
    pub fn for_route(scenario: &Scenario<'_>, route: RouteId) -> FitnessResult<Self> {
        let (edge, det) = scenario.origin_detector(route)?;
        let free_mps = scenario.network.edge_speed_mps[edge.index()];
        let slot_speeds_mps = scenario
            .goal
            .flows(det)
            .iter()
            .map(|r| {
                let kmh = r.v_pkw.max(r.v_lkw);
                if kmh <= 0.0 || kmh > MAX_PLAUSIBLE_KMH { free_mps } else { kmh / 3.6 }
            })
            .collect();

        Ok(Self {
            pos_m: scenario.detectors.get(det).pos_m,
            free_mps,
            slot_speeds_mps,
            grid: scenario.goal.grid(),
        })
    }

    /// Speed observed in the slot holding `depart`; free flow outside the
    /// grid or when the origin detector has no flows.
    pub fn speed_at(&self, depart: Seconds) -> f64 {
        self.grid
            .slot_of(depart)
            .and_then(|slot| self.slot_speeds_mps.get(slot))
            .copied()
            .unwrap_or(self.free_mps)
    }
}

// ── Writers ───────────────────────────────────────────────────────────────────

type XmlWriter = Writer<BufWriter<File>>;

fn open_additional(path: &Path) -> BridgeResult<XmlWriter> {
    let mut w = Writer::new_with_indent(BufWriter::new(File::create(path)?), b'\t', 1);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut root = BytesStart::new("additional");
    root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    root.push_attribute((
        "xsi:noNamespaceSchemaLocation",
        "http://sumo.dlr.de/xsd/additional_file.xsd",
    ));
    w.write_event(Event::Start(root))?;
    Ok(w)
}

fn close_additional(mut w: XmlWriter) -> BridgeResult<()> {
    w.write_event(Event::End(BytesEnd::new("additional")))?;
    let mut inner = w.into_inner();
    inner.write_all(b"\n")?;
    inner.flush()?;
    Ok(())
}

/// `measurements` as seen from the directory of `loop_file`, which is where
/// the simulator resolves a relative `file` attribute.
pub(crate) fn measurement_ref(loop_file: &Path, measurements: &Path) -> BridgeResult<PathBuf> {
    let dir = loop_file.parent().unwrap_or(Path::new(""));
    match measurements.strip_prefix(dir) {
        Ok(rel) => Ok(rel.to_path_buf()),
        Err(_) => Ok(std::path::absolute(measurements)?),
    }
}

/// One `<inductionLoop>` per loop, all reporting to `measurements`.
pub fn write_loop_file(
    path: &Path,
    loops: &LoopMap,
    freq: Seconds,
    measurements: &Path,
) -> BridgeResult<()> {
    let file = measurement_ref(path, measurements)?.display().to_string();
    let mut w = open_additional(path)?;
    let freq = freq.to_string();
    for l in loops.loops() {
        let pos = l.pos_m.to_string();
        w.create_element("inductionLoop")
            .with_attribute(("id", l.id.as_str()))
            .with_attribute(("lane", l.lane.as_str()))
            .with_attribute(("pos", pos.as_str()))
            .with_attribute(("freq", freq.as_str()))
            .with_attribute(("file", file.as_str()))
            .write_empty()?;
    }
    close_additional(w)
}

/// One `<vehicle>` per departure, `emitter_0000` onwards.
///
/// `profiles` is indexed by `RouteId`.
pub fn write_emitter_file(
    path: &Path,
    departures: &[Departure],
    catalog: &RouteCatalog,
    profiles: &[DepartProfile],
) -> BridgeResult<()> {
    let mut w = open_additional(path)?;
    for (i, d) in departures.iter().enumerate() {
        let (Some(route), Some(profile)) = (catalog.get(d.route), profiles.get(d.route.index()))
        else {
            continue;
        };
        let id = format!("emitter_{i:04}");
        let depart = d.depart.to_string();
        let pos = profile.pos_m.to_string();
        let speed = format!("{:.2}", profile.speed_at(d.depart));
        w.create_element("vehicle")
            .with_attribute(("id", id.as_str()))
            .with_attribute(("depart", depart.as_str()))
            .with_attribute(("departLane", "0"))
            .with_attribute(("departPos", pos.as_str()))
            .with_attribute(("departSpeed", speed.as_str()))
            .with_attribute(("route", route.name.as_str()))
            .write_empty()?;
    }
    close_additional(w)
}
