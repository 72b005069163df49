//! Detector definition and flow measurement loaders.
//!
//! # Detector CSV
//!
//! ```csv
//! detector_id,lane_id,pos,type
//! d_in,e_ab_0,10.0,source
//! d_out,e_ab_0,-10.0,
//! ```
//!
//! `type` may be omitted or empty, leaving the detector `Undefined` for
//! [`compute_types`](crate::compute_types).
//!
//! # Flow file
//!
//! `;`-separated with a header row.  Column names are case-insensitive;
//! `Detector`, `Time` and `qPKW` are required, `vPKW`, `qLKW` and `vLKW` are
//! optional and default to 0.
//!
//! ```text
//! Detector;Time;qPKW;vPKW
//! d_in;720;12;88.0
//! ```
//!
//! The slot time of a row is `Time * time_factor - time_offset`, rounded to
//! the nearest second.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use odr_core::{Logger, Seconds};
use odr_network::RoadNetwork;

use crate::{DetectorError, DetectorFlowStore, DetectorRegistry, DetectorResult, DetectorType, FlowRecord};

// ── Detector CSV ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DetectorRecord {
    detector_id: String,
    lane_id:     String,
    pos:         f64,
    #[serde(default, rename = "type")]
    kind:        Option<String>,
}

/// Load detector definitions from a CSV file.
pub fn load_detectors_csv(path: &Path, network: &RoadNetwork) -> DetectorResult<DetectorRegistry> {
    let file = std::fs::File::open(path)?;
    load_detectors_reader(file, network)
}

/// Like [`load_detectors_csv`] but accepts any `Read` source.
pub fn load_detectors_reader<R: Read>(reader: R, network: &RoadNetwork) -> DetectorResult<DetectorRegistry> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut registry = DetectorRegistry::new();

    for result in csv_reader.deserialize::<DetectorRecord>() {
        let row = result.map_err(|e| DetectorError::Parse(e.to_string()))?;
        let kind = match row.kind.as_deref() {
            Some(k) => k.parse::<DetectorType>()?,
            None => DetectorType::Undefined,
        };
        registry.add(network, &row.detector_id, &row.lane_id, row.pos, kind)?;
    }

    Ok(registry)
}

// ── Flow file ─────────────────────────────────────────────────────────────────

/// Time conversion applied to the `Time` column.
#[derive(Copy, Clone, Debug)]
pub struct FlowFileOptions {
    pub time_offset: Seconds,
    pub time_factor: Seconds,
}

impl Default for FlowFileOptions {
    fn default() -> Self {
        Self { time_offset: 0, time_factor: 60 }
    }
}

struct Columns {
    detector: usize,
    time: usize,
    q_pkw: usize,
    v_pkw: Option<usize>,
    q_lkw: Option<usize>,
    v_lkw: Option<usize>,
    width: usize,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> DetectorResult<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| {
                DetectorError::Parse(format!(
                    "missing column '{name}'; 'Detector', 'Time' and 'qPKW' must be named in the first line"
                ))
            })
        };
        Ok(Self {
            detector: required("detector")?,
            time: required("time")?,
            q_pkw: required("qpkw")?,
            v_pkw: find("vpkw"),
            q_lkw: find("qlkw"),
            v_lkw: find("vlkw"),
            width: header.len(),
        })
    }
}

/// Load a flow file into `store`, returning the number of rows stored.
pub fn load_flows_csv(
    path: &Path,
    registry: &DetectorRegistry,
    options: FlowFileOptions,
    store: &mut DetectorFlowStore,
    logger: &dyn Logger,
) -> DetectorResult<usize> {
    logger.info(&format!("Loading flow amounts from file [{}]", path.display()));
    let file = std::fs::File::open(path)?;
    load_flows_reader(file, registry, options, store, logger)
}

/// Like [`load_flows_csv`] but accepts any `Read` source.
///
/// Rows for unknown detectors are skipped.  Rows outside the store's grid
/// are skipped with one warning per call, and negative counts are clamped
/// to zero.
pub fn load_flows_reader<R: Read>(
    reader: R,
    registry: &DetectorRegistry,
    options: FlowFileOptions,
    store: &mut DetectorFlowStore,
    logger: &dyn Logger,
) -> DetectorResult<usize> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let cols = Columns::from_header(csv_reader.headers()?)?;
    let grid = store.grid();

    let mut warned_bounds = false;
    let mut warned_partial = false;
    let mut stored = 0usize;

    for result in csv_reader.records() {
        let row = result?;
        if row.len() <= 1 {
            continue;
        }

        let Some(det) = row.get(cols.detector).and_then(|name| registry.by_name(name)) else {
            continue;
        };

        let raw_time = number(&row, cols.time, "Time")?;
        let parsed = raw_time * options.time_factor as f64 - options.time_offset as f64;
        let time = (parsed + 0.5).floor() as Seconds;
        if grid.slot_of(time).is_none() || parsed < grid.begin as f64 {
            if !warned_bounds {
                warned_bounds = true;
                logger.warning("At least one value lies beyond given time boundaries.");
            }
            continue;
        }

        let optional = |col: Option<usize>, name: &str| match col {
            Some(i) if row.get(i).is_some_and(|v| !v.is_empty()) => number(&row, i, name),
            _ => Ok(0.0),
        };
        let record = FlowRecord {
            q_pkw: number(&row, cols.q_pkw, "qPKW")?.max(0.0),
            v_pkw: optional(cols.v_pkw, "vPKW")?,
            q_lkw: optional(cols.q_lkw, "qLKW")?.max(0.0),
            v_lkw: optional(cols.v_lkw, "vLKW")?,
        };
        store.add(det, time, record)?;
        stored += 1;

        if !warned_partial && row.len() < cols.width {
            warned_partial = true;
            logger.warning("At least one line does not contain the correct number of columns.");
        }
    }

    Ok(stored)
}

fn number(row: &csv::StringRecord, col: usize, name: &str) -> DetectorResult<f64> {
    let raw = row
        .get(col)
        .ok_or_else(|| DetectorError::Parse(format!("line {} has no '{name}' value", line_of(row))))?;
    raw.parse::<f64>().map_err(|_| {
        DetectorError::Parse(format!("line {}: '{raw}' is not a number for '{name}'", line_of(row)))
    })
}

fn line_of(row: &csv::StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}
