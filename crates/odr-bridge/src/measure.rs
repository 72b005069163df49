//! Induction-loop measurement reader.
//!
//! ```text
//! <detector>
//!   <interval begin="0.00" end="60.00" id="loop_e_0" nVehContrib="3" speed="13.20" …/>
//! </detector>
//! ```
//!
//! `begin` is read as a float and truncated; a missing `nVehContrib` counts
//! 0 vehicles and a missing `speed` reads as -1.  Every interval becomes a
//! car-only [`FlowRecord`] on the detector its loop measures.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use odr_core::{Logger, Seconds, TimeGrid};
use odr_detector::{DetectorFlowStore, FlowRecord};

use crate::{BridgeError, BridgeResult, LoopMap};

struct Interval {
    id: String,
    begin: Seconds,
    vehicles: f64,
    speed: f64,
}

/// Read `path` into a store on `grid`.
///
/// Intervals of unknown loops and intervals outside the grid are skipped.
pub fn parse_measurements(
    path: &Path,
    loops: &LoopMap,
    grid: TimeGrid,
    logger: &dyn Logger,
) -> BridgeResult<DetectorFlowStore> {
    let bad = |reason: String| BridgeError::Measurement { path: path.to_owned(), reason };
    let mut reader = Reader::from_file(path).map_err(|e| bad(e.to_string()))?;
    let mut store = DetectorFlowStore::new(grid);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(|e| bad(e.to_string()))? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"interval" => {
                let iv = read_interval(&e).map_err(bad)?;
                if iv.begin > grid.end {
                    continue;
                }
                let Some(det) = loops.detector(&iv.id) else {
                    logger.debug(&format!("Can't find detector for induction loop [{}]", iv.id));
                    continue;
                };
                if grid.slot_of(iv.begin).is_none() {
                    continue;
                }
                store.add(det, iv.begin, FlowRecord::cars(iv.vehicles, iv.speed))?;
            }
            _ => {}
        }
    }
    Ok(store)
}

fn read_interval(e: &BytesStart<'_>) -> Result<Interval, String> {
    let mut iv = Interval { id: String::new(), begin: 0, vehicles: 0.0, speed: -1.0 };
    let mut has_begin = false;
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        let number = || {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{value}' is not a number"))
        };
        match attr.key.as_ref() {
            b"id" => iv.id = value.to_string(),
            b"begin" => {
                iv.begin = number()?.trunc() as Seconds;
                has_begin = true;
            }
            b"nVehContrib" => iv.vehicles = number()?.max(0.0),
            b"speed" => iv.speed = number()?,
            _ => {}
        }
    }
    if !has_begin {
        return Err(format!("interval '{}' has no begin", iv.id));
    }
    Ok(iv)
}
