//! District and OD matrix loaders.
//!
//! # District CSV
//!
//! ```csv
//! district,group,edge,role
//! north,,e_n_in,source
//! north,,e_n_out,sink
//! south,ring,e_s_in,source
//! ```
//!
//! An empty `group` puts the district in a group of its own.
//!
//! # OD matrix (V-format)
//!
//! ```text
//! $VMR
//! * vehicle type
//! car
//! * from-time to-time
//! 7.00 8.00
//! * factor
//! 1.0
//! * number of districts
//! 2
//! north south
//! 0 10
//! 10 0
//! ```
//!
//! Lines starting with `*` are comments.  The header is one of `$V-`,
//! `$VR-`, `$VMR`, `$VM-`; an `M` in third position switches on the vehicle
//! type.  At most 99 districts are allowed.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use odr_core::parse_hhmm;
use odr_network::RoadNetwork;

use crate::{DistrictRegistry, EdgeRole, OdMatrix, RouteError, RouteResult};

// ── District CSV ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DistrictRecord {
    district: String,
    #[serde(default)]
    group:    Option<String>,
    edge:     String,
    role:     String,
}

/// Load districts from a CSV file.
pub fn load_districts_csv(path: &Path, network: &RoadNetwork) -> RouteResult<DistrictRegistry> {
    let file = std::fs::File::open(path)?;
    load_districts_reader(file, network)
}

/// Like [`load_districts_csv`] but accepts any `Read` source.
pub fn load_districts_reader<R: Read>(reader: R, network: &RoadNetwork) -> RouteResult<DistrictRegistry> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut registry = DistrictRegistry::new();

    for result in csv_reader.deserialize::<DistrictRecord>() {
        let row = result.map_err(|e| RouteError::Parse(e.to_string()))?;
        let group = row.group.as_deref().filter(|g| !g.is_empty());
        let district = registry.add_district(&row.district, group)?;
        let edge = network
            .edge_by_name(&row.edge)
            .ok_or_else(|| RouteError::UnknownEdge(row.edge.clone()))?;
        let role: EdgeRole = row.role.parse()?;
        registry.add_edge(district, edge, role, &row.edge)?;
    }

    Ok(registry)
}

// ── OD matrix ─────────────────────────────────────────────────────────────────

const MAX_DISTRICTS: usize = 99;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Expect {
    Header,
    VehicleType,
    Window,
    Factor,
    Count,
    Names,
    Rows,
}

/// Load a V-format OD matrix file.
pub fn load_od_matrix(path: &Path) -> RouteResult<OdMatrix> {
    let file = std::fs::File::open(path)?;
    parse_od_matrix(BufReader::new(file))
}

/// Parse a V-format OD matrix from any buffered reader.
pub fn parse_od_matrix<R: BufRead>(reader: R) -> RouteResult<OdMatrix> {
    let mut expect = Expect::Header;
    let mut use_vehicle_type = false;
    let mut vehicle_type = String::new();
    let mut window = (0, 0);
    let mut factor = 1.0;
    let mut count = 0usize;
    let mut names: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line_no = n + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('*') {
            continue;
        }
        let bad = |reason: &str| RouteError::OdFormat { line: line_no, reason: format!("{reason} [{line}]") };

        match expect {
            Expect::Header => {
                if !matches!(line, "$V-" | "$VR-" | "$VMR" | "$VM-") {
                    return Err(bad("header doesn't match a valid value"));
                }
                use_vehicle_type = line.as_bytes().get(2) == Some(&b'M');
                expect = Expect::VehicleType;
            }
            Expect::VehicleType => {
                let valid = line
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == ',' || c == '-' || c.is_whitespace());
                if !valid {
                    return Err(bad("vehicle type doesn't match a valid value"));
                }
                vehicle_type = line.to_owned();
                expect = Expect::Window;
            }
            Expect::Window => {
                let mut parts = line.split_whitespace();
                let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
                    return Err(bad("from and to times don't match a valid value"));
                };
                let from = parse_hhmm(from).map_err(|_| bad("from time is not HH.MM"))?;
                let to = parse_hhmm(to).map_err(|_| bad("to time is not HH.MM"))?;
                window = (from, to);
                expect = Expect::Factor;
            }
            Expect::Factor => {
                factor = line
                    .parse::<f64>()
                    .ok()
                    .filter(|f| *f >= 0.0 && f.is_finite())
                    .ok_or_else(|| bad("factor doesn't match a valid value"))?;
                expect = Expect::Count;
            }
            Expect::Count => {
                count = line
                    .parse::<usize>()
                    .ok()
                    .filter(|c| line.len() <= 2 && *c <= MAX_DISTRICTS)
                    .ok_or_else(|| bad("number of districts is invalid; maximum number of districts is 99"))?;
                expect = Expect::Names;
            }
            Expect::Names => {
                names = line.split_whitespace().map(str::to_owned).collect();
                if names.len() != count {
                    return Err(RouteError::Dimension {
                        what: "number of district names",
                        declared: count,
                        found: names.len(),
                    });
                }
                expect = Expect::Rows;
            }
            Expect::Rows => {
                let row = line
                    .split_whitespace()
                    .map(|v| v.parse::<u32>().map(f64::from))
                    .collect::<Result<Vec<f64>, _>>()
                    .map_err(|_| bad("matrix row doesn't match a valid value"))?;
                rows.push(row);
            }
        }
    }

    if expect != Expect::Rows {
        return Err(RouteError::OdFormat {
            line: 0,
            reason: format!("file ended while expecting {expect:?}"),
        });
    }

    Ok(OdMatrix::new(names, rows, factor)?
        .with_vehicle_type(&vehicle_type, use_vehicle_type)
        .with_window(window.0, window.1))
}
