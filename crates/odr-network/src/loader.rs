//! CSV network loader.
//!
//! # CSV format
//!
//! One row per directed edge.  Nodes are implied by the `from_node` and
//! `to_node` columns.  `internal` may be omitted or left empty; it defaults to `false`.
//!
//! ```csv
//! edge_id,from_node,to_node,length_m,speed_mps,internal
//! e_ab,A,B,500.0,13.89,false
//! e_ba,B,A,500.0,13.89,false
//! :B_0,B,B,5.0,8.0,true
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{NetworkError, NetworkResult, RoadNetwork, RoadNetworkBuilder};

#[derive(Deserialize)]
struct EdgeRecord {
    edge_id:   String,
    from_node: String,
    to_node:   String,
    length_m:  f64,
    speed_mps: f64,
    #[serde(default)]
    internal:  Option<bool>,
}

/// Load a [`RoadNetwork`] from an edge-list CSV file.
pub fn load_network_csv(path: &Path) -> NetworkResult<RoadNetwork> {
    let file = std::fs::File::open(path)?;
    load_network_reader(file)
}

/// Like [`load_network_csv`] but accepts any `Read` source.
pub fn load_network_reader<R: Read>(reader: R) -> NetworkResult<RoadNetwork> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut builder = RoadNetworkBuilder::new();

    for result in csv_reader.deserialize::<EdgeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        builder.add_edge(
            &row.edge_id,
            &row.from_node,
            &row.to_node,
            row.length_m,
            row.speed_mps,
            row.internal.unwrap_or(false),
        )?;
    }

    Ok(builder.build())
}
