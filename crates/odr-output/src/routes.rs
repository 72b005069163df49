//! Candidate-route files.
//!
//! The route file is the simulator's route input for the dynamic phase:
//!
//! ```text
//! <routes>
//!     <route id="a_in_to_b_out" edges="a_in ab b_out"/>
//! </routes>
//! ```
//!
//! The CSV summary has one row per route:
//! `route,edges,distance_m,duration_s`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use odr_network::RoadNetwork;
use odr_routes::{RouteCatalog, RouteDesc};

use crate::OutputResult;

fn edge_list(network: &RoadNetwork, route: &RouteDesc) -> String {
    route
        .edges
        .iter()
        .map(|&e| network.edge_name(e))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write every catalog route as a `<route>` element.
pub fn write_route_file(path: &Path, catalog: &RouteCatalog, network: &RoadNetwork) -> OutputResult<()> {
    let mut w = Writer::new_with_indent(BufWriter::new(File::create(path)?), b'\t', 1);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.write_event(Event::Start(BytesStart::new("routes")))?;
    for (_, route) in catalog.routes() {
        let edges = edge_list(network, route);
        w.create_element("route")
            .with_attribute(("id", route.name.as_str()))
            .with_attribute(("edges", edges.as_str()))
            .write_empty()?;
    }
    w.write_event(Event::End(BytesEnd::new("routes")))?;
    let mut inner = w.into_inner();
    inner.write_all(b"\n")?;
    inner.flush()?;
    Ok(())
}

/// Write the CSV route summary.
pub fn write_route_csv(path: &Path, catalog: &RouteCatalog, network: &RoadNetwork) -> OutputResult<()> {
    let mut out = csv::Writer::from_path(path)?;
    out.write_record(["route", "edges", "distance_m", "duration_s"])?;
    for (_, route) in catalog.routes() {
        out.write_record(&[
            route.name.clone(),
            edge_list(network, route),
            format!("{:.2}", route.distance_m),
            format!("{:.2}", route.duration_s),
        ])?;
    }
    out.flush()?;
    Ok(())
}
