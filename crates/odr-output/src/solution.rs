//! Best-genome tables.
//!
//! - static: `gene,route`
//! - dynamic: `gene,route,depart`

use std::path::Path;

use odr_core::{RouteId, Seconds};
use odr_routes::RouteCatalog;

use crate::{OutputError, OutputResult};

fn route_name(catalog: &RouteCatalog, id: RouteId) -> String {
    match catalog.get(id) {
        Some(route) => route.name.clone(),
        None => id.to_string(),
    }
}

/// One row per gene of a static solution.
pub fn write_static_solution(path: &Path, genes: &[RouteId], catalog: &RouteCatalog) -> OutputResult<()> {
    let mut out = csv::Writer::from_path(path)?;
    out.write_record(["gene", "route"])?;
    for (i, &route) in genes.iter().enumerate() {
        out.write_record(&[i.to_string(), route_name(catalog, route)])?;
    }
    out.flush()?;
    Ok(())
}

/// One row per gene of a dynamic solution; `routes[i]` departs at
/// `departs[i]`.
pub fn write_dynamic_solution(
    path: &Path,
    routes: &[RouteId],
    departs: &[Seconds],
    catalog: &RouteCatalog,
) -> OutputResult<()> {
    if routes.len() != departs.len() {
        return Err(OutputError::SolutionShape { genes: routes.len(), departs: departs.len() });
    }
    let mut out = csv::Writer::from_path(path)?;
    out.write_record(["gene", "route", "depart"])?;
    for (i, (&route, &depart)) in routes.iter().zip(departs).enumerate() {
        out.write_record(&[i.to_string(), route_name(catalog, route), depart.to_string()])?;
    }
    out.flush()?;
    Ok(())
}
