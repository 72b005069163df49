//! `odr-routes`: the traffic-demand side of the disaggregation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`district`] | `District`, `DistrictGroup`, `DistrictRegistry`, `EdgeRole`   |
//! | [`od`]       | `OdMatrix`                                                    |
//! | [`catalog`]  | `RouteDesc`, `Trip`, `RouteCatalog` (Yen k-shortest builder)  |
//! | [`loader`]   | district CSV and V-format OD matrix loaders                   |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                                |
//!
//! Routes are generated between source and sink detectors whose districts
//! sit in different district groups.  Every route belongs to exactly one
//! edge-level [`Trip`] and is listed under the source detector it was built
//! from.

pub mod catalog;
pub mod district;
pub mod error;
pub mod loader;
pub mod od;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogOptions, RouteCatalog, RouteDesc, Trip};
pub use district::{District, DistrictGroup, DistrictRegistry, EdgeRole};
pub use error::{RouteError, RouteResult};
pub use loader::{load_districts_csv, load_districts_reader, load_od_matrix, parse_od_matrix};
pub use od::OdMatrix;
