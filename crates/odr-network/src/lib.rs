//! `odr-network`: road network and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR, named nodes/edges), `RoadNetworkBuilder`|
//! | [`loader`]  | `load_network_csv`, `load_network_reader`                   |
//! | [`router`]  | `Route`, `YenRouter` (Dijkstra, Yen k-shortest)            |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! Edge cost everywhere is free-flow travel time, `length / speed`, and
//! internal (junction) edges never take part in routing.

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{NetworkError, NetworkResult};
pub use loader::{load_network_csv, load_network_reader};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{Route, YenRouter};
