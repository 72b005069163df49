//! `odr-core`: foundational types for the `odr` OD-matrix disaggregation
//! workspace.
//!
//! This crate is a dependency of every other `odr-*` crate.  It has no
//! `odr-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `tracing`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `DetectorId`, `DistrictId`, `GroupId`, `RouteId`, `TripId` |
//! | [`time`]        | `TimeGrid` (begin / end / step slots), `parse_hhmm`       |
//! | [`rng`]         | `SimRng` (seeded or entropy-backed)                       |
//! | [`log`]         | `Logger` capability, `TracingLogger`, `NoopLogger`, `MemoryLogger` |
//! | [`error`]       | `OdrError`, `OdrResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `TimeGrid`.      |

pub mod error;
pub mod ids;
pub mod log;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{OdrError, OdrResult};
pub use ids::{DetectorId, DistrictId, EdgeId, GroupId, NodeId, RouteId, TripId};
pub use log::{LogLevel, Logger, MemoryLogger, NoopLogger, TracingLogger};
pub use rng::SimRng;
pub use time::{parse_hhmm, Seconds, TimeGrid};
