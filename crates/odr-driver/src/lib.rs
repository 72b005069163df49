//! `odr-driver`: the two-phase disaggregation run.
//!
//! ```text
//! Idle
//!  └ build_static     RouteCatalog (Yen, k paths per detector pair) + static genome shape
//! StaticBuilt
//!  └ evolve_static    GA over route choices, scored by edge-count RMSE
//! StaticEvolved
//!  └ trigger_check    static score ≥ dynamic-trigger × 100 ?  no → Done
//! TriggerCheck
//!  └ build_dynamic    depart-time windows from the origin detectors' flows
//! DynamicBuilt
//!  └ evolve_dynamic   GA over depart times, scored by simulated flows
//! DynamicEvolved → Done
//! ```
//!
//! Every input is checked, and the configuration validated, in
//! [`DisaggregationDriver::new`], so a run never fails for a missing input
//! after GA work has started.  Simulator failures during the dynamic phase
//! only score the affected genome 0.

pub mod config;
pub mod driver;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::DisaggregationConfig;
pub use driver::{
    BridgeFactory, DisaggregationDriver, DriverState, Inputs, SimulatorFactory, Solutions,
};
pub use error::{DriverError, DriverResult};
