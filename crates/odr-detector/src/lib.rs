//! `odr-detector`: induction-loop detectors and their observed flows.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`detector`] | `Detector`, `DetectorType`, `DetectorRegistry` (arena)     |
//! | [`topology`] | `compute_types`: source / sink / between / discarded       |
//! | [`flow`]     | `FlowRecord`, `DetectorFlowStore`                          |
//! | [`loader`]   | detector CSV and `;`-separated flow measurement loaders    |
//! | [`error`]    | `DetectorError`, `DetectorResult<T>`                       |

pub mod detector;
pub mod error;
pub mod flow;
pub mod loader;
pub mod topology;


pub use detector::{Detector, DetectorRegistry, DetectorType};
pub use error::{DetectorError, DetectorResult};
pub use flow::{DetectorFlowStore, FlowRecord};
pub use loader::{
    load_detectors_csv, load_detectors_reader, load_flows_csv, load_flows_reader, FlowFileOptions,
};
pub use topology::{compute_types, TypeCounts, TypeOptions};
