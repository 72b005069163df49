//! `odr-bridge`: the external micro-simulator behind the dynamic scorer.
//!
//! # One evaluation
//!
//! ```text
//! EvalWorkspace::create     <workspace-dir>/eval-<id>-<random>/
//! write_loop_file           loops.xml         (measurement file points back here)
//! write_emitter_file        emitters.xml      one vehicle per gene
//! run_with_timeout          sim --net-file … --additional-files loops,routes,emitters …
//! parse_measurements        measurements.xml → DetectorFlowStore
//! drop(EvalWorkspace)       directory removed
//! ```
//!
//! Every evaluation gets its own directory, so demes may evaluate genomes
//! concurrently through one [`SimulationBridge`].
//!
//! # Crate layout
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`config`]    | `BridgeConfig`                                        |
//! | [`workspace`] | `EvalWorkspace` (per-evaluation directory arena)      |
//! | [`artifacts`] | `LoopMap`, `DepartProfile`, loop and emitter writers  |
//! | [`process`]   | `run_with_timeout`                                    |
//! | [`measure`]   | `parse_measurements`                                  |
//! | [`bridge`]    | `SimulationBridge` (`FlowSimulator` implementation)   |
//! | [`error`]     | `BridgeError`, `BridgeResult<T>`                      |

pub mod artifacts;
pub mod bridge;
pub mod config;
pub mod error;
pub mod measure;
pub mod process;
pub mod workspace;


pub use artifacts::{write_emitter_file, write_loop_file, DepartProfile, LoopDef, LoopMap};
pub use bridge::SimulationBridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use measure::parse_measurements;
pub use process::run_with_timeout;
pub use workspace::EvalWorkspace;
