//! `odr-fitness`: genome shapes and objectives for both phases.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`scenario`]  | `Scenario`: the read-only inputs shared by every evaluation |
//! | [`allele`]    | `AlleleBuilder`: static route sets, dynamic depart windows |
//! | [`scorer`]    | `StaticScorer`, `DynamicScorer`, `rmse_score`              |
//! | [`simulator`] | `FlowSimulator` seam, `Departure`, `SimulationFailed`      |
//! | [`error`]     | `FitnessError`, `FitnessResult<T>`                         |
//!
//! Both scorers map a root-mean-squared error onto `100 / (1 + rmse)`, so
//! a perfect match scores exactly 100 and every score lies in `(0, 100]`
//! unless the evaluation is degenerate, in which case it is 0.

pub mod allele;
pub mod error;
pub mod scenario;
pub mod scorer;
pub mod simulator;


pub use allele::{AlleleBuilder, StaticLayout, UnroutedCell};
pub use error::{FitnessError, FitnessResult};
pub use scenario::Scenario;
pub use scorer::{rmse_score, DynamicScorer, StaticScorer};
pub use simulator::{Departure, FlowSimulator, SimulationFailed};
