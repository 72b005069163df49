//! `odr-ga`: allele-set genetic algorithms for OD disaggregation.
//!
//! # Generation loop
//!
//! ```text
//! initialize: every population filled by the initializer, evaluated, scaled
//! until termination.done(stats):
//!   Simple       select → cross → mutate a whole new population (elitism)
//!   SteadyState  breed replacement-count children, drop the worst
//!   Incremental  breed 1–2 children, each replaces a scheme-chosen member
//!   Deme         steady-state step per deme, then ring migration
//!   record statistics, notify the observer
//! ```
//!
//! # Strategy families
//!
//! Each family is a config enum parsed from its option name
//! ([`params`]) and a strategy enum with one method built from it by
//! [`StrategyFactory`].
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Steps Deme sub-populations on Rayon's thread pool.        |
//! | `serde`    | `Serialize`/`Deserialize` on parameters and config enums. |

pub mod allele;
pub mod builder;
pub mod crossover;
pub mod engine;
pub mod error;
pub mod factory;
pub mod genome;
pub mod mutation;
pub mod objective;
pub mod observer;
pub mod params;
pub mod scaling;
pub mod selection;
pub mod stats;
pub mod termination;

#[cfg(test)]
mod tests;

pub use allele::{AlleleSet, GenomeShape};
pub use builder::GaBuilder;
pub use crossover::Crossover;
pub use engine::{GeneticAlgorithm, Population};
pub use error::{GaError, GaResult};
pub use factory::{Strategies, StrategyFactory};
pub use genome::{Direction, DistanceKind, Gene, Individual};
pub use mutation::{Initializer, Mutation};
pub use objective::Objective;
pub use observer::{GaObserver, NoopObserver};
pub use params::{
    CrossoverScheme, GaKind, GaParams, InitializerScheme, MutatorScheme, ReplacementScheme,
    ScalingScheme, ScoreColumn, ScoreSelection, SelectionScheme, TerminationScheme,
};
pub use scaling::Scaling;
pub use selection::Selection;
pub use stats::{GenerationScores, Statistics};
pub use termination::{Replacement, Termination};
