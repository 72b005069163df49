use thiserror::Error;

use odr_bridge::BridgeError;
use odr_core::OdrError;
use odr_fitness::FitnessError;
use odr_ga::GaError;
use odr_output::OutputError;
use odr_routes::RouteError;

use crate::DriverState;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("configuration error: {0}")]
    Config(String),

    /// A required input is absent or empty.
    #[error("cannot start: {0}")]
    Missing(&'static str),

    #[error("driver is {actual:?}, expected {expected:?}")]
    State { expected: DriverState, actual: DriverState },

    #[error(transparent)]
    Core(#[from] OdrError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Ga(#[from] GaError),

    #[error(transparent)]
    Fitness(#[from] FitnessError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type DriverResult<T> = Result<T, DriverError>;
