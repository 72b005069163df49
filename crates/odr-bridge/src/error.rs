use std::path::PathBuf;

use thiserror::Error;

use odr_detector::DetectorError;
use odr_fitness::{FitnessError, SimulationFailed};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("cannot start simulator '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("simulator did not finish within {millis} ms and was killed")]
    Timeout { millis: u128 },

    #[error("simulator exited with {status}{detail}")]
    Exit { status: String, detail: String },

    #[error("measurement file '{}' is unreadable: {reason}", path.display())]
    Measurement { path: PathBuf, reason: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error(transparent)]
    Fitness(#[from] FitnessError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

impl From<BridgeError> for SimulationFailed {
    fn from(e: BridgeError) -> Self {
        SimulationFailed::new(e.to_string())
    }
}
