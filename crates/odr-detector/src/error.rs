//! Detector-subsystem error type.

use thiserror::Error;

use odr_core::OdrError;
use odr_network::NetworkError;

/// Errors produced by `odr-detector`.
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("detector '{0}' is defined twice")]
    Duplicate(String),

    #[error("edge '{edge}' used by detector '{detector}' is not known")]
    UnknownEdge { detector: String, edge: String },

    #[error("unknown detector type '{0}'")]
    UnknownType(String),

    #[error("detector flow file is corrupt: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] OdrError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DetectorResult<T> = Result<T, DetectorError>;
