//! Network-subsystem error type.

use thiserror::Error;

/// Errors produced by `odr-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("edge '{0}' is defined twice")]
    DuplicateEdge(String),

    #[error("edge '{edge}' is invalid: {reason}")]
    InvalidEdge { edge: String, reason: String },

    #[error("unknown edge '{0}'")]
    UnknownEdge(String),

    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
