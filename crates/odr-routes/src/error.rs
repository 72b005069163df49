//! Route-subsystem error type.

use thiserror::Error;

use odr_core::OdrError;
use odr_network::NetworkError;

/// Errors produced by `odr-routes`.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown edge '{0}'")]
    UnknownEdge(String),

    #[error("unknown district '{0}'")]
    UnknownDistrict(String),

    #[error("edge '{edge}' has two roles in district '{district}'")]
    RoleConflict { district: String, edge: String },

    #[error("district '{district}' is assigned to groups '{first}' and '{second}'")]
    GroupConflict { district: String, first: String, second: String },

    #[error("the number of districts [{declared}] doesn't match the {what} [{found}]")]
    Dimension { what: &'static str, declared: usize, found: usize },

    #[error("OD cell ({row}, {col}) value {value} does not give a valid trip count")]
    BadCell { row: usize, col: usize, value: f64 },

    #[error("OD matrix holds more than {max} trips")]
    TooManyTrips { max: usize },

    #[error("OD matrix line {line}: {reason}")]
    OdFormat { line: usize, reason: String },

    #[error("parse error: {0}")]
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

pub type RouteResult<T> = Result<T, RouteError>;
