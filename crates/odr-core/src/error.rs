//! Workspace base error type.
//!
//! Sub-crates define their own error enums and wrap `OdrError` as one
//! variant via `#[from]`, so configuration and I/O failures raised in
//! `odr-core` helpers flow upward without re-wrapping at every call site.

use thiserror::Error;

/// The error type for `odr-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum OdrError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("time {time} is outside the grid [{begin}, {end})")]
    OutOfGrid { time: i64, begin: i64, end: i64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `odr-core`.
pub type OdrResult<T> = Result<T, OdrError>;
