use thiserror::Error;

use odr_core::RouteId;
use odr_ga::GaError;
use odr_routes::RouteError;

/// Errors raised while building genome shapes or scorers.
///
/// Scoring itself never fails: degenerate evaluations score 0.
#[derive(Debug, Error)]
pub enum FitnessError {
    #[error("route '{route}' starts on edge '{edge}' which has no detector")]
    NoOriginDetector { route: String, edge: String },

    #[error("route {0} is not in the catalog")]
    UnknownRoute(RouteId),

    #[error("the static solution has {routes} genes but {expected} were expected")]
    SolutionLength { routes: usize, expected: usize },

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    Ga(#[from] GaError),
}

pub type FitnessResult<T> = Result<T, FitnessError>;
