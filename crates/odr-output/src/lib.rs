//! `odr-output`: files written by a disaggregation run.
//!
//! | Writer                    | File                                          |
//! |---------------------------|-----------------------------------------------|
//! | [`CsvScoreWriter`]        | `static_<score-file>`, `dyn_<score-file>`     |
//! | [`write_route_file`]      | simulator route file (`<routes>`)             |
//! | [`write_route_csv`]       | `route,edges,distance_m,duration_s`           |
//! | [`write_static_solution`] | `gene,route`                                  |
//! | [`write_dynamic_solution`]| `gene,route,depart`                           |
//!
//! Score files are driven by [`ScoreFileObserver`], which implements
//! `odr_ga::GaObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use odr_output::{CsvScoreWriter, Phase, ScoreFileObserver};
//!
//! let path = Phase::Static.score_path(Path::new("out/gar_stats.dat"));
//! let writer = CsvScoreWriter::new(&path, ScoreSelection::all())?;
//! let mut obs = ScoreFileObserver::new(writer, 1, 0);
//! let best = ga.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { logger.error(&e.to_string()); }
//! ```

pub mod error;
pub mod observer;
pub mod routes;
pub mod score;
pub mod solution;
pub mod writer;


pub use error::{OutputError, OutputResult};
pub use observer::ScoreFileObserver;
pub use routes::{write_route_csv, write_route_file};
pub use score::{CsvScoreWriter, Phase};
pub use solution::{write_dynamic_solution, write_static_solution};
pub use writer::ScoreWriter;
