//! The `ScoreWriter` trait implemented by score-file backends.

use odr_ga::GenerationScores;

use crate::OutputResult;

/// Sink for per-generation score rows.
///
/// Driven by [`ScoreFileObserver`][crate::ScoreFileObserver], which decides
/// when rows are written and when the sink is flushed.
pub trait ScoreWriter {
    fn write_scores(&mut self, row: &GenerationScores) -> OutputResult<()>;

    fn flush(&mut self) -> OutputResult<()>;

    /// Flush and close.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
