//! `ScoreFileObserver<W>` bridges `GaObserver` to a `ScoreWriter`.

use odr_ga::{GaObserver, Gene, Statistics};

use crate::writer::ScoreWriter;
use crate::{OutputError, OutputResult};

/// A [`GaObserver`] that writes one score row every `score_freq`
/// generations and flushes every `flush_freq` generations.
///
/// A `score_freq` of 0 writes no rows; a `flush_freq` of 0 flushes only at
/// the end.  Errors from the writer are stored internally because
/// `GaObserver` methods have no return value.  After the run returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct ScoreFileObserver<W: ScoreWriter> {
    writer: W,
    score_freq: usize,
    flush_freq: usize,
    rows: usize,
    last_error: Option<OutputError>,
}

impl<W: ScoreWriter> ScoreFileObserver<W> {
    pub fn new(writer: W, score_freq: usize, flush_freq: usize) -> Self {
        Self { writer, score_freq, flush_freq, rows: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn record<T: Gene>(&mut self, stats: &Statistics<T>) {
        let generation = stats.generation();
        if self.score_freq > 0 && generation % self.score_freq == 0 {
            let result = self.writer.write_scores(stats.current());
            if result.is_ok() {
                self.rows += 1;
            }
            self.store_err(result);
        }
        if self.flush_freq > 0 && generation % self.flush_freq == 0 {
            let result = self.writer.flush();
            self.store_err(result);
        }
    }
}

impl<T: Gene, W: ScoreWriter> GaObserver<T> for ScoreFileObserver<W> {
    fn on_start(&mut self, stats: &Statistics<T>) {
        self.record(stats);
    }

    fn on_generation(&mut self, stats: &Statistics<T>) {
        self.record(stats);
    }

    fn on_finish(&mut self, _stats: &Statistics<T>) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
