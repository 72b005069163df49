//! CSV score files.
//!
//! One file per GA phase, named after the configured score file with a
//! phase prefix:
//!
//! ```text
//! out/gar_stats.dat  →  out/static_gar_stats.dat, out/dyn_gar_stats.dat
//! ```
//!
//! Columns are `generation` followed by the selected statistics.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;

use odr_ga::{GenerationScores, ScoreSelection};

use crate::OutputResult;
use crate::writer::ScoreWriter;

/// The two GA phases of a disaggregation run.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
    Static,
    Dynamic,
}

impl Phase {
    pub fn prefix(self) -> &'static str {
        match self {
            Phase::Static => "static_",
            Phase::Dynamic => "dyn_",
        }
    }

    /// `score_file` with this phase's prefix on its file name.
    pub fn score_path(self, score_file: &Path) -> PathBuf {
        let name = score_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        score_file.with_file_name(format!("{}{name}", self.prefix()))
    }
}

/// Writes selected generation statistics to a CSV file.
pub struct CsvScoreWriter {
    out: Writer<File>,
    selection: ScoreSelection,
    finished: bool,
}

impl CsvScoreWriter {
    /// Create (truncate) `path` and write the header row.
    pub fn new(path: &Path, selection: ScoreSelection) -> OutputResult<Self> {
        let mut out = Writer::from_path(path)?;
        let header = std::iter::once("generation")
            .chain(selection.columns().iter().map(|c| c.name()));
        out.write_record(header)?;
        Ok(Self { out, selection, finished: false })
    }
}

impl ScoreWriter for CsvScoreWriter {
    fn write_scores(&mut self, row: &GenerationScores) -> OutputResult<()> {
        let mut record = Vec::with_capacity(self.selection.columns().len() + 1);
        record.push(row.generation.to_string());
        for &column in self.selection.columns() {
            // Diversity is blank unless the run records it.
            record.push(row.column(column).map(|v| v.to_string()).unwrap_or_default());
        }
        self.out.write_record(&record)?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }
}
