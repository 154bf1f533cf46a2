//! CSV export of episode-length curves
//!
//! One row per episode index with the length statistics across runs, ready
//! for plotting the average number of steps per episode.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;

use crate::{
    Result,
    analysis::stats::{LengthSummary, summarize_episodes},
    pipeline::TrainingResult,
};

/// A single row of the curve export
#[derive(Debug, Clone, Serialize)]
pub struct CurveRecord {
    /// Episode number (1-based)
    pub episode: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: usize,
    pub max: usize,
}

impl From<LengthSummary> for CurveRecord {
    fn from(summary: LengthSummary) -> Self {
        Self {
            episode: summary.episode + 1,
            mean: summary.mean,
            std_dev: summary.std_dev,
            min: summary.min,
            max: summary.max,
        }
    }
}

/// Write the curve of `result` to any writer.
pub fn write_length_curve_to<W: Write>(writer: W, result: &TrainingResult) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let summaries = summarize_episodes(&result.episode_lengths());
    let rows = summaries.len();
    for summary in summaries {
        csv_writer.serialize(CurveRecord::from(summary))?;
    }
    csv_writer.flush()?;
    Ok(rows)
}

/// Write the curve of `result` to a CSV file, returning the number of rows.
pub fn write_length_curve<P: AsRef<Path>>(path: P, result: &TrainingResult) -> Result<usize> {
    let file = File::create(path)?;
    write_length_curve_to(file, result)
}
