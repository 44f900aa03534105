//! Machine-readable report file.

use crate::analysis::{AnalysisReport, ChiSquareRecord, SeriesSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report file.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The file could not be written.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    /// The report could not be encoded as TOML.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Analysis results in TOML form.
///
/// Scalar fields come first so the TOML tables follow them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    /// When the analysis finished, in UTC.
    pub generated_at: DateTime<Utc>,
    /// Name of the analyzed sample file.
    pub sample: String,
    /// Bytes per full chunk.
    pub chunk_size: usize,
    /// Bytes read from the sample.
    pub total_bytes: u64,
    /// Absent for an empty sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    /// Aggregate count per byte value.
    pub histogram: Vec<u64>,
    /// Summary of per-chunk chi-square statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chi_square: Option<SeriesSummary>,
    /// Summary of per-chunk percentage excess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_excess: Option<SeriesSummary>,
    /// One record per chunk, in stream order.
    #[serde(default)]
    pub chunks: Vec<ChiSquareRecord>,
}

impl ReportFile {
    /// Captures a finished analysis.
    pub fn from_report(sample: impl Into<String>, report: &AnalysisReport) -> Self {
        Self {
            generated_at: Utc::now(),
            sample: sample.into(),
            chunk_size: report.chunk_size(),
            total_bytes: report.total_bytes(),
            mean: report.mean(),
            histogram: report.histogram().counts().to_vec(),
            chi_square: SeriesSummary::of(&report.chi_square_values()),
            percentage_excess: SeriesSummary::of(&report.percentage_excess_values()),
            chunks: report.records().to_vec(),
        }
    }

    /// Serializes to TOML text.
    pub fn to_toml(&self) -> Result<String, ReportError> {
        Ok(toml::to_string(self)?)
    }

    /// Writes the report to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?)?;
        tracing::info!(path = %path.display(), "Wrote report");
        Ok(())
    }
}
