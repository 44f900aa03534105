//! Presentation of analysis results.
//!
//! Charts are drawn as plain text so they work over SSH and in logs.
//! Nothing here feeds back into the analysis.

mod chart;
mod file;
mod render;

pub use chart::{bin_counts, value_range, BarChart, BarRow};
pub use file::{ReportError, ReportFile};
pub use render::ReportRenderer;
