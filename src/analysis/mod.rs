//! Streaming randomness-quality analysis.
//!
//! A captured sample is read in fixed-size chunks. Each chunk gets a
//! 256-bucket histogram and a chi-square goodness-of-fit test against
//! the uniform distribution; the histograms are summed and the byte
//! mean is accumulated across the whole run. These are sanity checks,
//! not a certification battery.

mod analyzer;
mod chisquare;
mod chunks;
mod histogram;
mod summary;

pub use analyzer::{analyze_file, analyze_reader, AnalysisError, AnalysisReport, StreamingAnalyzer};
pub use chisquare::{ChiSquare, ChiSquareRecord, DEGREES_OF_FREEDOM};
pub use chunks::{ChunkReader, DEFAULT_CHUNK_SIZE};
pub use histogram::{ByteHistogram, BUCKETS};
pub use summary::SeriesSummary;
