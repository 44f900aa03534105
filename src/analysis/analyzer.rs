//! Streaming randomness-quality analyzer.
//!
//! Consumes a byte stream chunk by chunk, keeping an aggregate
//! histogram, running byte sum and count, and one chi-square record
//! per chunk in arrival order.

use super::chisquare::ChiSquareRecord;
use super::chunks::ChunkReader;
use super::histogram::ByteHistogram;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// Errors that can abort an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Reading the sample failed.
    #[error("failed to read sample: {0}")]
    Io(#[from] io::Error),
    /// A chunk size of zero was requested.
    #[error("chunk size must be at least 1 byte")]
    InvalidChunkSize,
}

/// Incremental analyzer state for one run.
#[derive(Debug, Clone)]
pub struct StreamingAnalyzer {
    chunk_size: usize,
    histogram: ByteHistogram,
    records: Vec<ChiSquareRecord>,
    byte_sum: u64,
    byte_count: u64,
}

impl StreamingAnalyzer {
    /// Creates an analyzer that reads `chunk_size` bytes per chunk.
    pub fn new(chunk_size: usize) -> Result<Self, AnalysisError> {
        if chunk_size == 0 {
            return Err(AnalysisError::InvalidChunkSize);
        }
        Ok(Self {
            chunk_size,
            histogram: ByteHistogram::new(),
            records: Vec::new(),
            byte_sum: 0,
            byte_count: 0,
        })
    }

    /// Processes one chunk and returns its chi-square record.
    ///
    /// The chunk is taken as given, whatever its length; empty chunks
    /// are ignored and return `None`.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Option<&ChiSquareRecord> {
        if chunk.is_empty() {
            return None;
        }

        let chunk_histogram = ByteHistogram::from_bytes(chunk);
        let record = ChiSquareRecord::for_chunk(self.records.len() as u64, &chunk_histogram);

        self.histogram.merge(&chunk_histogram);
        self.byte_sum += chunk_histogram.value_sum();
        self.byte_count += chunk.len() as u64;

        tracing::debug!(
            chunk = record.chunk_index,
            len = record.chunk_len,
            chi_square = record.statistic,
            p_value = record.p_value,
            "Analyzed chunk"
        );

        self.records.push(record);
        self.records.last()
    }

    /// Reads `reader` to the end in chunks, analyzing each one.
    ///
    /// A read failure aborts the run; chunks already pushed stay in the
    /// analyzer but the caller is expected to discard it.
    pub fn consume<R: Read>(&mut self, reader: R) -> Result<(), AnalysisError> {
        for chunk in ChunkReader::new(reader, self.chunk_size) {
            self.push_chunk(&chunk?);
        }
        Ok(())
    }

    /// Aggregate histogram so far.
    pub fn histogram(&self) -> &ByteHistogram {
        &self.histogram
    }

    /// Chi-square records so far.
    pub fn records(&self) -> &[ChiSquareRecord] {
        &self.records
    }

    /// Ends the run.
    pub fn finish(self) -> AnalysisReport {
        tracing::info!(
            bytes = self.byte_count,
            chunks = self.records.len(),
            "Analysis complete"
        );
        AnalysisReport {
            chunk_size: self.chunk_size,
            histogram: self.histogram,
            records: self.records,
            byte_sum: self.byte_sum,
            byte_count: self.byte_count,
        }
    }
}

/// Final result of an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    chunk_size: usize,
    histogram: ByteHistogram,
    records: Vec<ChiSquareRecord>,
    byte_sum: u64,
    byte_count: u64,
}

impl AnalysisReport {
    /// Bytes per full chunk used for the run.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Aggregate histogram over every byte read.
    pub fn histogram(&self) -> &ByteHistogram {
        &self.histogram
    }

    /// Per-chunk chi-square records in stream order.
    pub fn records(&self) -> &[ChiSquareRecord] {
        &self.records
    }

    /// Mean byte value, or `None` for an empty sample.
    pub fn mean(&self) -> Option<f64> {
        if self.byte_count == 0 {
            return None;
        }
        Some(self.byte_sum as f64 / self.byte_count as f64)
    }

    /// Total bytes analyzed.
    pub fn total_bytes(&self) -> u64 {
        self.byte_count
    }

    /// Number of chunks analyzed.
    pub fn chunk_count(&self) -> usize {
        self.records.len()
    }

    /// Chi-square statistics in stream order.
    pub fn chi_square_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.statistic).collect()
    }

    /// P-values as percentages, in stream order.
    pub fn percentage_excess_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.percentage_excess()).collect()
    }

    /// Aggregate histogram as probabilities.
    pub fn normalized_histogram(&self) -> Vec<f64> {
        self.histogram.probabilities()
    }
}

/// Analyzes a whole reader.
pub fn analyze_reader<R: Read>(
    reader: R,
    chunk_size: usize,
) -> Result<AnalysisReport, AnalysisError> {
    let mut analyzer = StreamingAnalyzer::new(chunk_size)?;
    analyzer.consume(reader)?;
    Ok(analyzer.finish())
}

/// Analyzes a captured sample file.
pub fn analyze_file(
    path: impl AsRef<Path>,
    chunk_size: usize,
) -> Result<AnalysisReport, AnalysisError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), chunk_size, "Analyzing sample");
    let file = File::open(path)?;
    analyze_reader(file, chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::{Cursor, ErrorKind, Write};

    fn analyze(data: &[u8], chunk_size: usize) -> AnalysisReport {
        analyze_reader(Cursor::new(data.to_vec()), chunk_size).unwrap()
    }

    #[test]
    fn test_mean_of_extremes() {
        let report = analyze(&[0, 255, 0, 255], crate::analysis::DEFAULT_CHUNK_SIZE);
        assert_eq!(report.mean(), Some(127.5));
    }

    #[test]
    fn test_empty_input() {
        let report = analyze(&[], 10_000);

        assert_eq!(report.total_bytes(), 0);
        assert_eq!(report.chunk_count(), 0);
        assert!(report.histogram().is_empty());
        assert_eq!(report.mean(), None);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(matches!(
            StreamingAnalyzer::new(0),
            Err(AnalysisError::InvalidChunkSize)
        ));
    }

    #[test]
    fn test_uniform_chunks_score_zero() {
        // Each 512-byte chunk holds every byte value exactly twice.
        let data: Vec<u8> = (0..512 * 6).map(|i| (i % 256) as u8).collect();
        let report = analyze(&data, 512);

        assert_eq!(report.chunk_count(), 6);
        assert!(report.chi_square_values().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_repeated_byte_scores_maximum() {
        let report = analyze(&vec![0xEEu8; 20_000], 10_000);

        for record in report.records() {
            let max = (record.chunk_len * 255) as f64;
            assert!((record.statistic - max).abs() / max < 1e-9);
            assert!(record.p_value < 1e-10);
        }
        assert_eq!(report.mean(), Some(238.0));
    }

    #[test]
    fn test_records_in_stream_order() {
        let mut data: Vec<u8> = (0..256).map(|i| i as u8).collect();
        data.extend(vec![9u8; 256]);
        let report = analyze(&data, 256);

        let records = report.records();
        assert_eq!(records[0].chunk_index, 0);
        assert_eq!(records[0].statistic, 0.0);
        assert_eq!(records[1].chunk_index, 1);
        assert!(records[1].statistic > 60_000.0);
    }

    #[test]
    fn test_final_short_chunk() {
        let data = vec![1u8; 25_000];
        let report = analyze(&data, 10_000);

        let lens: Vec<usize> = report.records().iter().map(|r| r.chunk_len).collect();
        assert_eq!(lens, vec![10_000, 10_000, 5_000]);
    }

    #[test]
    fn test_read_error_aborts() {
        struct Broken(usize);

        impl Read for Broken {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.0 == 0 {
                    return Err(io::Error::new(ErrorKind::Other, "transfer failed"));
                }
                self.0 -= 1;
                buf[0] = 0;
                Ok(1)
            }
        }

        let result = analyze_reader(Broken(5), 2);
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }

    #[test]
    fn test_push_chunk_ignores_empty() {
        let mut analyzer = StreamingAnalyzer::new(16).unwrap();
        assert!(analyzer.push_chunk(&[]).is_none());
        assert!(analyzer.push_chunk(&[1, 2, 3]).is_some());
        assert_eq!(analyzer.records().len(), 1);
        assert_eq!(analyzer.histogram().total(), 3);
    }

    #[test]
    fn test_analyze_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..30_000).map(|i| (i * 31 + 7) as u8).collect();
        tmp.write_all(&data).unwrap();
        tmp.flush().unwrap();

        let report = analyze_file(tmp.path(), 10_000).unwrap();
        assert_eq!(report.total_bytes(), 30_000);
        assert_eq!(report.chunk_count(), 3);
        assert_eq!(report.percentage_excess_values().len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = analyze_file("/nonexistent/sample.bin", 10_000);
        assert!(matches!(result, Err(AnalysisError::Io(_))));
    }

    proptest! {
        #[test]
        fn prop_histogram_conserves_bytes(
            data in proptest::collection::vec(any::<u8>(), 0..5_000),
            chunk_size in 1usize..700,
        ) {
            let report = analyze(&data, chunk_size);
            prop_assert_eq!(report.histogram().total(), data.len() as u64);
            prop_assert_eq!(report.total_bytes(), data.len() as u64);
        }

        #[test]
        fn prop_one_record_per_chunk(
            data in proptest::collection::vec(any::<u8>(), 0..5_000),
            chunk_size in 1usize..700,
        ) {
            let report = analyze(&data, chunk_size);
            prop_assert_eq!(report.chunk_count(), data.len().div_ceil(chunk_size));
        }

        #[test]
        fn prop_chunk_size_does_not_change_aggregates(
            data in proptest::collection::vec(any::<u8>(), 1..5_000),
            chunk_size in 1usize..700,
        ) {
            let single = analyze(&data, chunk_size);
            let double = analyze(&data, chunk_size * 2);

            prop_assert_eq!(single.histogram(), double.histogram());
            prop_assert_eq!(single.mean(), double.mean());
        }
    }
}
