//! Chi-square goodness-of-fit against a uniform byte distribution.
//!
//! The expected count per bucket is `len / 256` as a float, with no
//! rounding, so chunk lengths that are not a multiple of 256 are
//! handled the same way as any equal-expected-frequency test.

use super::histogram::{ByteHistogram, BUCKETS};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Degrees of freedom for 256 buckets.
pub const DEGREES_OF_FREEDOM: f64 = (BUCKETS - 1) as f64;

/// A chi-square statistic with its upper-tail p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquare {
    /// Sum over buckets of (observed - expected)^2 / expected.
    pub statistic: f64,
    /// Probability of a statistic at least this large under uniformity.
    pub p_value: f64,
}

impl ChiSquare {
    /// Tests a histogram against the uniform distribution.
    ///
    /// An empty histogram has no defined expectation; both fields are NaN.
    pub fn uniform(histogram: &ByteHistogram) -> Self {
        let total = histogram.total();
        if total == 0 {
            return Self {
                statistic: f64::NAN,
                p_value: f64::NAN,
            };
        }

        let expected = total as f64 / BUCKETS as f64;
        let statistic: f64 = histogram
            .counts()
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        Self {
            statistic,
            p_value: upper_tail(statistic),
        }
    }
}

/// Survival function of chi-square with 255 degrees of freedom.
fn upper_tail(statistic: f64) -> f64 {
    match ChiSquared::new(DEGREES_OF_FREEDOM) {
        Ok(dist) => dist.sf(statistic),
        Err(_) => f64::NAN,
    }
}

/// Chi-square result for one chunk of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareRecord {
    /// Zero-based position of the chunk in the stream.
    pub chunk_index: u64,
    /// Bytes in the chunk.
    pub chunk_len: usize,
    /// Chi-square statistic.
    pub statistic: f64,
    /// Upper-tail p-value.
    pub p_value: f64,
}

impl ChiSquareRecord {
    /// Tests one chunk.
    pub fn for_chunk(chunk_index: u64, histogram: &ByteHistogram) -> Self {
        let result = ChiSquare::uniform(histogram);
        Self {
            chunk_index,
            chunk_len: histogram.total() as usize,
            statistic: result.statistic,
            p_value: result.p_value,
        }
    }

    /// The p-value as a percentage.
    pub fn percentage_excess(&self) -> f64 {
        self.p_value * 100.0
    }
}
