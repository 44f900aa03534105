//! Byte-value histogram.

/// Number of distinct byte values.
pub const BUCKETS: usize = 256;

/// Occurrence counts for each byte value 0..=255.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteHistogram {
    counts: [u64; BUCKETS],
}

impl Default for ByteHistogram {
    fn default() -> Self {
        Self {
            counts: [0; BUCKETS],
        }
    }
}

impl ByteHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the histogram of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut histogram = Self::new();
        histogram.add_bytes(data);
        histogram
    }

    /// Counts every byte of `data`.
    pub fn add_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.counts[b as usize] += 1;
        }
    }

    /// Adds another histogram bucket by bucket.
    pub fn merge(&mut self, other: &ByteHistogram) {
        for (count, add) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += add;
        }
    }

    /// Count for a single byte value.
    #[inline]
    pub fn get(&self, value: u8) -> u64 {
        self.counts[value as usize]
    }

    /// All bucket counts, indexed by byte value.
    #[inline]
    pub fn counts(&self) -> &[u64; BUCKETS] {
        &self.counts
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns true if nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Sum of all counted byte values.
    pub fn value_sum(&self) -> u64 {
        self.counts
            .iter()
            .enumerate()
            .map(|(value, &count)| value as u64 * count)
            .sum()
    }

    /// Bucket counts divided by the total. All zero when empty.
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; BUCKETS];
        }
        let total = total as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }
}

impl std::fmt::Debug for ByteHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied = self.counts.iter().filter(|&&c| c > 0).count();
        f.debug_struct("ByteHistogram")
            .field("total", &self.total())
            .field("occupied_buckets", &occupied)
            .finish()
    }
}
