//! Mock byte source for tests, benchmarks and dry runs.

use super::{ByteSource, SourceError};
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Deterministic stand-in for the RNG hardware.
///
/// Produces a ChaCha20 keystream. NOT a model of the real device's
/// statistics, only of its read interface.
pub struct MockSource {
    rng: ChaCha20Rng,
    seed: Option<u64>,
    /// Bytes left before reads come back empty.
    remaining: Option<u64>,
    /// Upper bound on bytes returned per read.
    block_limit: Option<usize>,
    reads: u64,
}

impl MockSource {
    /// Creates a mock source with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            seed: Some(seed),
            remaining: None,
            block_limit: None,
            reads: 0,
        }
    }

    /// Creates a mock source seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
            seed: None,
            remaining: None,
            block_limit: None,
            reads: 0,
        }
    }

    /// Limits the total number of bytes the source will ever return.
    pub fn with_budget(mut self, bytes: u64) -> Self {
        self.remaining = Some(bytes);
        self
    }

    /// Caps the size of each read, like a device with short transfers.
    pub fn with_block_limit(mut self, max: usize) -> Self {
        self.block_limit = Some(max);
        self
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl ByteSource for MockSource {
    fn read_block(&mut self, max: usize) -> Result<Vec<u8>, SourceError> {
        let mut n = max;
        if let Some(limit) = self.block_limit {
            n = n.min(limit);
        }
        if let Some(remaining) = self.remaining {
            n = n.min(usize::try_from(remaining).unwrap_or(usize::MAX));
            self.remaining = Some(remaining - n as u64);
        }

        let mut buf = vec![0u8; n];
        self.rng.fill_bytes(&mut buf);
        self.reads += 1;
        Ok(buf)
    }

    fn describe(&self) -> String {
        match self.seed {
            Some(seed) => format!("mock source (seed {seed})"),
            None => "mock source (OS seed)".to_string(),
        }
    }
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("seed", &self.seed)
            .field("remaining", &self.remaining)
            .field("block_limit", &self.block_limit)
            .field("reads", &self.reads)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_bytes() {
        let mut a = MockSource::new(42);
        let mut b = MockSource::new(42);
        assert_eq!(a.read_block(64).unwrap(), b.read_block(64).unwrap());
    }

    #[test]
    fn test_budget_exhausts() {
        let mut source = MockSource::new(1).with_budget(100);
        assert_eq!(source.read_block(64).unwrap().len(), 64);
        assert_eq!(source.read_block(64).unwrap().len(), 36);
        assert!(source.read_block(64).unwrap().is_empty());
        assert_eq!(source.reads(), 3);
    }

    #[test]
    fn test_block_limit_shortens_reads() {
        let mut source = MockSource::new(1).with_block_limit(10);
        assert_eq!(source.read_block(64).unwrap().len(), 10);
    }
}
