//! Read throughput measurement.

use std::time::{Duration, Instant};

/// Rolling throughput since the start of a run.
///
/// The clock is treated as having started one second early, so the
/// very first report never divides by zero.
#[derive(Debug, Clone)]
pub struct Throughput {
    started: Instant,
    bytes: u64,
}

impl Throughput {
    /// Starts measuring now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            bytes: 0,
        }
    }

    /// Records bytes read.
    pub fn record(&mut self, bytes: usize) {
        self.bytes += bytes as u64;
    }

    /// Total bytes recorded.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Current rate in KiB/s.
    pub fn kib_per_sec(&self) -> f64 {
        self.kib_per_sec_at(self.started.elapsed())
    }

    /// Rate in KiB/s after `elapsed`, counted in whole seconds.
    pub fn kib_per_sec_at(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs() + 1;
        (self.bytes / secs) as f64 / 1024.0
    }
}
