//! Raspberry Pi Pico hardware RNG tools.
//!
//! Sampling and offline statistical analysis for a hardware random
//! number generator reached through a character device or a USB bulk
//! endpoint.
//!
//! # Architecture
//!
//! ```text
//! source → sampler → stdout            (pico-rng-test)
//! sample file → analysis → report      (pico-rng-analyze)
//! ```
//!
//! # Design Principles
//!
//! - **One backend per run**: the character device is used whenever it
//!   exists, USB otherwise
//! - **No retries**: any read failure ends the run
//! - **Cancellation is not an error**: interrupts and closed pipes end
//!   the loops normally
//! - **No cryptographic claims**: chi-square is a sanity check, not a
//!   certification
//!
//! # Example
//!
//! ```no_run
//! use pico_rng::{
//!     analysis::{analyze_reader, DEFAULT_CHUNK_SIZE},
//!     sampler::{CancelToken, Sampler, SamplerConfig, SamplerMode},
//!     source::MockSource,
//! };
//! use std::io::Cursor;
//!
//! let mut source = MockSource::new(42);
//! let mut sample = Vec::new();
//! Sampler::new(SamplerConfig::new(SamplerMode::Size(100_000)))
//!     .run(&mut source, &mut sample, &CancelToken::new())
//!     .unwrap();
//!
//! let report = analyze_reader(Cursor::new(sample), DEFAULT_CHUNK_SIZE).unwrap();
//! println!("mean = {:?}", report.mean());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod report;
pub mod sampler;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::{AnalysisReport, ByteHistogram, ChiSquareRecord, StreamingAnalyzer};
pub use config::{DeviceConfig, FileConfig};
pub use report::{ReportFile, ReportRenderer};
pub use sampler::{CancelToken, RunOutcome, Sampler, SamplerConfig, SamplerMode};
pub use source::{ByteSource, MockSource, RngDevice};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
