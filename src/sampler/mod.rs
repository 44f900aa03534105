//! Device sampling loops.
//!
//! Reads fixed-size blocks from a byte source and either reports
//! throughput, streams raw bytes without end, or emits an exact
//! number of bytes.

mod cancel;
mod mode;
mod runner;
mod throughput;

pub use cancel::{CancelToken, INTERRUPT_GRACE};
pub use mode::{parse_size, SamplerConfig, SamplerMode, BLOCK_SIZE};
pub use runner::{RunOutcome, Sampler, SamplerError};
pub use throughput::Throughput;
