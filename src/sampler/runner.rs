//! The sampling loops.

use super::{CancelToken, SamplerConfig, SamplerMode, Throughput};
use crate::source::{ByteSource, SourceError};
use std::io::{self, ErrorKind, Write};
use thiserror::Error;

/// Errors that end a sampling run.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The byte source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    /// The requested size is not a number.
    #[error("invalid size {0:?} (expected a number of bytes)")]
    InvalidSize(String),
}

/// How a sampling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The requested byte count was written.
    Completed {
        /// Bytes written.
        bytes: u64,
    },
    /// Cancellation was requested.
    Cancelled {
        /// Bytes read or written before stopping.
        bytes: u64,
    },
    /// The reader on the other end of the output went away.
    PipeClosed {
        /// Bytes written before the pipe closed.
        bytes: u64,
    },
}

impl RunOutcome {
    /// Bytes read (performance mode) or written (other modes).
    pub fn bytes(&self) -> u64 {
        match *self {
            Self::Completed { bytes } | Self::Cancelled { bytes } | Self::PipeClosed { bytes } => {
                bytes
            }
        }
    }
}

/// Drives one sampling run over a byte source.
#[derive(Debug, Clone)]
pub struct Sampler {
    config: SamplerConfig,
}

impl Sampler {
    /// Creates a sampler.
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Runs the configured mode until it finishes or is cancelled.
    pub fn run<S, W>(
        &self,
        source: &mut S,
        out: &mut W,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, SamplerError>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        tracing::info!(
            source = %source.describe(),
            mode = ?self.config.mode,
            block_size = self.config.block_size,
            "Sampling"
        );

        let outcome = match self.config.mode {
            SamplerMode::Performance => self.run_performance(source, out, cancel),
            SamplerMode::Endless => self.run_endless(source, out, cancel),
            SamplerMode::Size(size) => self.run_size(source, out, cancel, size),
        }?;

        tracing::info!(?outcome, "Sampling finished");
        Ok(outcome)
    }

    fn read<S: ByteSource + ?Sized>(&self, source: &mut S) -> Result<Vec<u8>, SamplerError> {
        let block = source.read_block(self.config.block_size)?;
        if block.is_empty() {
            return Err(SourceError::Exhausted.into());
        }
        Ok(block)
    }

    fn run_performance<S, W>(
        &self,
        source: &mut S,
        out: &mut W,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, SamplerError>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut meter = Throughput::start();
        loop {
            if cancel.acknowledge() {
                writeln!(out).map_err(SamplerError::Output)?;
                return Ok(RunOutcome::Cancelled {
                    bytes: meter.bytes(),
                });
            }

            let block = self.read(source)?;
            meter.record(block.len());

            write!(out, "Speed: {:.2} KB/s\r", meter.kib_per_sec())
                .and_then(|_| out.flush())
                .map_err(SamplerError::Output)?;
        }
    }

    fn run_endless<S, W>(
        &self,
        source: &mut S,
        out: &mut W,
        cancel: &CancelToken,
    ) -> Result<RunOutcome, SamplerError>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut written = 0u64;
        loop {
            if cancel.acknowledge() {
                return match out.flush() {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(SamplerError::Output(e)),
                    _ => Ok(RunOutcome::Cancelled { bytes: written }),
                };
            }

            let block = self.read(source)?;
            match out.write_all(&block) {
                Ok(()) => written += block.len() as u64,
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    tracing::debug!(bytes = written, "Output pipe closed");
                    return Ok(RunOutcome::PipeClosed { bytes: written });
                }
                Err(e) => return Err(SamplerError::Output(e)),
            }
        }
    }

    fn run_size<S, W>(
        &self,
        source: &mut S,
        out: &mut W,
        cancel: &CancelToken,
        size: u64,
    ) -> Result<RunOutcome, SamplerError>
    where
        S: ByteSource + ?Sized,
        W: Write + ?Sized,
    {
        let mut written = 0u64;
        while written < size {
            if cancel.acknowledge() {
                out.flush().map_err(SamplerError::Output)?;
                return Ok(RunOutcome::Cancelled { bytes: written });
            }

            let block = self.read(source)?;
            let take = (size - written).min(block.len() as u64) as usize;
            out.write_all(&block[..take])
                .map_err(SamplerError::Output)?;
            written += take as u64;
        }

        out.flush().map_err(SamplerError::Output)?;
        Ok(RunOutcome::Completed { bytes: written })
    }
}
