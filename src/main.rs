//! Pico RNG test tool.
//!
//! Reads from the hardware RNG and either reports throughput, streams
//! raw bytes to stdout, or writes a fixed number of bytes.

use clap::Parser;
use pico_rng::{
    config::FileConfig,
    sampler::{CancelToken, RunOutcome, Sampler, SamplerConfig, SamplerMode},
    source::{ByteSource, MockSource, RngDevice},
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Exit status of a size run stopped by Ctrl-C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Parser)]
#[command(
    name = "pico-rng-test",
    version,
    about = "Raspberry Pi Pico Random Number Generator Test Tool"
)]
struct Args {
    /// Performance test the RNG.
    #[arg(long)]
    performance: bool,

    /// Output random bytes endlessly.
    #[arg(long)]
    endless: bool,

    /// Number of bytes to output.
    #[arg(long, default_value = "100")]
    size: String,

    /// USB vendor ID in hex [default: 0000].
    #[arg(long)]
    vid: Option<String>,

    /// USB product ID in hex [default: 0004].
    #[arg(long)]
    pid: Option<String>,

    /// Character device to prefer over USB [default: /dev/pico_rng].
    #[arg(long)]
    device: Option<PathBuf>,

    /// USB read timeout in milliseconds [default: 500].
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read from a seeded software generator instead of the device.
    #[arg(long, hide = true)]
    mock: bool,
}

fn main() {
    // Logs go to stderr; stdout carries the random bytes.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    match run(Args::parse()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<i32, Box<dyn std::error::Error>> {
    let mut file_config = FileConfig::load_or_default(args.config.as_deref())?;
    let device_config = &mut file_config.device;
    if let Some(vid) = args.vid {
        device_config.vid = vid;
    }
    if let Some(pid) = args.pid {
        device_config.pid = pid;
    }
    if let Some(path) = args.device {
        device_config.path = path;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        device_config.timeout_ms = timeout_ms;
    }

    let mode = SamplerMode::select(args.performance, args.endless, &args.size)?;
    let sampler =
        Sampler::new(SamplerConfig::new(mode).with_block_size(device_config.block_size));

    let mut source: Box<dyn ByteSource> = if args.mock {
        Box::new(MockSource::from_entropy())
    } else {
        Box::new(RngDevice::open(device_config)?)
    };
    info!(source = %source.describe(), "Opened RNG");

    // An interrupted fixed-size run did not deliver what was asked for.
    let interrupt_code = match mode {
        SamplerMode::Size(_) => INTERRUPTED_EXIT_CODE,
        _ => 0,
    };
    let cancel = CancelToken::new();
    cancel.cancel_on_interrupt(interrupt_code)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = sampler.run(&mut source, &mut out, &cancel)?;

    Ok(match (mode, outcome) {
        (SamplerMode::Size(size), RunOutcome::Cancelled { bytes }) => {
            warn!(requested = size, written = bytes, "Interrupted before completion");
            interrupt_code
        }
        _ => 0,
    })
}
