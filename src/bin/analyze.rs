//! Pico RNG test analyzer.
//!
//! Reads a captured sample, runs the chunked chi-square analysis and
//! draws the byte distribution, chi-square and percentage excess
//! charts.

use clap::Parser;
use pico_rng::{
    analysis::analyze_file,
    config::FileConfig,
    report::{ReportFile, ReportRenderer},
};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "pico-rng-analyze",
    version,
    about = "Raspberry Pi Pico Random Number Generator Test Analyzer"
)]
struct Args {
    /// File that contains a random sample of bytes.
    #[arg(value_name = "FILENAME")]
    file: PathBuf,

    /// Bytes per chi-square chunk [default: 10000].
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Also write the results to this TOML file.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Width of the longest chart bar.
    #[arg(long, default_value_t = 50)]
    width: usize,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = FileConfig::load_or_default(args.config.as_deref())?.analysis;
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    config.validate()?;

    let report = analyze_file(&args.file, config.chunk_size)?;
    info!(
        bytes = report.total_bytes(),
        chunks = report.chunk_count(),
        mean = ?report.mean(),
        "Sample analyzed"
    );

    if let Some(path) = &args.report {
        ReportFile::from_report(args.file.display().to_string(), &report).write(path)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ReportRenderer::from_config(&config, args.width).render(&report, &mut out)?;
    out.flush()?;
    Ok(())
}
