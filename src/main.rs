//! # Main — CLI Entry Point
//!
//! Thin wrapper around the search engine: parse arguments, configure the
//! Rayon pool and logging, run the search, print the ordered results.
//! Invalid input is rejected up front by clap and `SearchConfig::new`;
//! there is no re-prompt loop.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "keyforge",
    about = "Sample random fixed-size integers and report the first N that qualify"
)]
struct Cli {
    /// Candidate size in bits (>= 32, multiple of 8)
    #[arg(long, default_value_t = 256)]
    bits: u32,

    /// Number of qualifying values to report
    #[arg(long, default_value_t = 5)]
    count: usize,

    /// Miller-Rabin rounds for primality testing (higher = more certain but slower)
    #[arg(long, default_value_t = 10)]
    mr_rounds: u32,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Emit results as JSON records instead of text lines
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the first N probable primes found
    Prime,
    /// Report the first N odd values found, each with its divisor count
    Odd,
}

fn main() -> Result<()> {
    // Structured logging: LOG_FORMAT=json for machines, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);
    cli::run_search(&cli)
}
