//! # CLI Execution
//!
//! Extracted from `main.rs` to keep the entry point slim: config construction,
//! progress reporter lifecycle, search dispatch, and result printing.

use anyhow::Result;
use keyforge::config::{Mode, SearchConfig};
use keyforge::slots::SearchResult;
use keyforge::{exact_digits, progress, scheduler};
use serde::Serialize;
use tracing::{info, warn};

use super::{Cli, Commands};

/// One result record for `--json` output.
#[derive(Serialize)]
struct ResultRecord {
    slot: usize,
    /// Base-10 rendering; lossless for arbitrary magnitudes.
    value: String,
    digits: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    factor_count: Option<u64>,
}

pub fn run_search(cli: &Cli) -> Result<()> {
    let mode = match cli.command {
        Commands::Prime => Mode::Prime,
        Commands::Odd => Mode::OddWithFactors,
    };
    let config = SearchConfig::new(cli.bits, mode, cli.count)?.with_mr_rounds(cli.mr_rounds);

    let progress = progress::Progress::new();
    let reporter_handle = progress.start_reporter();

    let result = scheduler::run_with_progress(&config, &progress);

    progress.stop();
    let _ = reporter_handle.join();
    progress.log_status();

    let results = result?;
    let elapsed = progress.elapsed();
    info!(
        found = results.len(),
        elapsed = format_args!("{:.2}s", elapsed.as_secs_f64()),
        "search finished"
    );

    if cli.json {
        print_json(&results)
    } else {
        print_text(&results);
        Ok(())
    }
}

fn print_text(results: &[SearchResult]) {
    for r in results {
        match r.factor_count {
            Some(count) => println!(
                "{:>4}: {} ({} digits, {} divisors)",
                r.slot,
                r.value,
                exact_digits(&r.value),
                count
            ),
            None => println!(
                "{:>4}: {} ({} digits, probable prime)",
                r.slot,
                r.value,
                exact_digits(&r.value)
            ),
        }
    }
}

fn print_json(results: &[SearchResult]) -> Result<()> {
    let records: Vec<ResultRecord> = results
        .iter()
        .map(|r| ResultRecord {
            slot: r.slot,
            value: r.value.to_string(),
            digits: exact_digits(&r.value),
            factor_count: r.factor_count,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Size the global rayon pool. 0 or absent means all logical cores.
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(()) => info!(threads = rayon::current_num_threads(), "rayon pool ready"),
        Err(e) => warn!(error = %e, "could not configure rayon thread pool"),
    }
}
