//! # Scheduler — Bounded Concurrent Search
//!
//! Drives one worker per Rayon thread through the sample → filter → allocate
//! loop until the target fills. Workers process candidates in batches of 500,
//! re-checking the allocator's done latch between candidates, so at most one
//! partial batch per worker runs to waste after the last slot is claimed.
//!
//! The lifecycle is Running → Draining → Complete: done latching true stops
//! workers from starting new batches (Running → Draining), and the
//! `rayon::scope` join blocks until every in-flight batch has returned
//! (Draining → Complete). The driving thread sleeps in the join; there is no
//! polling loop anywhere.
//!
//! Work units are idempotent: a candidate has no effect outside the allocator,
//! so anything lost mid-batch is safely re-sampled.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rug::Integer;
use tracing::info;

use crate::config::{Mode, SearchConfig};
use crate::factors::factor_count;
use crate::primality::screened_probable_prime;
use crate::progress::Progress;
use crate::sampler::Sampler;
use crate::slots::{SearchResult, SlotAllocator};

/// Candidates per work unit.
pub const BATCH_SIZE: usize = 500;

/// Run a search to completion and return exactly `target_count` results,
/// ordered by slot. Blocks until the target fills.
pub fn run(config: &SearchConfig) -> Result<Vec<SearchResult>> {
    let progress = Progress::new();
    run_with_progress(config, &progress)
}

/// Same as [`run`], with caller-owned progress counters (the CLI attaches a
/// background reporter to them).
pub fn run_with_progress(
    config: &SearchConfig,
    progress: &Arc<Progress>,
) -> Result<Vec<SearchResult>> {
    let workers = rayon::current_num_threads();
    info!(
        workers,
        bits = config.bit_length,
        target = config.target_count,
        mode = ?config.mode,
        "search starting"
    );

    let allocator = SlotAllocator::new(config.target_count);
    let first_error: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    rayon::scope(|s| {
        for _ in 0..workers {
            s.spawn(|_| {
                if let Err(e) = worker_loop(config, &allocator, progress) {
                    // Fatal (entropy loss): stop issuing slots, keep the
                    // first error, let the remaining workers drain.
                    allocator.abort();
                    let mut captured = first_error.lock().unwrap();
                    if captured.is_none() {
                        *captured = Some(e);
                    }
                }
            });
        }
    });

    if let Some(e) = first_error.into_inner().unwrap() {
        return Err(e);
    }

    let results = allocator.into_results()?;
    info!(
        found = results.len(),
        tested = progress.tested.load(Ordering::Relaxed),
        discarded = progress.discarded.load(Ordering::Relaxed),
        "search complete"
    );
    Ok(results)
}

/// One worker: batches of sampling and filtering until the target fills.
fn worker_loop(config: &SearchConfig, allocator: &SlotAllocator, progress: &Progress) -> Result<()> {
    let mut sampler = Sampler::new();
    let byte_length = config.byte_length();

    while !allocator.is_done() {
        for _ in 0..BATCH_SIZE {
            if allocator.is_done() {
                return Ok(());
            }
            let candidate = sampler.sample(byte_length)?;
            progress.tested.fetch_add(1, Ordering::Relaxed);

            match config.mode {
                Mode::Prime => {
                    if screened_probable_prime(&candidate, config.mr_rounds, &mut sampler)? {
                        submit(allocator, progress, candidate, None);
                    }
                }
                Mode::OddWithFactors => {
                    // Zero is even, so this filter also guards factor_count's domain
                    if candidate.is_odd() {
                        let count = factor_count(&candidate)?;
                        submit(allocator, progress, candidate, Some(count));
                    }
                }
            }
        }
    }
    Ok(())
}

fn submit(allocator: &SlotAllocator, progress: &Progress, value: Integer, count: Option<u64>) {
    if allocator.try_allocate(value, count).is_some() {
        progress.found.fetch_add(1, Ordering::Relaxed);
    } else {
        progress.discarded.fetch_add(1, Ordering::Relaxed);
    }
}
