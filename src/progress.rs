//! # Progress — Atomic Search Progress Counters
//!
//! Thread-safe counters shared between the worker pool and the background
//! status reporter: candidates tested, qualifying values found, and
//! qualifying values discarded because the target had already filled.
//! Lock-free atomics with Relaxed ordering — these are monotonic statistics,
//! not coordination state (the allocator owns coordination).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

const REPORT_INTERVAL: Duration = Duration::from_secs(10);

pub struct Progress {
    pub tested: AtomicU64,
    pub found: AtomicU64,
    pub discarded: AtomicU64,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    pub fn new() -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Spawn the background reporter: logs a status line every 10 seconds
    /// until `stop()` is called.
    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(REPORT_INTERVAL);
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.log_status();
        })
    }

    pub fn log_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let discarded = self.discarded.load(Ordering::Relaxed);
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        info!(
            tested,
            found,
            discarded,
            rate = format_args!("{:.0}/s", rate),
            elapsed = format_args!("{:.1}s", elapsed.as_secs_f64()),
            "search progress"
        );
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
