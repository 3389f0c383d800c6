//! # Config — Validated Search Parameters
//!
//! A `SearchConfig` is built once per invocation and rejected up front if
//! invalid — no search ever starts with a bad bit length or target count.
//! Immutable for the duration of one search.

use anyhow::{bail, Result};
use serde::Serialize;

/// Minimum candidate size. Anything smaller is not worth sampling.
pub const MIN_BIT_LENGTH: u32 = 32;

/// Default Miller–Rabin rounds: false-positive probability <= 4^-10.
pub const DEFAULT_MR_ROUNDS: u32 = 10;

/// What qualifies a sampled candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Report candidates that pass the probabilistic primality test.
    Prime,
    /// Report odd candidates, annotated with their exact divisor count.
    OddWithFactors,
}

/// Parameters for one search run.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Candidate size in bits. Must be >= 32 and a multiple of 8.
    pub bit_length: u32,
    pub mode: Mode,
    /// How many qualifying values to report. Must be >= 1.
    pub target_count: usize,
    /// Miller–Rabin rounds per candidate (Prime mode only).
    pub mr_rounds: u32,
}

impl SearchConfig {
    /// Validate and build a config. Rejects bad parameters before any
    /// search starts — this is the only place configuration errors surface.
    pub fn new(bit_length: u32, mode: Mode, target_count: usize) -> Result<Self> {
        if bit_length < MIN_BIT_LENGTH {
            bail!(
                "bit length {} is below the minimum of {}",
                bit_length,
                MIN_BIT_LENGTH
            );
        }
        if bit_length % 8 != 0 {
            bail!("bit length {} is not a multiple of 8", bit_length);
        }
        if target_count < 1 {
            bail!("target count must be at least 1");
        }
        Ok(SearchConfig {
            bit_length,
            mode,
            target_count,
            mr_rounds: DEFAULT_MR_ROUNDS,
        })
    }

    /// Override the Miller–Rabin round count (higher = more certain, slower).
    pub fn with_mr_rounds(mut self, rounds: u32) -> Self {
        self.mr_rounds = rounds;
        self
    }

    /// Number of random bytes drawn per candidate.
    pub fn byte_length(&self) -> usize {
        (self.bit_length / 8) as usize
    }
}
