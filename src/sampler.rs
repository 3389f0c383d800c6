//! # Sampler — CSPRNG Big-Integer Candidates
//!
//! Draws fixed-byte-length magnitudes from the operating system's secure
//! entropy source (`OsRng`). Each worker owns its own `Sampler`, so there is
//! no shared RNG state to synchronize. Entropy unavailability is an
//! environment fault: it propagates as a fatal error, never retried.
//!
//! Also provides the uniform witness draw for Miller–Rabin, so the test uses
//! the same secure source as candidate sampling.

use anyhow::{Context, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use rug::integer::Order;
use rug::Integer;

/// Cryptographically-secure candidate source. Cheap to construct; `OsRng` is
/// a zero-sized handle to the OS entropy facility.
#[derive(Debug)]
pub struct Sampler {
    rng: OsRng,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        Sampler { rng: OsRng }
    }

    /// Fill a buffer from the OS entropy source.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.rng
            .try_fill_bytes(buf)
            .context("secure entropy source unavailable")
    }

    /// Draw exactly `byte_length` random bytes and interpret them big-endian
    /// as a non-negative magnitude. Sampled bytes are never reused.
    pub fn sample(&mut self, byte_length: usize) -> Result<Integer> {
        let mut buf = vec![0u8; byte_length];
        self.fill(&mut buf)?;
        Ok(Integer::from_digits(&buf, Order::Msf))
    }

    /// Draw a Miller–Rabin witness uniformly from [2, n-2].
    ///
    /// Rejection sampling over exactly `significant_bits(n-2)` random bits:
    /// each draw lands in [0, 2^bits) and is accepted iff it falls in range,
    /// so accepted values are uniform. n must be odd and >= 5.
    pub fn witness(&mut self, n: &Integer) -> Result<Integer> {
        let upper = Integer::from(n - 2u32);
        debug_assert!(upper >= 3u32, "witness range requires n >= 5");
        let bits = upper.significant_bits();
        let byte_len = bits.div_ceil(8) as usize;
        let excess = (byte_len as u32) * 8 - bits;
        let mut buf = vec![0u8; byte_len];
        loop {
            self.fill(&mut buf)?;
            let mut a = Integer::from_digits(&buf, Order::Msf);
            a >>= excess;
            if a >= 2u32 && a <= upper {
                return Ok(a);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_respects_bit_bound() {
        let mut s = Sampler::new();
        for _ in 0..50 {
            let v = s.sample(4).unwrap();
            assert!(v.significant_bits() <= 32, "4-byte sample exceeded 32 bits");
        }
    }

    #[test]
    fn sample_larger_sizes() {
        let mut s = Sampler::new();
        for bytes in [8usize, 16, 32, 256] {
            let v = s.sample(bytes).unwrap();
            assert!(v.significant_bits() as usize <= bytes * 8);
            assert!(v >= 0u32);
        }
    }

    #[test]
    fn samples_are_not_constant() {
        // 10 draws of 16 bytes colliding would mean the entropy source is broken
        let mut s = Sampler::new();
        let first = s.sample(16).unwrap();
        let all_equal = (0..9).all(|_| s.sample(16).unwrap() == first);
        assert!(!all_equal, "repeated 128-bit samples were identical");
    }

    #[test]
    fn witness_stays_in_range() {
        let mut s = Sampler::new();
        for n in [5u32, 7, 23, 97, 65537] {
            let n = Integer::from(n);
            let upper = Integer::from(&n - 2u32);
            for _ in 0..100 {
                let a = s.witness(&n).unwrap();
                assert!(a >= 2u32, "witness below 2 for n={}", n);
                assert!(a <= upper, "witness above n-2 for n={}", n);
            }
        }
    }

    #[test]
    fn witness_covers_smallest_range() {
        // n=5 admits only witnesses 2 and 3; both must eventually appear
        let mut s = Sampler::new();
        let n = Integer::from(5u32);
        let mut seen = [false; 2];
        for _ in 0..200 {
            let a = s.witness(&n).unwrap().to_u32().unwrap();
            seen[(a - 2) as usize] = true;
        }
        assert!(seen[0] && seen[1], "witness draw for n=5 missed 2 or 3");
    }
}
