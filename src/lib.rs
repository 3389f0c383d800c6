//! # Keyforge — Concurrent Random Probable-Prime Search
//!
//! Draws uniformly random fixed-bit-length integers from the OS CSPRNG and
//! reports the first N that qualify: probable primes (Miller–Rabin) or odd
//! values annotated with their divisor count. This is the inner loop of
//! key-material generation — cheap sampling, expensive filtering — run across
//! a Rayon worker pool with dense, gapless result ordering and early stop.
//!
//! ## Module Map
//!
//! - [`config`]: validated search parameters (bit length, mode, target count).
//! - [`sampler`]: CSPRNG big-integer sampling and Miller–Rabin witness draws.
//! - [`primality`]: probabilistic compositeness test.
//! - [`factors`]: exact divisor count by trial division (odd mode only).
//! - [`slots`]: the serialized slot allocator — the engine's one critical section.
//! - [`scheduler`]: the worker pool driving sample → filter → allocate.
//! - [`progress`]: atomic counters and the background status reporter.

pub mod config;
pub mod factors;
pub mod primality;
pub mod progress;
pub mod sampler;
pub mod scheduler;
pub mod slots;

use rug::Integer;

/// Small primes for trial division pre-filter.
const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311,
];

/// Quick check if n is divisible by any small prime.
/// Returns true if n is definitely composite (has a small factor).
/// Returns false if n might be prime (passed trial division).
pub fn has_small_factor(n: &Integer) -> bool {
    for &p in &SMALL_PRIMES {
        if n.is_divisible_u(p) {
            // If n equals the small prime itself, it's prime, not composite
            return n > &Integer::from(p);
        }
    }
    false
}

/// Exact decimal digit count, used when reporting found values.
pub fn exact_digits(n: &Integer) -> u64 {
    n.to_string_radix(10).len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_small_factor_returns_false_for_small_primes() {
        for &p in &SMALL_PRIMES {
            let n = Integer::from(p);
            assert!(
                !has_small_factor(&n),
                "has_small_factor incorrectly flagged prime {} as composite",
                p
            );
        }
    }

    #[test]
    fn has_small_factor_returns_true_for_composites() {
        let composites: &[u32] = &[4, 6, 8, 9, 10, 12, 15, 21, 25, 35, 49, 100, 1000];
        for &c in composites {
            let n = Integer::from(c);
            assert!(
                has_small_factor(&n),
                "has_small_factor missed composite {}",
                c
            );
        }
    }

    #[test]
    fn has_small_factor_false_for_primes_above_table() {
        let large_primes: &[u32] = &[313, 317, 331, 337, 347, 349, 353, 359, 367, 373];
        for &p in large_primes {
            let n = Integer::from(p);
            assert!(
                !has_small_factor(&n),
                "has_small_factor incorrectly flagged prime {} as composite",
                p
            );
        }
    }

    #[test]
    fn has_small_factor_composite_product_of_large_primes() {
        // 313 * 317 = 99221 — both factors are outside the small primes table
        let n = Integer::from(313u32 * 317);
        assert!(
            !has_small_factor(&n),
            "has_small_factor should miss composites with only large factors"
        );
    }

    #[test]
    fn exact_digits_known_values() {
        assert_eq!(exact_digits(&Integer::from(0u32)), 1);
        assert_eq!(exact_digits(&Integer::from(9u32)), 1);
        assert_eq!(exact_digits(&Integer::from(10u32)), 2);
        assert_eq!(exact_digits(&Integer::from(999u32)), 3);
        assert_eq!(exact_digits(&Integer::from(1000u32)), 4);
    }
}
