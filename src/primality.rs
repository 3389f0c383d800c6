//! # Primality — Miller–Rabin Probabilistic Compositeness Test
//!
//! Classic Miller–Rabin with uniformly random witnesses drawn from the same
//! secure source as candidate sampling. A candidate passing `rounds` rounds is
//! a probable prime with false-positive probability <= 4^-rounds; the default
//! of 10 rounds (~9.5e-7) is fine for search output, not for final key
//! acceptance.
//!
//! The squaring loop returns composite immediately when x hits 1 before n-1:
//! that x is a nontrivial square root of unity, a strictly stronger composite
//! witness than merely exhausting the loop.

use anyhow::Result;
use rug::Integer;

use crate::has_small_factor;
use crate::sampler::Sampler;

/// Miller–Rabin probable-prime test with `rounds` random witnesses.
///
/// Errors only if the witness draw hits entropy exhaustion; the verdict
/// itself is a pure function of `n` and the witnesses drawn.
pub fn is_probably_prime(n: &Integer, rounds: u32, sampler: &mut Sampler) -> Result<bool> {
    if *n == 2u32 || *n == 3u32 {
        return Ok(true);
    }
    if *n <= 1u32 || n.is_even() {
        return Ok(false);
    }

    // Write n-1 = d * 2^r with d odd, r >= 1.
    let n_minus_1 = Integer::from(n - 1u32);
    let r = n_minus_1.find_one(0).unwrap_or(0);
    let d = Integer::from(&n_minus_1 >> r);

    'rounds: for _ in 0..rounds {
        let a = sampler.witness(n)?;
        let mut x = match a.pow_mod(&d, n) {
            Ok(x) => x,
            // d >= 1, so pow_mod cannot fail
            Err(_) => unreachable!("pow_mod with positive exponent"),
        };
        if x == 1u32 || x == n_minus_1 {
            continue;
        }
        for _ in 0..r.saturating_sub(1) {
            x.square_mut();
            x %= n;
            if x == n_minus_1 {
                continue 'rounds;
            }
            if x == 1u32 {
                // Nontrivial square root of unity: definitely composite
                return Ok(false);
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// Trial-division screened test: reject candidates with a small prime factor
/// before paying for full Miller–Rabin. Verdicts are identical to
/// [`is_probably_prime`]; the screen is exact, never probabilistic.
pub fn screened_probable_prime(n: &Integer, rounds: u32, sampler: &mut Sampler) -> Result<bool> {
    if has_small_factor(n) {
        return Ok(false);
    }
    is_probably_prime(n, rounds, sampler)
}
