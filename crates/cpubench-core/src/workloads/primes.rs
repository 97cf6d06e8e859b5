//! Prime generation: sieve of Eratosthenes up to `prime_range`.

use super::{WorkloadOutcome, try_filled};
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;

const NAME: &str = "prime_generation";

/// π(10^k) for the ranges where the exact count is known.
const KNOWN_COUNTS: &[(u64, u64)] = &[
    (10, 4),
    (100, 25),
    (1_000, 168),
    (10_000, 1_229),
    (100_000, 9_592),
    (1_000_000, 78_498),
    (10_000_000, 664_579),
    (100_000_000, 5_761_455),
];

/// Primes re-checked by trial division after the sieve.
const SAMPLE_SIZE: usize = 1_000;

/// Prefix that is recounted independently by trial division.
const TRIAL_PREFIX: u64 = 10_000;

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let limit = params.prime_range;
    let primes = sieve(limit)?;
    let count = primes.len() as u64;

    let is_valid = known_count_matches(limit, count)
        && sampled_primes_are_prime(&primes)
        && prefix_count_matches(&primes, limit);

    let metrics = MetricsBuilder::new()
        .with("range", limit)
        .with("primes_found", count)
        .with("largest_prime", primes.last().copied().unwrap_or(0))
        .build();

    Ok(WorkloadOutcome {
        operations: limit,
        is_valid,
        metrics,
    })
}

/// All primes `<= limit`, ascending.
fn sieve(limit: u64) -> BenchResult<Vec<u64>> {
    let n = limit as usize;
    let mut composite = try_filled(NAME, n + 1, false)?;
    let mut primes = Vec::new();

    let mut i = 2usize;
    while i * i <= n {
        if !composite[i] {
            let mut j = i * i;
            while j <= n {
                composite[j] = true;
                j += i;
            }
        }
        i += 1;
    }

    for (value, is_composite) in composite.iter().enumerate().skip(2) {
        if !is_composite {
            primes.push(value as u64);
        }
    }
    Ok(primes)
}

/// Deterministic 6k±1 trial division.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

fn known_count_matches(limit: u64, count: u64) -> bool {
    KNOWN_COUNTS
        .iter()
        .find(|(range, _)| *range == limit)
        .is_none_or(|(_, expected)| *expected == count)
}

fn sampled_primes_are_prime(primes: &[u64]) -> bool {
    if primes.is_empty() {
        return false;
    }
    let step = (primes.len() / SAMPLE_SIZE).max(1);
    primes.iter().step_by(step).all(|&p| is_prime(p))
        && primes.last().is_some_and(|&p| is_prime(p))
}

fn prefix_count_matches(primes: &[u64], limit: u64) -> bool {
    let bound = limit.min(TRIAL_PREFIX);
    let expected = (2..=bound).filter(|&n| is_prime(n)).count();
    let found = primes.iter().take_while(|&&p| p <= bound).count();
    expected == found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{BenchmarkParams, DeviceTier};

    fn params(range: u64) -> BenchmarkParams {
        BenchmarkParams {
            prime_range: range,
            ..BenchmarkParams::for_tier(DeviceTier::Slow)
        }
    }

    #[test]
    fn test_sieve_small_ranges() {
        assert_eq!(sieve(2).unwrap(), vec![2]);
        assert_eq!(sieve(30).unwrap(), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_known_range_is_valid() {
        let outcome = run(&params(1_000)).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.metrics["primes_found"].as_i64(), Some(168));
        assert_eq!(outcome.metrics["largest_prime"].as_i64(), Some(997));
        assert_eq!(outcome.operations, 1_000);
    }

    #[test]
    fn test_range_outside_table_is_still_checked() {
        let outcome = run(&params(12_345)).unwrap();
        assert!(outcome.is_valid);
    }

    #[test]
    fn test_wrong_count_is_detected() {
        assert!(!known_count_matches(1_000, 167));
        assert!(known_count_matches(1_001, 1));
    }

    #[test]
    fn test_composite_sample_is_detected() {
        assert!(!sampled_primes_are_prime(&[2, 3, 4]));
        assert!(!sampled_primes_are_prime(&[]));
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..20).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert!(is_prime(999_983));
        assert!(!is_prime(999_981));
    }
}
