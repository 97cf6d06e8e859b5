//! Naive recursive Fibonacci over an inclusive index range.

use super::WorkloadOutcome;
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use std::hint::black_box;

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let (lo, hi) = params.fibonacci_n_range;

    let mut is_valid = true;
    let mut last_value = 0u64;
    let mut calls: u128 = 0;

    for n in lo..=hi {
        let value = fib_recursive(black_box(n));
        if value != fib_iterative(n) {
            is_valid = false;
        }
        calls += recursive_calls(n);
        last_value = value;
    }

    let metrics = MetricsBuilder::new()
        .with("values_computed", u64::from(hi - lo + 1))
        .with("n_start", lo)
        .with("n_end", hi)
        .with("last_value", last_value)
        .build();

    Ok(WorkloadOutcome {
        operations: u64::try_from(calls).unwrap_or(u64::MAX),
        is_valid,
        metrics,
    })
}

fn fib_recursive(n: u32) -> u64 {
    if n < 2 {
        return u64::from(n);
    }
    fib_recursive(n - 1).wrapping_add(fib_recursive(n - 2))
}

/// Reference value, O(n).
pub fn fib_iterative(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    a
}

/// Calls made by `fib_recursive(n)`: 2·fib(n+1) − 1.
fn recursive_calls(n: u32) -> u128 {
    let (mut a, mut b) = (0u128, 1u128);
    for _ in 0..=n {
        let next = a + b;
        a = b;
        b = next;
    }
    2 * a - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    fn params(lo: u32, hi: u32) -> BenchmarkParams {
        BenchmarkParams {
            fibonacci_n_range: (lo, hi),
            ..BenchmarkParams::for_tier(DeviceTier::Slow)
        }
    }

    #[test]
    fn test_reference_values() {
        let first: Vec<u64> = (0..10).map(fib_iterative).collect();
        assert_eq!(first, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
        assert_eq!(fib_iterative(92), 7_540_113_804_746_346_429);
    }

    #[test]
    fn test_call_count_formula() {
        assert_eq!(recursive_calls(0), 1);
        assert_eq!(recursive_calls(1), 1);
        assert_eq!(recursive_calls(2), 3);
        assert_eq!(recursive_calls(5), 15);
    }

    #[test]
    fn test_range_reports_values_computed() {
        let outcome = run(&params(10, 15)).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.metrics["values_computed"].as_i64(), Some(6));
        assert_eq!(outcome.metrics["last_value"].as_i64(), Some(610));
        assert_eq!(outcome.metrics["n_start"].as_i64(), Some(10));
    }

    #[test]
    fn test_single_index_range() {
        let outcome = run(&params(0, 0)).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.metrics["values_computed"].as_i64(), Some(1));
        assert_eq!(outcome.operations, 1);
    }
}
