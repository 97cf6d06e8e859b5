//! Workload kernels.
//!
//! Each submodule implements one catalog entry as a plain function of the
//! resolved [`BenchmarkParams`](crate::params::BenchmarkParams). Kernels are
//! deterministic (fixed seeds) and check their own output; they never assume
//! success.

pub mod compression;
pub mod fibonacci;
pub mod hashing;
pub mod json;
pub mod matrix;
pub mod monte_carlo;
pub mod nqueens;
pub mod primes;
pub mod ray_tracing;
pub mod strings;

use crate::error::{BenchError, BenchResult};
use crate::metrics::Metrics;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// What a single execution of a workload reports back to the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadOutcome {
    /// Workload-defined unit count used for the ops/second figure
    pub operations: u64,
    /// Result of the workload's self-check
    pub is_valid: bool,
    pub metrics: Metrics,
}

/// Deterministic generator for workload inputs.
pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Allocate an empty vector with room for `len` elements, reporting
/// allocation failure as a workload fault instead of aborting.
pub(crate) fn try_with_capacity<T>(benchmark: &str, len: usize) -> BenchResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        BenchError::fault(
            benchmark,
            format!("could not allocate {} elements: {}", len, e),
        )
    })?;
    Ok(buffer)
}

/// Allocate a vector of `len` copies of `value`, fallibly.
pub(crate) fn try_filled<T: Clone>(benchmark: &str, len: usize, value: T) -> BenchResult<Vec<T>> {
    let mut buffer = try_with_capacity(benchmark, len)?;
    buffer.resize(len, value);
    Ok(buffer)
}
