//! Monte Carlo estimate of π from seeded points in the unit square.

use super::{WorkloadOutcome, seeded_rng};
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use rand::Rng;
use std::f64::consts::PI;

const SEED: u64 = 0x5049_4d43;

/// Six standard deviations of the estimator, times √n.
/// σ = 4·√(p(1−p)/n) with p = π/4.
const SIX_SIGMA_SQRT_N: f64 = 9.85;

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let samples = params.monte_carlo_samples;
    let mut rng = seeded_rng(SEED);

    let mut inside = 0u64;
    for _ in 0..samples {
        let x: f64 = rng.random();
        let y: f64 = rng.random();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }

    let estimate = 4.0 * inside as f64 / samples as f64;
    let error = (estimate - PI).abs();

    let metrics = MetricsBuilder::new()
        .with("samples", samples)
        .with("inside_circle", inside)
        .with("pi_estimate", estimate)
        .with("absolute_error", error)
        .build();

    Ok(WorkloadOutcome {
        operations: samples,
        is_valid: within_tolerance(error, samples),
        metrics,
    })
}

pub fn tolerance(samples: u64) -> f64 {
    SIX_SIGMA_SQRT_N / (samples as f64).sqrt()
}

fn within_tolerance(error: f64, samples: u64) -> bool {
    samples > 0 && error.is_finite() && error <= tolerance(samples)
}
