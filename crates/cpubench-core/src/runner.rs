//! Single-Benchmark Runner
//!
//! Times one execution of one catalog workload and packages the outcome.
//! A panic inside a workload is caught here and reported as a fault for
//! that execution only.

use crate::catalog::Workload;
use crate::error::{BenchError, BenchResult};
use crate::params::BenchmarkParams;
use crate::result::BenchmarkResult;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Execute `workload` once with `params`.
///
/// Correctness failures come back as `Ok` with `is_valid = false`; faults
/// (returned or panicked) come back as [`BenchError::WorkloadFault`].
pub fn run_once(workload: Workload, params: &BenchmarkParams) -> BenchResult<BenchmarkResult> {
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| workload.execute(params)));
    let elapsed = start.elapsed();

    let outcome = match outcome {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => {
            tracing::warn!(benchmark = %workload, error = %e, "Workload faulted");
            return Err(into_fault(workload, e));
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!(benchmark = %workload, reason = %reason, "Workload panicked");
            return Err(BenchError::fault(workload.name(), format!("panicked: {}", reason)));
        }
    };

    let execution_time_ms = elapsed.as_secs_f64() * 1000.0;
    let ops_per_second = ops_per_second(outcome.operations, elapsed.as_secs_f64());

    if !outcome.is_valid {
        tracing::warn!(benchmark = %workload, "Workload self-check failed");
    }
    tracing::debug!(
        benchmark = %workload,
        time_ms = execution_time_ms,
        ops_per_second,
        is_valid = outcome.is_valid,
        "Workload finished"
    );

    Ok(BenchmarkResult {
        name: workload.name().to_string(),
        execution_time_ms,
        ops_per_second,
        is_valid: outcome.is_valid,
        metrics: outcome.metrics,
    })
}

/// Throughput in operations per second; 0 for a zero-length interval.
pub fn ops_per_second(operations: u64, seconds: f64) -> f64 {
    if seconds > 0.0 && seconds.is_finite() {
        operations as f64 / seconds
    } else {
        0.0
    }
}

fn into_fault(workload: Workload, error: BenchError) -> BenchError {
    match error {
        fault @ BenchError::WorkloadFault { .. } => fault,
        other => BenchError::fault(workload.name(), other.to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    fn small_params() -> BenchmarkParams {
        BenchmarkParams {
            prime_range: 10_000,
            fibonacci_n_range: (10, 15),
            matrix_size: 8,
            nqueens_size: 6,
            ..BenchmarkParams::for_tier(DeviceTier::Slow)
        }
    }

    #[test]
    fn test_run_once_produces_valid_result() {
        let result = run_once(Workload::PrimeGeneration, &small_params()).unwrap();
        assert_eq!(result.name, "prime_generation");
        assert!(result.is_valid);
        assert!(result.execution_time_ms >= 0.0);
        assert!(result.ops_per_second >= 0.0);
    }

    #[test]
    fn test_fibonacci_metrics_flow_through() {
        let result = run_once(Workload::FibonacciRecursive, &small_params()).unwrap();
        assert_eq!(result.metrics["values_computed"].as_i64(), Some(6));
    }

    #[test]
    fn test_zero_interval_has_zero_throughput() {
        assert_eq!(ops_per_second(1_000, 0.0), 0.0);
        assert_eq!(ops_per_second(1_000, 2.0), 500.0);
        assert_eq!(ops_per_second(0, 1.0), 0.0);
    }

    #[test]
    fn test_returned_fault_is_err() {
        let params = BenchmarkParams {
            nqueens_size: 0,
            ..small_params()
        };
        let err = run_once(Workload::Nqueens, &params).unwrap_err();
        assert!(matches!(err, BenchError::WorkloadFault { ref benchmark, .. } if benchmark == "nqueens"));
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
