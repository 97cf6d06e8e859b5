//! Suite Runner
//!
//! Resolves parameters once, warms every entry up, runs every entry for the
//! configured number of rounds and folds the rounds into one result per
//! entry. A fault in one round never stops the suite: partial results are
//! always returned.
//!
//! Aggregation policy per entry:
//!
//! - time and ops/second are the means over rounds that did not fault
//! - `is_valid` is the AND over all rounds; a faulted round counts as invalid
//! - metrics come from the last round that did not fault, with a `fault`
//!   text metric added when any round faulted
//! - an entry whose every round faulted is the [`BenchmarkResult::faulted`]
//!   sentinel

use crate::catalog::Workload;
use crate::config::SuiteConfig;
use crate::error::BenchResult;
use crate::metrics::MetricValue;
use crate::params::BenchmarkParams;
use crate::result::{self, BenchmarkResult, SuiteResult};
use crate::runner;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run the full catalog under `config`.
///
/// Fails only when the configuration's parameter overrides are malformed;
/// nothing runs in that case.
pub fn run_suite(config: &SuiteConfig) -> BenchResult<SuiteResult> {
    let params = config.resolve_params()?;
    Ok(run_suite_with(config, params, runner::run_once))
}

/// Same as [`run_suite`] with already-resolved parameters and a pluggable
/// single-run executor.
pub fn run_suite_with<F>(config: &SuiteConfig, params: BenchmarkParams, mut execute: F) -> SuiteResult
where
    F: FnMut(Workload, &BenchmarkParams) -> BenchResult<BenchmarkResult>,
{
    let started_at = chrono::Utc::now();
    let start = Instant::now();
    let warmup_rounds = config.effective_warmup_rounds();
    let _span = tracing::info_span!("benchmark_suite", device_tier = %config.device_tier).entered();

    info!(
        iterations = config.iterations,
        warmup_rounds,
        device_tier = %config.device_tier,
        "Starting benchmark suite"
    );

    for workload in Workload::all() {
        for round in 0..warmup_rounds {
            if let Err(e) = execute(*workload, &params) {
                debug!(benchmark = %workload, round, error = %e, "Warmup round faulted");
            }
        }
    }

    let mut rounds: Vec<Vec<BenchResult<BenchmarkResult>>> = Workload::all()
        .iter()
        .map(|_| Vec::with_capacity(config.iterations as usize))
        .collect();

    for iteration in 0..config.iterations {
        debug!(iteration, "Running measured round");
        for (workload, entry_rounds) in Workload::all().iter().zip(rounds.iter_mut()) {
            entry_rounds.push(execute(*workload, &params));
        }
    }

    let results: Vec<BenchmarkResult> = Workload::all()
        .iter()
        .zip(rounds)
        .map(|(workload, entry_rounds)| aggregate(workload.name(), entry_rounds))
        .collect();

    let cpu_score = result::cpu_score(&results);
    let total_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let valid = results.iter().filter(|r| r.is_valid).count();
    if valid < results.len() {
        warn!(valid, total = results.len(), "Suite finished with invalid entries");
    }
    info!(total_time_ms, cpu_score, valid, "Benchmark suite finished");

    SuiteResult {
        results,
        total_time_ms,
        cpu_score,
        config: config.clone(),
        params,
        started_at,
    }
}

/// Fold the measured rounds of one entry into a single result.
pub fn aggregate(name: &str, rounds: Vec<BenchResult<BenchmarkResult>>) -> BenchmarkResult {
    let mut completed = Vec::with_capacity(rounds.len());
    let mut faults = Vec::new();
    for round in rounds {
        match round {
            Ok(result) => completed.push(result),
            Err(e) => faults.push(e.to_string()),
        }
    }

    let Some(last) = completed.last() else {
        let reason = faults
            .last()
            .cloned()
            .unwrap_or_else(|| "no rounds were run".to_string());
        return BenchmarkResult::faulted(name, reason);
    };

    let n = completed.len() as f64;
    let execution_time_ms = completed.iter().map(|r| r.execution_time_ms).sum::<f64>() / n;
    let ops_per_second = if execution_time_ms > 0.0 {
        completed.iter().map(|r| r.ops_per_second).sum::<f64>() / n
    } else {
        0.0
    };

    let mut metrics = last.metrics.clone();
    if let Some(reason) = faults.last() {
        let total = faults.len() + completed.len();
        metrics.insert(
            BenchmarkResult::FAULT_METRIC.to_string(),
            MetricValue::Text(format!(
                "{} of {} rounds faulted: {}",
                faults.len(),
                total,
                reason
            )),
        );
    }

    BenchmarkResult {
        name: name.to_string(),
        execution_time_ms,
        ops_per_second,
        is_valid: faults.is_empty() && completed.iter().all(|r| r.is_valid),
        metrics,
    }
}
