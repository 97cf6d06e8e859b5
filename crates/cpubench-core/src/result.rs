//! Result records produced by the runners.

use crate::config::SuiteConfig;
use crate::metrics::{MetricValue, Metrics};
use crate::params::BenchmarkParams;
use serde::{Deserialize, Serialize};

/// Outcome of one benchmark entry (a single run, or the aggregate of a
/// suite's rounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Catalog name
    pub name: String,
    /// Wall-clock time, never negative
    pub execution_time_ms: f64,
    /// Workload operations per second; 0 when `execution_time_ms` is 0
    pub ops_per_second: f64,
    /// Whether the workload's self-check passed
    pub is_valid: bool,
    pub metrics: Metrics,
}

impl BenchmarkResult {
    /// Key of the text metric describing a fault.
    pub const FAULT_METRIC: &'static str = "fault";

    /// Sentinel record for an entry that produced no measurement.
    pub fn faulted(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut metrics = Metrics::new();
        metrics.insert(
            Self::FAULT_METRIC.to_string(),
            MetricValue::Text(reason.into()),
        );
        Self {
            name: name.into(),
            execution_time_ms: 0.0,
            ops_per_second: 0.0,
            is_valid: false,
            metrics,
        }
    }

    /// Fault description, if any round of this entry faulted.
    pub fn fault(&self) -> Option<&str> {
        self.metrics
            .get(Self::FAULT_METRIC)
            .and_then(MetricValue::as_str)
    }
}

/// Output of a full suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    /// One entry per catalog workload, in declaration order
    pub results: Vec<BenchmarkResult>,
    /// Elapsed time of the whole run, warmup included
    pub total_time_ms: f64,
    /// Geometric mean of ops/second over valid entries
    pub cpu_score: f64,
    pub config: SuiteConfig,
    /// Parameters every round ran with
    pub params: BenchmarkParams,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl SuiteResult {
    pub fn get(&self, name: &str) -> Option<&BenchmarkResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn all_valid(&self) -> bool {
        self.results.iter().all(|r| r.is_valid)
    }

    pub fn valid_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_valid).count()
    }
}

/// Geometric mean of `ops_per_second` over valid results with positive
/// throughput; 0 when there are none.
pub fn cpu_score(results: &[BenchmarkResult]) -> f64 {
    let logs: Vec<f64> = results
        .iter()
        .filter(|r| r.is_valid && r.ops_per_second > 0.0 && r.ops_per_second.is_finite())
        .map(|r| r.ops_per_second.ln())
        .collect();
    if logs.is_empty() {
        return 0.0;
    }
    (logs.iter().sum::<f64>() / logs.len() as f64).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ops: f64, is_valid: bool) -> BenchmarkResult {
        BenchmarkResult {
            name: "x".to_string(),
            execution_time_ms: 1.0,
            ops_per_second: ops,
            is_valid,
            metrics: Metrics::new(),
        }
    }

    #[test]
    fn test_faulted_sentinel() {
        let r = BenchmarkResult::faulted("matrix_multiplication", "allocation failed");
        assert_eq!(r.execution_time_ms, 0.0);
        assert_eq!(r.ops_per_second, 0.0);
        assert!(!r.is_valid);
        assert_eq!(r.fault(), Some("allocation failed"));
    }

    #[test]
    fn test_cpu_score_is_geometric_mean() {
        let score = cpu_score(&[result(100.0, true), result(10_000.0, true)]);
        assert!((score - 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_cpu_score_skips_invalid_and_zero() {
        let score = cpu_score(&[result(100.0, true), result(1e9, false), result(0.0, true)]);
        assert!((score - 100.0).abs() < 1e-9);
        assert_eq!(cpu_score(&[]), 0.0);
        assert_eq!(cpu_score(&[result(5.0, false)]), 0.0);
    }
}
