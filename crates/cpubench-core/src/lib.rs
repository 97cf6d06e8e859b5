//! # cpubench Core
//!
//! Workload catalog, parameter model and suite runner for the cpubench
//! single-core CPU benchmark. This crate has no FFI; the C boundary lives in
//! `cpubench-ffi`.

pub mod catalog;
pub mod config;
pub mod encoding;
pub mod error;
pub mod metrics;
pub mod params;
pub mod result;
pub mod runner;
pub mod suite;
pub mod workloads;

pub use catalog::Workload;
pub use config::SuiteConfig;
pub use encoding::{
    decode_result, decode_suite, decode_suite_report, encode_metrics, encode_result, encode_suite,
    encode_suite_report, encode_suite_report_pretty,
};
pub use error::{BenchError, BenchResult};
pub use metrics::{MetricValue, Metrics, MetricsBuilder};
pub use params::{BenchmarkParams, DeviceTier, ParamLimits, ParamOverrides};
pub use result::{BenchmarkResult, SuiteResult, cpu_score};
pub use runner::run_once;
pub use suite::{run_suite, run_suite_with};
pub use workloads::WorkloadOutcome;

/// Resolve `overrides` against `tier` and run a single workload once.
pub fn run_benchmark(
    workload: Workload,
    overrides: &ParamOverrides,
    tier: DeviceTier,
) -> BenchResult<BenchmarkResult> {
    let params = params::resolve(overrides, tier)?;
    run_once(workload, &params)
}
