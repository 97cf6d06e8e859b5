//! # cpubench
//!
//! Single-core CPU benchmark suite with a stable C ABI.
//!
//! This facade re-exports the engine ([`cpubench_core`]) and the C boundary
//! ([`cpu_benchmark`]) so integration tests and Rust embedders need a single
//! dependency.

pub use cpu_benchmark as ffi;
pub use cpubench_core as engine;

pub use cpubench_core::{
    BenchError, BenchResult, BenchmarkParams, BenchmarkResult, DeviceTier, MetricValue, Metrics,
    ParamOverrides, SuiteConfig, SuiteResult, Workload, decode_result, decode_suite,
    decode_suite_report, encode_result, encode_suite, encode_suite_report, run_benchmark,
    run_once, run_suite,
};
