//! # Suite Integration Tests
//!
//! End-to-end runs of the catalog through the public engine API, using
//! small parameters so the whole suite finishes quickly.

use cpubench_core::{
    BenchmarkResult, DeviceTier, ParamOverrides, SuiteConfig, Workload, decode_suite,
    decode_suite_report, encode_suite, encode_suite_report, run_benchmark, run_suite,
};

fn small_params() -> ParamOverrides {
    ParamOverrides::from_json(
        r#"{
            "prime_range": 20000,
            "fibonacci_n_range": [10, 15],
            "matrix_size": 24,
            "hash_data_size_mb": 0.05,
            "string_count": 2000,
            "ray_tracing_resolution": [16, 12],
            "ray_tracing_depth": 2,
            "compression_data_size_mb": 0.05,
            "monte_carlo_samples": 20000,
            "json_data_size_mb": 0.02,
            "nqueens_size": 6
        }"#,
    )
    .unwrap()
}

fn small_config(iterations: u32) -> SuiteConfig {
    SuiteConfig::new(iterations, false, 0, DeviceTier::Slow)
        .unwrap()
        .with_params(small_params())
}

#[test]
fn test_suite_reports_every_workload_in_catalog_order() {
    let suite = run_suite(&small_config(1)).unwrap();

    let names: Vec<&str> = suite.results.iter().map(|r| r.name.as_str()).collect();
    let expected: Vec<&str> = Workload::all().iter().map(|w| w.name()).collect();
    assert_eq!(names, expected);

    for result in &suite.results {
        assert!(result.fault().is_none(), "{} faulted", result.name);
        assert!(result.is_valid, "{} failed its self-check", result.name);
        assert!(result.execution_time_ms >= 0.0);
        assert!(result.ops_per_second > 0.0, "{} reported no throughput", result.name);
    }
    assert!(suite.all_valid());
    assert!(suite.cpu_score > 0.0);
    assert!(suite.total_time_ms >= 0.0);
}

#[test]
fn test_repeated_runs_agree_on_validity_and_metrics() {
    let first = run_suite(&small_config(1)).unwrap();
    let second = run_suite(&small_config(2)).unwrap();

    for (a, b) in first.results.iter().zip(&second.results) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.is_valid, b.is_valid);
        // Inputs are seeded, so deterministic metrics match across runs.
        assert_eq!(a.metrics, b.metrics, "{} metrics differ", a.name);
    }
}

#[test]
fn test_suite_result_survives_encoding() {
    let suite = run_suite(&small_config(1)).unwrap();

    let json = encode_suite(&suite).unwrap();
    assert_eq!(decode_suite(&json).unwrap(), suite.results);

    let report = encode_suite_report(&suite).unwrap();
    assert_eq!(decode_suite_report(&report).unwrap(), suite);
}

#[test]
fn test_negative_iterations_are_malformed() {
    let err = SuiteConfig::from_json(r#"{"iterations": -1}"#).unwrap_err();
    assert!(err.is_malformed_input());
}

#[test]
fn test_bad_override_rejected_before_any_work() {
    let err = SuiteConfig::from_json(r#"{"params": {"matrix_size": 0}}"#).unwrap_err();
    assert!(err.is_malformed_input());
}

#[test]
fn test_fibonacci_range_counts_values() {
    let overrides = ParamOverrides::from_json(r#"{"fibonacci_n_range": [10, 15]}"#).unwrap();
    let result = run_benchmark(Workload::FibonacciRecursive, &overrides, DeviceTier::Mid).unwrap();

    assert!(result.is_valid);
    assert_eq!(result.metrics["values_computed"].as_i64(), Some(6));
    assert_eq!(result.metrics["last_value"].as_i64(), Some(610));
}

#[test]
fn test_default_prime_generation_is_valid() {
    let result = run_benchmark(
        Workload::PrimeGeneration,
        &ParamOverrides::default(),
        DeviceTier::Mid,
    )
    .unwrap();

    assert_eq!(result.name, "prime_generation");
    assert!(result.is_valid);
    assert!(result.ops_per_second > 0.0);
}

#[test]
fn test_nqueens_eight_finds_92() {
    let overrides = ParamOverrides::from_json(r#"{"nqueens_size": 8}"#).unwrap();
    let result = run_benchmark(Workload::Nqueens, &overrides, DeviceTier::Slow).unwrap();
    assert!(result.is_valid);
    assert_eq!(result.metrics["solutions"].as_i64(), Some(92));
}

#[test]
fn test_unknown_benchmark_name() {
    let err = "bogosort".parse::<Workload>().unwrap_err();
    assert!(err.is_malformed_input());
}

#[test]
fn test_faulted_sentinel_shape() {
    let sentinel = BenchmarkResult::faulted("compression", "out of memory");
    assert!(!sentinel.is_valid);
    assert_eq!(sentinel.execution_time_ms, 0.0);
    assert_eq!(sentinel.ops_per_second, 0.0);
    assert_eq!(sentinel.fault(), Some("out of memory"));
}

#[test]
fn test_facade_reexports_engine_and_ffi() {
    assert_eq!(cpubench_workspace::engine::catalog::names().len(), 10);
    assert_eq!(cpubench_workspace::ffi::cpu_benchmark_abi_version(), 1);
    assert_eq!(cpubench_workspace::Workload::all().len(), 10);
}
