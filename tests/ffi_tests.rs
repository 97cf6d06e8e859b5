//! # C ABI Integration Tests
//!
//! Drive the exported `extern "C"` functions the way a foreign caller
//! would: NUL-terminated strings in, owned pointers out, every pointer
//! released through its matching `free_*` function.

use cpu_benchmark::*;
use std::ffi::{CStr, CString};
use std::ptr;

/// Copy a library string and release it.
fn take_string(ptr: *mut std::ffi::c_char) -> String {
    assert!(!ptr.is_null(), "expected a string, got null");
    let text = unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .expect("library strings are UTF-8")
        .to_string();
    unsafe { free_c_string(ptr) };
    text
}

#[test]
fn test_abi_version() {
    assert_eq!(cpu_benchmark_abi_version(), 1);
}

#[test]
fn test_list_benchmarks_in_catalog_order() {
    let names: Vec<String> = serde_json::from_str(&take_string(list_benchmarks())).unwrap();
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "prime_generation");
    assert_eq!(names[9], "nqueens");
}

#[test]
fn test_default_params_per_tier() {
    let slow: serde_json::Value = serde_json::from_str(&take_string(get_default_params(0))).unwrap();
    let flagship: serde_json::Value =
        serde_json::from_str(&take_string(get_default_params(2))).unwrap();
    assert!(slow["prime_range"].as_u64() < flagship["prime_range"].as_u64());
    assert!(get_default_params(7).is_null());
}

#[test]
fn test_default_config_record() {
    let config = create_default_config();
    assert!(!config.is_null());
    let values = unsafe { *config };
    assert_eq!(values.iterations, 3);
    assert!(values.warmup);
    assert_eq!(values.warmup_count, 3);
    assert_eq!(values.device_tier, 1);
    unsafe { free_benchmark_config(config) };
}

#[test]
fn test_single_workload_entry_point() {
    let params = CString::new(r#"{"nqueens_size": 8}"#).unwrap();
    let result = unsafe { run_single_core_nqueens(params.as_ptr()) };
    assert!(!result.is_null());

    let record = unsafe { &*result };
    assert!(record.is_valid);
    assert_eq!(
        unsafe { CStr::from_ptr(record.name) }.to_str(),
        Ok("nqueens")
    );
    let metrics: serde_json::Value =
        serde_json::from_str(unsafe { CStr::from_ptr(record.metrics_json) }.to_str().unwrap())
            .unwrap();
    assert_eq!(metrics["solutions"], 92);

    unsafe { free_benchmark_result(result) };
}

#[test]
fn test_malformed_params_return_null() {
    let cases = [
        r#"{"matrix_size": -4}"#,
        r#"{"fibonacci_n_range": [20, 10]}"#,
        r#"{"no_such_field": 1}"#,
        "not json",
    ];
    for case in cases {
        let params = CString::new(case).unwrap();
        let result = unsafe { run_single_core_matrix_multiplication(params.as_ptr()) };
        assert!(result.is_null(), "accepted {}", case);
    }
}

#[test]
fn test_run_by_name() {
    let name = CString::new("monte_carlo_pi").unwrap();
    let params = CString::new(r#"{"monte_carlo_samples": 10000}"#).unwrap();
    let result = unsafe { run_benchmark_by_name(name.as_ptr(), params.as_ptr()) };
    assert!(!result.is_null());
    assert!(unsafe { (*result).is_valid });
    unsafe { free_benchmark_result(result) };

    let unknown = CString::new("bogosort").unwrap();
    assert!(unsafe { run_benchmark_by_name(unknown.as_ptr(), ptr::null()) }.is_null());
    assert!(unsafe { run_benchmark_by_name(ptr::null(), ptr::null()) }.is_null());
}

const SMALL_SUITE_CONFIG: &str = r#"{
    "iterations": 1,
    "warmup": false,
    "device_tier": "Slow",
    "params": {
        "prime_range": 5000,
        "fibonacci_n_range": [5, 10],
        "matrix_size": 8,
        "hash_data_size_mb": 0.01,
        "string_count": 100,
        "ray_tracing_resolution": [4, 4],
        "ray_tracing_depth": 1,
        "compression_data_size_mb": 0.01,
        "monte_carlo_samples": 5000,
        "json_data_size_mb": 0.01,
        "nqueens_size": 5
    }
}"#;

#[test]
fn test_suite_entry_point_returns_result_array() {
    let config = CString::new(SMALL_SUITE_CONFIG).unwrap();

    let json = take_string(unsafe { run_cpu_benchmark_suite(config.as_ptr()) });
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let entries = value.as_array().expect("suite payload is a top-level array");
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0]["name"], "prime_generation");
    assert_eq!(entries[9]["name"], "nqueens");

    let results = cpubench_core::decode_suite(&json).unwrap();
    assert!(results.iter().all(|r| r.is_valid));
}

#[test]
fn test_suite_report_entry_point() {
    let config = CString::new(SMALL_SUITE_CONFIG).unwrap();

    let json = take_string(unsafe { run_cpu_benchmark_suite_report(config.as_ptr()) });
    let report = cpubench_core::decode_suite_report(&json).unwrap();
    assert_eq!(report.results.len(), 10);
    assert_eq!(report.config.iterations, 1);
    assert!(report.all_valid());
    assert!(report.cpu_score > 0.0);
}

#[test]
fn test_suite_rejects_malformed_config() {
    let config = CString::new(r#"{"iterations": -1}"#).unwrap();
    assert!(unsafe { run_cpu_benchmark_suite(config.as_ptr()) }.is_null());
    assert!(unsafe { run_cpu_benchmark_suite(ptr::null()) }.is_null());
}

#[test]
fn test_null_frees_are_no_ops() {
    unsafe {
        free_c_string(ptr::null_mut());
        free_benchmark_result(ptr::null_mut());
        free_benchmark_config(ptr::null_mut());
    }
}
