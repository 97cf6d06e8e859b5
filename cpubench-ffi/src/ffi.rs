//! C ABI entry points.
//!
//! Every function here is `extern "C"`, never unwinds into the caller, and
//! reports malformed input by returning null. Pointers returned to the
//! caller must be released with the matching `free_*` function exactly once.

use crate::ownership::{
    HandleKind, borrow_c_str, export_c_string, export_handle, reclaim_handle, release_c_string,
};
use crate::types::{CBenchmarkConfig, CBenchmarkResult};
use cpubench_core::{
    BenchError, BenchResult, BenchmarkParams, BenchmarkResult, DeviceTier, ParamOverrides,
    SuiteConfig, SuiteResult, Workload, catalog, encode_suite, encode_suite_report,
    run_benchmark, run_suite,
};
use std::ffi::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

/// Version of this C interface. Bumped on any incompatible change.
pub const ABI_VERSION: u32 = 1;

/// Run `body`, turning a panic into `fallback`.
fn guarded<T>(entry: &'static str, fallback: T, body: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            tracing::error!(entry, "Panic caught at the C boundary");
            fallback
        }
    }
}

/// Log a rejected input and return null.
fn reject<T>(entry: &'static str, error: &BenchError) -> *mut T {
    tracing::warn!(entry, error = %error, "Rejected input");
    ptr::null_mut()
}

/// Parse an optional override document; null means "no overrides".
///
/// # Safety
///
/// `params_json` is null or a valid NUL-terminated string.
unsafe fn read_overrides(params_json: *const c_char) -> BenchResult<ParamOverrides> {
    match unsafe { borrow_c_str(params_json) } {
        Ok(None) => Ok(ParamOverrides::default()),
        Ok(Some(text)) => ParamOverrides::from_json(text),
        Err(reason) => Err(BenchError::malformed("params", reason)),
    }
}

fn export_result(entry: &'static str, result: &BenchmarkResult) -> *mut CBenchmarkResult {
    match CBenchmarkResult::from_result(result) {
        Ok(record) => export_handle(record, HandleKind::BenchmarkResult),
        Err(e) => {
            tracing::error!(entry, error = %e, "Failed to build result record");
            ptr::null_mut()
        }
    }
}

/// Shared body of the per-workload entry points.
///
/// # Safety
///
/// `params_json` is null or a valid NUL-terminated string.
unsafe fn run_workload(
    entry: &'static str,
    workload: Workload,
    params_json: *const c_char,
) -> *mut CBenchmarkResult {
    let overrides = match unsafe { read_overrides(params_json) } {
        Ok(overrides) => overrides,
        Err(e) => return reject(entry, &e),
    };

    guarded(entry, ptr::null_mut(), || {
        match run_benchmark(workload, &overrides, DeviceTier::Mid) {
            Ok(result) => export_result(entry, &result),
            Err(e) if e.is_malformed_input() => reject(entry, &e),
            Err(e) => {
                let sentinel = BenchmarkResult::faulted(workload.name(), e.to_string());
                export_result(entry, &sentinel)
            }
        }
    })
}

/// Shared body of the suite entry points: parse, run, encode.
///
/// # Safety
///
/// `config_json` is null or a valid NUL-terminated string.
unsafe fn run_suite_encoded(
    entry: &'static str,
    config_json: *const c_char,
    encode: fn(&SuiteResult) -> BenchResult<String>,
) -> *mut c_char {
    let text = match unsafe { borrow_c_str(config_json) } {
        Ok(Some(text)) => text,
        Ok(None) => return reject(entry, &BenchError::malformed("config", "null pointer")),
        Err(reason) => return reject(entry, &BenchError::malformed("config", reason)),
    };

    guarded(entry, ptr::null_mut(), || {
        let suite = SuiteConfig::from_json(text).and_then(|config| run_suite(&config));
        match suite.and_then(|suite| encode(&suite)) {
            Ok(json) => export_c_string(&json),
            Err(e) => reject(entry, &e),
        }
    })
}

/// Run the whole catalog under a JSON configuration and return a JSON array
/// of per-benchmark results in catalog order, or null if the configuration
/// is malformed.
///
/// # Safety
///
/// `config_json` is null or a valid NUL-terminated string. The returned
/// string must be released with [`free_c_string`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn run_cpu_benchmark_suite(config_json: *const c_char) -> *mut c_char {
    unsafe { run_suite_encoded("run_cpu_benchmark_suite", config_json, encode_suite) }
}

/// Same as [`run_cpu_benchmark_suite`] but returns the full report object:
/// `results` plus `total_time_ms`, `cpu_score`, the configuration echo, the
/// resolved parameters and `started_at`.
///
/// # Safety
///
/// `config_json` is null or a valid NUL-terminated string. The returned
/// string must be released with [`free_c_string`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn run_cpu_benchmark_suite_report(config_json: *const c_char) -> *mut c_char {
    unsafe {
        run_suite_encoded(
            "run_cpu_benchmark_suite_report",
            config_json,
            encode_suite_report,
        )
    }
}

/// Release a string returned by this library. Null is a no-op.
///
/// # Safety
///
/// `ptr` is null or a string returned by this library that has not been
/// released.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_c_string(ptr: *mut c_char) {
    guarded("free_c_string", (), || unsafe { release_c_string(ptr) })
}

macro_rules! single_core_entry_points {
    ($($fn_name:ident => $workload:expr),+ $(,)?) => {
        $(
            #[doc = concat!("Run `", stringify!($fn_name), "` once with optional JSON parameter overrides.")]
            ///
            /// A null `params_json` runs with Mid-tier defaults. Returns null
            /// when the overrides are malformed.
            ///
            /// # Safety
            ///
            /// `params_json` is null or a valid NUL-terminated string. The
            /// returned record must be released with [`free_benchmark_result`].
            #[unsafe(no_mangle)]
            pub unsafe extern "C" fn $fn_name(params_json: *const c_char) -> *mut CBenchmarkResult {
                unsafe { run_workload(stringify!($fn_name), $workload, params_json) }
            }
        )+
    };
}

single_core_entry_points! {
    run_single_core_prime_generation => Workload::PrimeGeneration,
    run_single_core_fibonacci_recursive => Workload::FibonacciRecursive,
    run_single_core_matrix_multiplication => Workload::MatrixMultiplication,
    run_single_core_hash_computing => Workload::HashComputing,
    run_single_core_string_sorting => Workload::StringSorting,
    run_single_core_ray_tracing => Workload::RayTracing,
    run_single_core_compression => Workload::Compression,
    run_single_core_monte_carlo_pi => Workload::MonteCarloPi,
    run_single_core_json_parsing => Workload::JsonParsing,
    run_single_core_nqueens => Workload::Nqueens,
}

/// Run a workload selected by catalog name. Returns null for an unknown
/// name or malformed overrides.
///
/// # Safety
///
/// `name` is a valid NUL-terminated string; `params_json` is null or one.
/// The returned record must be released with [`free_benchmark_result`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn run_benchmark_by_name(
    name: *const c_char,
    params_json: *const c_char,
) -> *mut CBenchmarkResult {
    const ENTRY: &str = "run_benchmark_by_name";

    let workload = match unsafe { borrow_c_str(name) } {
        Ok(Some(name)) => match name.parse::<Workload>() {
            Ok(workload) => workload,
            Err(e) => return reject(ENTRY, &e),
        },
        Ok(None) => return reject(ENTRY, &BenchError::malformed("name", "null pointer")),
        Err(reason) => return reject(ENTRY, &BenchError::malformed("name", reason)),
    };
    unsafe { run_workload(ENTRY, workload, params_json) }
}

/// Release a result record and the strings it owns. Null is a no-op.
///
/// # Safety
///
/// `result` is null or a record returned by this library that has not been
/// released.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_benchmark_result(result: *mut CBenchmarkResult) {
    guarded("free_benchmark_result", (), || {
        drop(unsafe { reclaim_handle(result, HandleKind::BenchmarkResult) });
    })
}

/// JSON array of catalog names in declaration order. Release the returned
/// string with [`free_c_string`].
#[unsafe(no_mangle)]
pub extern "C" fn list_benchmarks() -> *mut c_char {
    guarded("list_benchmarks", ptr::null_mut(), || {
        match serde_json::to_string(&catalog::names()) {
            Ok(json) => export_c_string(&json),
            Err(e) => reject("list_benchmarks", &BenchError::Encoding(e.to_string())),
        }
    })
}

/// JSON of the default parameters for a tier code (0 = Slow, 1 = Mid,
/// 2 = Flagship). Null for an unknown code. Release the returned string
/// with [`free_c_string`].
#[unsafe(no_mangle)]
pub extern "C" fn get_default_params(device_tier: i32) -> *mut c_char {
    const ENTRY: &str = "get_default_params";

    guarded(ENTRY, ptr::null_mut(), || {
        let Some(tier) = DeviceTier::from_code(device_tier) else {
            return reject(
                ENTRY,
                &BenchError::malformed("device_tier", format!("unknown tier code {}", device_tier)),
            );
        };
        match serde_json::to_string(&BenchmarkParams::for_tier(tier)) {
            Ok(json) => export_c_string(&json),
            Err(e) => reject(ENTRY, &BenchError::Encoding(e.to_string())),
        }
    })
}

/// Default suite configuration: 3 iterations, 3 warmup rounds, Mid tier.
/// Release the returned record with [`free_benchmark_config`].
#[unsafe(no_mangle)]
pub extern "C" fn create_default_config() -> *mut CBenchmarkConfig {
    guarded("create_default_config", ptr::null_mut(), || {
        export_handle(
            CBenchmarkConfig::from(&SuiteConfig::default()),
            HandleKind::BenchmarkConfig,
        )
    })
}

/// Release a configuration record. Null is a no-op.
///
/// # Safety
///
/// `config` is null or a record returned by [`create_default_config`] that
/// has not been released.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_benchmark_config(config: *mut CBenchmarkConfig) {
    guarded("free_benchmark_config", (), || {
        drop(unsafe { reclaim_handle(config, HandleKind::BenchmarkConfig) });
    })
}

/// Version of the C interface implemented by this library.
#[unsafe(no_mangle)]
pub extern "C" fn cpu_benchmark_abi_version() -> u32 {
    ABI_VERSION
}
