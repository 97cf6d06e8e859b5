//! `#[repr(C)]` records exchanged with foreign callers.

use crate::ownership::{embedded_c_string, release_embedded_c_string};
use cpubench_core::{
    BenchError, BenchResult, BenchmarkResult, DeviceTier, SuiteConfig, encode_metrics,
};
use std::ffi::c_char;

/// One benchmark result as seen from C.
///
/// `name` and `metrics_json` are owned by the record and released together
/// with it by `free_benchmark_result`.
#[repr(C)]
#[derive(Debug)]
pub struct CBenchmarkResult {
    pub name: *mut c_char,
    pub execution_time_ms: f64,
    pub ops_per_second: f64,
    pub is_valid: bool,
    /// JSON object of the workload's metrics
    pub metrics_json: *mut c_char,
}

impl CBenchmarkResult {
    /// Build the C record. Fails without leaking if either string cannot be
    /// represented.
    pub fn from_result(result: &BenchmarkResult) -> BenchResult<Self> {
        let metrics = encode_metrics(&result.metrics)?;

        let name = embedded_c_string(&result.name);
        let metrics_json = embedded_c_string(&metrics);
        let record = Self {
            name,
            execution_time_ms: result.execution_time_ms,
            ops_per_second: result.ops_per_second,
            is_valid: result.is_valid,
            metrics_json,
        };

        if name.is_null() || metrics_json.is_null() {
            drop(record);
            return Err(BenchError::Encoding(
                "result contains an interior NUL byte".to_string(),
            ));
        }
        Ok(record)
    }
}

impl Drop for CBenchmarkResult {
    fn drop(&mut self) {
        // Both pointers are null or came from `embedded_c_string`.
        unsafe {
            release_embedded_c_string(self.name);
            release_embedded_c_string(self.metrics_json);
        }
    }
}

/// Suite configuration as seen from C.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CBenchmarkConfig {
    pub iterations: u32,
    pub warmup: bool,
    pub warmup_count: u32,
    /// 0 = Slow, 1 = Mid, 2 = Flagship
    pub device_tier: i32,
}

impl From<&SuiteConfig> for CBenchmarkConfig {
    fn from(config: &SuiteConfig) -> Self {
        Self {
            iterations: config.iterations,
            warmup: config.warmup,
            warmup_count: config.warmup_count,
            device_tier: config.device_tier.code(),
        }
    }
}

impl TryFrom<CBenchmarkConfig> for SuiteConfig {
    type Error = BenchError;

    fn try_from(config: CBenchmarkConfig) -> Result<Self, Self::Error> {
        let tier = DeviceTier::from_code(config.device_tier).ok_or_else(|| {
            BenchError::malformed(
                "device_tier",
                format!("unknown tier code {}", config.device_tier),
            )
        })?;
        SuiteConfig::new(config.iterations, config.warmup, config.warmup_count, tier)
    }
}
