//! Suite configuration.
//!
//! Parsed from the caller's JSON document. Missing fields fall back to the
//! default configuration (3 iterations, 3 warmup rounds, Mid tier); fields
//! that are present but wrong are rejected, never corrected.

use crate::error::{BenchError, BenchResult};
use crate::params::{self, BenchmarkParams, DeviceTier, ParamOverrides};
use serde::{Deserialize, Serialize};

/// Validated configuration for one suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Measured rounds over the catalog (at least 1)
    pub iterations: u32,
    pub warmup: bool,
    /// Discarded rounds per entry before measurement; ignored when `warmup` is false
    pub warmup_count: u32,
    pub device_tier: DeviceTier,
    /// Caller overrides applied on top of the tier defaults
    #[serde(default, skip_serializing_if = "ParamOverrides::is_empty")]
    pub params: ParamOverrides,
}

impl SuiteConfig {
    pub const DEFAULT_ITERATIONS: u32 = 3;
    pub const DEFAULT_WARMUP_COUNT: u32 = 3;

    /// Parse and validate a configuration document.
    pub fn from_json(json: &str) -> BenchResult<Self> {
        let raw: RawSuiteConfig = serde_json::from_str(json)?;
        raw.try_into()
    }

    /// Build a validated configuration from already-typed values.
    pub fn new(iterations: u32, warmup: bool, warmup_count: u32, device_tier: DeviceTier) -> BenchResult<Self> {
        if iterations == 0 {
            return Err(BenchError::malformed("iterations", "must be at least 1"));
        }
        Ok(Self {
            iterations,
            warmup,
            warmup_count,
            device_tier,
            params: ParamOverrides::default(),
        })
    }

    pub fn with_params(mut self, params: ParamOverrides) -> Self {
        self.params = params;
        self
    }

    /// Number of warmup rounds that will actually run.
    pub fn effective_warmup_rounds(&self) -> u32 {
        if self.warmup { self.warmup_count } else { 0 }
    }

    /// Resolve the workload parameters this configuration describes.
    pub fn resolve_params(&self) -> BenchResult<BenchmarkParams> {
        params::resolve(&self.params, self.device_tier)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            warmup: true,
            warmup_count: Self::DEFAULT_WARMUP_COUNT,
            device_tier: DeviceTier::Mid,
            params: ParamOverrides::default(),
        }
    }
}

/// Wire form of [`SuiteConfig`]. Counts are signed so that negative values
/// are reported as range errors rather than type errors.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuiteConfig {
    #[serde(default)]
    iterations: Option<i64>,
    #[serde(default)]
    warmup: Option<bool>,
    #[serde(default)]
    warmup_count: Option<i64>,
    #[serde(default)]
    device_tier: Option<DeviceTier>,
    #[serde(default)]
    params: Option<ParamOverrides>,
}

impl TryFrom<RawSuiteConfig> for SuiteConfig {
    type Error = BenchError;

    fn try_from(raw: RawSuiteConfig) -> Result<Self, Self::Error> {
        let defaults = SuiteConfig::default();

        let iterations = match raw.iterations {
            None => defaults.iterations,
            Some(n) if n < 1 => {
                return Err(BenchError::malformed(
                    "iterations",
                    format!("must be a positive integer, got {}", n),
                ));
            }
            Some(n) => u32::try_from(n)
                .map_err(|_| BenchError::malformed("iterations", format!("{} is too large", n)))?,
        };

        let warmup_count = match raw.warmup_count {
            None => defaults.warmup_count,
            Some(n) if n < 0 => {
                return Err(BenchError::malformed(
                    "warmup_count",
                    format!("must not be negative, got {}", n),
                ));
            }
            Some(n) => u32::try_from(n)
                .map_err(|_| BenchError::malformed("warmup_count", format!("{} is too large", n)))?,
        };

        let config = SuiteConfig {
            iterations,
            warmup: raw.warmup.unwrap_or(defaults.warmup),
            warmup_count,
            device_tier: raw.device_tier.unwrap_or(defaults.device_tier),
            params: raw.params.unwrap_or_default(),
        };

        // Reject bad overrides up front so the caller gets the sentinel
        // before any work starts.
        config.resolve_params()?;
        Ok(config)
    }
}
