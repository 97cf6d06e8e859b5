//! Parameter Model
//!
//! Per-workload sizing knobs. Callers supply a sparse [`ParamOverrides`]
//! document; [`resolve`] validates every present field and fills the rest
//! from the [`DeviceTier`] default table. The resulting [`BenchmarkParams`]
//! is immutable and shared read-only by every iteration of a run, so all
//! iterations of a workload see identical inputs.

use crate::error::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse performance class used to pick default workload sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceTier {
    /// Entry-level phones and budget tablets
    #[serde(alias = "slow", alias = "SLOW")]
    Slow,
    /// Mid-range phones and mainstream tablets
    #[default]
    #[serde(alias = "mid", alias = "MID")]
    Mid,
    /// High-end phones and premium tablets
    #[serde(alias = "flagship", alias = "FLAGSHIP")]
    Flagship,
}

impl DeviceTier {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceTier::Slow => "Slow",
            DeviceTier::Mid => "Mid",
            DeviceTier::Flagship => "Flagship",
        }
    }

    pub fn all() -> &'static [DeviceTier] {
        &[DeviceTier::Slow, DeviceTier::Mid, DeviceTier::Flagship]
    }

    /// Numeric code used by the C ABI (0 = Slow, 1 = Mid, 2 = Flagship).
    pub fn code(&self) -> i32 {
        match self {
            DeviceTier::Slow => 0,
            DeviceTier::Mid => 1,
            DeviceTier::Flagship => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(DeviceTier::Slow),
            1 => Some(DeviceTier::Mid),
            2 => Some(DeviceTier::Flagship),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DeviceTier {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slow" => Ok(DeviceTier::Slow),
            "mid" => Ok(DeviceTier::Mid),
            "flagship" => Ok(DeviceTier::Flagship),
            _ => Err(BenchError::malformed(
                "device_tier",
                format!("expected Slow, Mid or Flagship, got '{}'", s),
            )),
        }
    }
}

/// Fully resolved workload parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkParams {
    /// Upper bound (inclusive) of the prime sieve
    pub prime_range: u64,
    /// Inclusive range of Fibonacci indices computed recursively
    pub fibonacci_n_range: (u32, u32),
    /// Side length of the square matrices
    pub matrix_size: usize,
    pub hash_data_size_mb: f64,
    pub string_count: usize,
    /// Image width and height in pixels
    pub ray_tracing_resolution: (u32, u32),
    /// Maximum reflection depth per primary ray
    pub ray_tracing_depth: u32,
    pub compression_data_size_mb: f64,
    pub monte_carlo_samples: u64,
    pub json_data_size_mb: f64,
    pub nqueens_size: u32,
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

impl BenchmarkParams {
    /// Default table. Every tier defines every field.
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Slow => Self {
                prime_range: 1_000_000,
                fibonacci_n_range: (30, 38),
                matrix_size: 500,
                hash_data_size_mb: 25.0,
                string_count: 250_000,
                ray_tracing_resolution: (256, 256),
                ray_tracing_depth: 2,
                compression_data_size_mb: 25.0,
                monte_carlo_samples: 25_000_000,
                json_data_size_mb: 2.0,
                nqueens_size: 12,
            },
            DeviceTier::Mid => Self {
                prime_range: 6_000_000,
                fibonacci_n_range: (32, 38),
                matrix_size: 600,
                hash_data_size_mb: 40.0,
                string_count: 500_000,
                ray_tracing_resolution: (300, 300),
                ray_tracing_depth: 3,
                compression_data_size_mb: 25.0,
                monte_carlo_samples: 40_000_000,
                json_data_size_mb: 4.0,
                nqueens_size: 13,
            },
            DeviceTier::Flagship => Self {
                prime_range: 12_000_000,
                fibonacci_n_range: (35, 40),
                matrix_size: 900,
                hash_data_size_mb: 100.0,
                string_count: 1_000_000,
                ray_tracing_resolution: (450, 450),
                ray_tracing_depth: 4,
                compression_data_size_mb: 50.0,
                monte_carlo_samples: 80_000_000,
                json_data_size_mb: 10.0,
                nqueens_size: 15,
            },
        }
    }

    pub fn hash_data_bytes(&self) -> usize {
        mb_to_bytes(self.hash_data_size_mb)
    }

    pub fn compression_data_bytes(&self) -> usize {
        mb_to_bytes(self.compression_data_size_mb)
    }

    pub fn json_data_bytes(&self) -> usize {
        mb_to_bytes(self.json_data_size_mb)
    }
}

fn mb_to_bytes(mb: f64) -> usize {
    ((mb * BYTES_PER_MB).round() as usize).max(1)
}

/// Accepted bounds for every field.
pub struct ParamLimits;

impl ParamLimits {
    pub const PRIME_RANGE: (i64, i64) = (2, 100_000_000);
    /// The recursive kernel makes 2·fib(n+1) − 1 calls, about 4e10 at n = 50.
    pub const FIBONACCI_N: (i64, i64) = (0, 50);
    pub const MATRIX_SIZE: (i64, i64) = (1, 4096);
    pub const HASH_MB_MAX: f64 = 1024.0;
    pub const STRING_COUNT: (i64, i64) = (1, 10_000_000);
    pub const RESOLUTION_AXIS: (i64, i64) = (1, 8192);
    pub const RAY_DEPTH: (i64, i64) = (1, 16);
    pub const COMPRESSION_MB_MAX: f64 = 512.0;
    pub const MONTE_CARLO_SAMPLES: (i64, i64) = (1, 10_000_000_000);
    pub const JSON_MB_MAX: f64 = 256.0;
    /// Board sizes with a known solution count.
    pub const NQUEENS_SIZE: (i64, i64) = (1, 16);
}

/// Sparse, caller-supplied parameter overrides. Absent fields fall back to
/// the tier defaults; present fields are validated by [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prime_range: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fibonacci_n_range: Option<[i64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_data_size_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ray_tracing_resolution: Option<[i64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ray_tracing_depth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_data_size_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo_samples: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data_size_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nqueens_size: Option<i64>,
}

impl ParamOverrides {
    /// Parse an override document. Any parse failure is `MalformedInput`.
    pub fn from_json(json: &str) -> BenchResult<Self> {
        serde_json::from_str(json).map_err(|e| BenchError::malformed("params", e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self == &ParamOverrides::default()
    }

    /// Layer `other` on top of `self`: fields present in `other` win, the
    /// rest keep their current value.
    pub fn merged_with(self, other: ParamOverrides) -> Self {
        Self {
            prime_range: other.prime_range.or(self.prime_range),
            fibonacci_n_range: other.fibonacci_n_range.or(self.fibonacci_n_range),
            matrix_size: other.matrix_size.or(self.matrix_size),
            hash_data_size_mb: other.hash_data_size_mb.or(self.hash_data_size_mb),
            string_count: other.string_count.or(self.string_count),
            ray_tracing_resolution: other.ray_tracing_resolution.or(self.ray_tracing_resolution),
            ray_tracing_depth: other.ray_tracing_depth.or(self.ray_tracing_depth),
            compression_data_size_mb: other
                .compression_data_size_mb
                .or(self.compression_data_size_mb),
            monte_carlo_samples: other.monte_carlo_samples.or(self.monte_carlo_samples),
            json_data_size_mb: other.json_data_size_mb.or(self.json_data_size_mb),
            nqueens_size: other.nqueens_size.or(self.nqueens_size),
        }
    }
}

/// Validate `overrides` and fill every absent field from `tier`'s defaults.
pub fn resolve(overrides: &ParamOverrides, tier: DeviceTier) -> BenchResult<BenchmarkParams> {
    let mut params = BenchmarkParams::for_tier(tier);

    if let Some(v) = overrides.prime_range {
        params.prime_range = int_in("prime_range", v, ParamLimits::PRIME_RANGE)? as u64;
    }
    if let Some([lo, hi]) = overrides.fibonacci_n_range {
        let lo = int_in("fibonacci_n_range", lo, ParamLimits::FIBONACCI_N)?;
        let hi = int_in("fibonacci_n_range", hi, ParamLimits::FIBONACCI_N)?;
        if hi < lo {
            return Err(BenchError::malformed(
                "fibonacci_n_range",
                format!("high bound {} is below low bound {}", hi, lo),
            ));
        }
        params.fibonacci_n_range = (lo as u32, hi as u32);
    }
    if let Some(v) = overrides.matrix_size {
        params.matrix_size = int_in("matrix_size", v, ParamLimits::MATRIX_SIZE)? as usize;
    }
    if let Some(v) = overrides.hash_data_size_mb {
        params.hash_data_size_mb = size_mb("hash_data_size_mb", v, ParamLimits::HASH_MB_MAX)?;
    }
    if let Some(v) = overrides.string_count {
        params.string_count = int_in("string_count", v, ParamLimits::STRING_COUNT)? as usize;
    }
    if let Some([w, h]) = overrides.ray_tracing_resolution {
        let w = int_in("ray_tracing_resolution", w, ParamLimits::RESOLUTION_AXIS)?;
        let h = int_in("ray_tracing_resolution", h, ParamLimits::RESOLUTION_AXIS)?;
        params.ray_tracing_resolution = (w as u32, h as u32);
    }
    if let Some(v) = overrides.ray_tracing_depth {
        params.ray_tracing_depth = int_in("ray_tracing_depth", v, ParamLimits::RAY_DEPTH)? as u32;
    }
    if let Some(v) = overrides.compression_data_size_mb {
        params.compression_data_size_mb =
            size_mb("compression_data_size_mb", v, ParamLimits::COMPRESSION_MB_MAX)?;
    }
    if let Some(v) = overrides.monte_carlo_samples {
        params.monte_carlo_samples =
            int_in("monte_carlo_samples", v, ParamLimits::MONTE_CARLO_SAMPLES)? as u64;
    }
    if let Some(v) = overrides.json_data_size_mb {
        params.json_data_size_mb = size_mb("json_data_size_mb", v, ParamLimits::JSON_MB_MAX)?;
    }
    if let Some(v) = overrides.nqueens_size {
        params.nqueens_size = int_in("nqueens_size", v, ParamLimits::NQUEENS_SIZE)? as u32;
    }

    Ok(params)
}

fn int_in(field: &str, value: i64, (min, max): (i64, i64)) -> BenchResult<i64> {
    if value < 0 {
        return Err(BenchError::malformed(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    if value < min || value > max {
        return Err(BenchError::malformed(
            field,
            format!("must be within {}..={}, got {}", min, max, value),
        ));
    }
    Ok(value)
}

fn size_mb(field: &str, value: f64, max: f64) -> BenchResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BenchError::malformed(
            field,
            format!("must be a positive size, got {}", value),
        ));
    }
    if value > max {
        return Err(BenchError::malformed(
            field,
            format!("must be at most {} MB, got {}", max, value),
        ));
    }
    Ok(value)
}
