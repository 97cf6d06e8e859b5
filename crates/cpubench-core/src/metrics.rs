//! Open, per-workload diagnostic metrics.
//!
//! Each workload reports a different set of keys (primes found, compression
//! ratio, digest, ...), so metrics are a sorted map from name to a small
//! value variant rather than a fixed record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single metric value.
///
/// Serialized untagged: integers as JSON integers, floats as JSON numbers
/// with a fractional part or exponent, text as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Int(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{:.6}", v),
            MetricValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<u32> for MetricValue {
    fn from(value: u32) -> Self {
        MetricValue::Int(i64::from(value))
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        // Saturate rather than wrap; no workload produces counts this large.
        MetricValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        MetricValue::from(value as u64)
    }
}

impl From<f64> for MetricValue {
    /// Non-finite floats have no JSON form and are stored as 0.0.
    fn from(value: f64) -> Self {
        MetricValue::Float(if value.is_finite() { value } else { 0.0 })
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// Metric map attached to every result. Sorted, so encoding is stable.
pub type Metrics = BTreeMap<String, MetricValue>;

/// Small builder used by workloads to assemble their metric maps.
#[derive(Debug, Default)]
pub struct MetricsBuilder {
    metrics: Metrics,
}

impl MetricsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<MetricValue>) -> Self {
        self.metrics.insert(key.to_string(), value.into());
        self
    }

    pub fn build(self) -> Metrics {
        self.metrics
    }
}
