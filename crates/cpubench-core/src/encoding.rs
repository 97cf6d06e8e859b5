//! Result Encoder
//!
//! JSON encoding of results for the C boundary and the CLI. Floats are
//! written in shortest round-trip form, so decoding reproduces every field.
//!
//! A suite crosses the C boundary as a bare array of result objects in
//! catalog order. The full report, which adds total time, score and the
//! configuration echo, has its own encoder.

use crate::error::{BenchError, BenchResult};
use crate::metrics::Metrics;
use crate::result::{BenchmarkResult, SuiteResult};
use serde::Serialize;

fn encode<T: Serialize>(value: &T) -> BenchResult<String> {
    serde_json::to_string(value).map_err(|e| BenchError::Encoding(e.to_string()))
}

/// Encode the suite's per-benchmark results as a JSON array.
pub fn encode_suite(suite: &SuiteResult) -> BenchResult<String> {
    encode(&suite.results)
}

/// Encode the whole suite report, metadata included.
pub fn encode_suite_report(suite: &SuiteResult) -> BenchResult<String> {
    encode(suite)
}

/// Pretty-printed report for human consumption.
pub fn encode_suite_report_pretty(suite: &SuiteResult) -> BenchResult<String> {
    serde_json::to_string_pretty(suite).map_err(|e| BenchError::Encoding(e.to_string()))
}

pub fn encode_result(result: &BenchmarkResult) -> BenchResult<String> {
    encode(result)
}

/// Encode a metric map as a JSON object.
pub fn encode_metrics(metrics: &Metrics) -> BenchResult<String> {
    encode(metrics)
}

/// Decode the array produced by [`encode_suite`].
pub fn decode_suite(json: &str) -> BenchResult<Vec<BenchmarkResult>> {
    Ok(serde_json::from_str(json)?)
}

pub fn decode_suite_report(json: &str) -> BenchResult<SuiteResult> {
    Ok(serde_json::from_str(json)?)
}

pub fn decode_result(json: &str) -> BenchResult<BenchmarkResult> {
    Ok(serde_json::from_str(json)?)
}
