//! Benchmark Catalog
//!
//! The fixed set of workloads. Declaration order is the order in which a
//! suite runs them and reports them.

use crate::error::{BenchError, BenchResult};
use crate::params::BenchmarkParams;
use crate::workloads::{
    WorkloadOutcome, compression, fibonacci, hashing, json, matrix, monte_carlo, nqueens, primes,
    ray_tracing, strings,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Catalog workloads for strongly-typed dispatch.
///
/// Every variant is single-core, deterministic and self-checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    PrimeGeneration,
    FibonacciRecursive,
    MatrixMultiplication,
    HashComputing,
    StringSorting,
    RayTracing,
    Compression,
    MonteCarloPi,
    JsonParsing,
    Nqueens,
}

impl Workload {
    /// Catalog name used in results and at the C boundary.
    pub fn name(&self) -> &'static str {
        match self {
            Workload::PrimeGeneration => "prime_generation",
            Workload::FibonacciRecursive => "fibonacci_recursive",
            Workload::MatrixMultiplication => "matrix_multiplication",
            Workload::HashComputing => "hash_computing",
            Workload::StringSorting => "string_sorting",
            Workload::RayTracing => "ray_tracing",
            Workload::Compression => "compression",
            Workload::MonteCarloPi => "monte_carlo_pi",
            Workload::JsonParsing => "json_parsing",
            Workload::Nqueens => "nqueens",
        }
    }

    /// Try to parse a catalog name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "prime_generation" => Some(Workload::PrimeGeneration),
            "fibonacci_recursive" => Some(Workload::FibonacciRecursive),
            "matrix_multiplication" => Some(Workload::MatrixMultiplication),
            "hash_computing" => Some(Workload::HashComputing),
            "string_sorting" => Some(Workload::StringSorting),
            "ray_tracing" => Some(Workload::RayTracing),
            "compression" => Some(Workload::Compression),
            "monte_carlo_pi" => Some(Workload::MonteCarloPi),
            "json_parsing" => Some(Workload::JsonParsing),
            "nqueens" => Some(Workload::Nqueens),
            _ => None,
        }
    }

    /// All workloads in declaration order.
    pub fn all() -> &'static [Workload] {
        &[
            Workload::PrimeGeneration,
            Workload::FibonacciRecursive,
            Workload::MatrixMultiplication,
            Workload::HashComputing,
            Workload::StringSorting,
            Workload::RayTracing,
            Workload::Compression,
            Workload::MonteCarloPi,
            Workload::JsonParsing,
            Workload::Nqueens,
        ]
    }

    /// Human-readable title for CLI output.
    pub fn display_name(&self) -> &'static str {
        match self {
            Workload::PrimeGeneration => "Prime Generation",
            Workload::FibonacciRecursive => "Fibonacci (recursive)",
            Workload::MatrixMultiplication => "Matrix Multiplication",
            Workload::HashComputing => "SHA-256 Hashing",
            Workload::StringSorting => "String Sorting",
            Workload::RayTracing => "Ray Tracing",
            Workload::Compression => "Compression",
            Workload::MonteCarloPi => "Monte Carlo π",
            Workload::JsonParsing => "JSON Parsing",
            Workload::Nqueens => "N-Queens",
        }
    }

    /// What one "operation" means for this workload's ops/second figure.
    pub fn unit(&self) -> &'static str {
        match self {
            Workload::PrimeGeneration => "numbers sieved",
            Workload::FibonacciRecursive => "recursive calls",
            Workload::MatrixMultiplication => "flops",
            Workload::HashComputing => "bytes",
            Workload::StringSorting => "strings",
            Workload::RayTracing => "rays",
            Workload::Compression => "bytes",
            Workload::MonteCarloPi => "samples",
            Workload::JsonParsing => "bytes",
            Workload::Nqueens => "nodes",
        }
    }

    /// Execute the workload once. Correctness failures are reported through
    /// `is_valid`; only unrecoverable conditions return `Err`.
    pub fn execute(&self, params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
        match self {
            Workload::PrimeGeneration => primes::run(params),
            Workload::FibonacciRecursive => fibonacci::run(params),
            Workload::MatrixMultiplication => matrix::run(params),
            Workload::HashComputing => hashing::run(params),
            Workload::StringSorting => strings::run(params),
            Workload::RayTracing => ray_tracing::run(params),
            Workload::Compression => compression::run(params),
            Workload::MonteCarloPi => monte_carlo::run(params),
            Workload::JsonParsing => json::run(params),
            Workload::Nqueens => nqueens::run(params),
        }
    }
}

impl std::fmt::Display for Workload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Workload {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workload::from_name(s).ok_or_else(|| BenchError::UnknownBenchmark(s.to_string()))
    }
}

/// Catalog names in declaration order.
pub fn names() -> Vec<&'static str> {
    Workload::all().iter().map(Workload::name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_ten_unique_names() {
        let names = names();
        assert_eq!(names.len(), 10);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_name_round_trip() {
        for workload in Workload::all() {
            assert_eq!(Workload::from_name(workload.name()), Some(*workload));
            assert_eq!(workload.to_string(), workload.name());
        }
        assert_eq!(Workload::from_name("bogosort"), None);
    }

    #[test]
    fn test_declaration_order() {
        assert_eq!(Workload::all()[0], Workload::PrimeGeneration);
        assert_eq!(Workload::all()[9], Workload::Nqueens);
    }

    #[test]
    fn test_from_str_reports_unknown_benchmark() {
        let err = "bogosort".parse::<Workload>().unwrap_err();
        assert_eq!(err, BenchError::UnknownBenchmark("bogosort".to_string()));
    }

    #[test]
    fn test_serde_uses_catalog_names() {
        let json = serde_json::to_string(&Workload::MonteCarloPi).unwrap();
        assert_eq!(json, r#""monte_carlo_pi""#);
    }
}
