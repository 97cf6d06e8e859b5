//! # Error Types
//!
//! Errors raised by the benchmark engine. Correctness failures inside a
//! workload are *not* errors: they are reported as `is_valid = false` on the
//! result. Only structurally invalid input and unrecoverable faults travel
//! through [`BenchError`].

/// Main error type for cpubench operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BenchError {
    /// Configuration or parameters failed structural or range validation.
    #[error("malformed input in '{field}': {reason}")]
    MalformedInput {
        /// Offending field, or `"json"` when the document itself is invalid
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// A workload hit an unrecoverable condition (allocation failure, panic).
    #[error("workload '{benchmark}' faulted: {reason}")]
    WorkloadFault {
        /// Catalog name of the workload
        benchmark: String,
        /// Fault description
        reason: String,
    },

    /// No catalog entry carries the requested name.
    #[error("unknown benchmark '{0}'")]
    UnknownBenchmark(String),

    /// A result could not be serialized.
    #[error("failed to encode result: {0}")]
    Encoding(String),
}

/// Result alias used across the engine.
pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    /// Build a [`BenchError::MalformedInput`] for a named field.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BenchError::MalformedInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`BenchError::WorkloadFault`] for a named workload.
    pub fn fault(benchmark: impl Into<String>, reason: impl Into<String>) -> Self {
        BenchError::WorkloadFault {
            benchmark: benchmark.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            BenchError::MalformedInput { .. } | BenchError::UnknownBenchmark(_)
        )
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::malformed("json", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_display_names_field() {
        let error = BenchError::malformed("matrix_size", "must be positive, got -3");
        assert!(error.to_string().contains("matrix_size"));
        assert!(error.to_string().contains("must be positive"));
        assert!(error.is_malformed_input());
    }

    #[test]
    fn test_fault_is_not_malformed_input() {
        let error = BenchError::fault("compression", "allocation of 1 GiB failed");
        assert!(!error.is_malformed_input());
        assert!(error.to_string().contains("compression"));
    }

    #[test]
    fn test_json_error_maps_to_malformed_input() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: BenchError = err.into();
        assert!(matches!(error, BenchError::MalformedInput { ref field, .. } if field == "json"));
    }
}
