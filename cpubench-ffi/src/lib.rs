//! # cpu_benchmark
//!
//! C ABI for the cpubench single-core CPU benchmark suite. Results cross the
//! boundary as JSON strings or `#[repr(C)]` records; every returned pointer
//! is released by exactly one matching `free_*` function.

pub mod ffi;
pub mod logging;
pub mod ownership;
pub mod types;

pub use ffi::*;
pub use logging::cpu_benchmark_init_logging;
pub use types::{CBenchmarkConfig, CBenchmarkResult};
