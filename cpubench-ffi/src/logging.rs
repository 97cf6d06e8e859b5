//! Opt-in structured logging for embedders.

use crate::ownership::borrow_c_str;
use std::ffi::c_char;
use std::panic::AssertUnwindSafe;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Build the filter for a caller-supplied directive string.
fn filter_for(directives: Option<&str>) -> Option<EnvFilter> {
    EnvFilter::try_new(directives.unwrap_or(DEFAULT_FILTER)).ok()
}

/// Install a JSON `tracing` subscriber writing to stderr.
///
/// `filter` uses `RUST_LOG` syntax (for example `"cpubench_core=debug"`);
/// null means `"info"`. Returns false if the filter does not parse or a
/// global subscriber is already installed.
///
/// # Safety
///
/// `filter` is null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cpu_benchmark_init_logging(filter: *const c_char) -> bool {
    let Ok(directives) = (unsafe { borrow_c_str(filter) }) else {
        return false;
    };
    let Some(env_filter) = filter_for(directives) else {
        return false;
    };

    std::panic::catch_unwind(AssertUnwindSafe(|| {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .is_ok()
    }))
    .unwrap_or(false)
}
