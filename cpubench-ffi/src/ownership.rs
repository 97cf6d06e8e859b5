//! Boundary Ownership Layer
//!
//! Every pointer handed to a foreign caller is allocated here and recorded
//! in a process-wide registry of live handles, keyed by address and tagged
//! with its kind. Release functions consult the registry first: releasing
//! null is a no-op, and releasing an address that is not live for that kind
//! (already released, never ours, or the wrong release function) is logged
//! and ignored instead of corrupting the heap.
//!
//! This is best-effort detection. A freed address can be reused by a later
//! allocation, so use-after-release remains the caller's responsibility.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::ffi::{CStr, CString, c_char};
use std::ptr;

/// Kinds of handles that cross the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    CString,
    BenchmarkResult,
    BenchmarkConfig,
}

static LIVE_HANDLES: Lazy<DashMap<usize, HandleKind>> = Lazy::new(DashMap::new);

fn register(address: usize, kind: HandleKind) {
    LIVE_HANDLES.insert(address, kind);
}

/// Remove `address` from the registry if it is live with `kind`.
fn unregister(address: usize, kind: HandleKind) -> bool {
    LIVE_HANDLES
        .remove_if(&address, |_, live| *live == kind)
        .is_some()
}

/// Whether `address` is currently live with `kind`.
pub fn is_live<T>(ptr: *const T, kind: HandleKind) -> bool {
    LIVE_HANDLES
        .get(&(ptr as usize))
        .is_some_and(|live| *live == kind)
}

/// Number of live handles of every kind.
pub fn live_count() -> usize {
    LIVE_HANDLES.len()
}

/// Convert `s` to an owned C string without registering it. Used for
/// strings embedded in a larger handle that releases them itself.
///
/// Returns null if `s` contains an interior NUL byte.
pub fn embedded_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            tracing::warn!(error = %e, "String contains an interior NUL byte");
            ptr::null_mut()
        }
    }
}

/// Release a string produced by [`embedded_c_string`].
///
/// # Safety
///
/// `ptr` is null or came from [`embedded_c_string`] and has not been released.
pub unsafe fn release_embedded_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Hand `s` to the caller as a registered C string.
pub fn export_c_string(s: &str) -> *mut c_char {
    let raw = embedded_c_string(s);
    if !raw.is_null() {
        register(raw as usize, HandleKind::CString);
    }
    raw
}

/// Release a string produced by [`export_c_string`].
///
/// # Safety
///
/// `ptr` is null or an address previously returned by [`export_c_string`].
pub unsafe fn release_c_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    if !unregister(ptr as usize, HandleKind::CString) {
        tracing::warn!(address = ptr as usize, "Ignoring release of a string that is not live");
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
}

/// Hand `value` to the caller as a registered heap handle.
pub fn export_handle<T>(value: T, kind: HandleKind) -> *mut T {
    let raw = Box::into_raw(Box::new(value));
    register(raw as usize, kind);
    raw
}

/// Take back ownership of a handle produced by [`export_handle`].
///
/// Returns `None` for null, and for addresses that are not live with `kind`.
///
/// # Safety
///
/// `ptr` is null or an address previously returned by [`export_handle`]
/// with the same `T` and `kind`.
pub unsafe fn reclaim_handle<T>(ptr: *mut T, kind: HandleKind) -> Option<Box<T>> {
    if ptr.is_null() {
        return None;
    }
    if !unregister(ptr as usize, kind) {
        tracing::warn!(address = ptr as usize, ?kind, "Ignoring release of a handle that is not live");
        return None;
    }
    Some(unsafe { Box::from_raw(ptr) })
}

/// Borrow a caller-supplied C string as UTF-8.
///
/// `Ok(None)` for null, `Err` with a reason for invalid UTF-8.
///
/// # Safety
///
/// `ptr` is null or points to a NUL-terminated string that stays valid for `'a`.
pub unsafe fn borrow_c_str<'a>(ptr: *const c_char) -> Result<Option<&'a str>, String> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(Some)
        .map_err(|e| format!("input is not valid UTF-8: {}", e))
}
