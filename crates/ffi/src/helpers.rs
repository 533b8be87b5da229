use crate::error::{with_last_error_mut, CanopySimError, CanopySimErrorCode, DefaultCanopySimError};
use crate::simulation::CanopySimResult;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl CanopySimError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl CanopySimError) -> CanopySimErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = CanopySimErrorCode::Ok;
    });
}

/// Run `f`, recording its error (or clearing the last one) and returning the code.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> CanopySimErrorCode
where
    F: FnOnce() -> Result<(), DefaultCanopySimError>,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            CanopySimErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow a result handle, rejecting null.
///
/// # Safety
/// `ptr` must be null or a live pointer returned by `canopy_sim_run`.
pub(crate) unsafe fn result_from_ptr<'a>(
    ptr: *const CanopySimResult,
) -> Result<&'a CanopySimResult, DefaultCanopySimError> {
    // SAFETY: caller guarantees `ptr` is null or valid; null is rejected here
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultCanopySimError::null_pointer("result"))
}

/// Copy a C string into an owned `String`.
///
/// # Safety
/// `ptr` must be null or point to a null-terminated string.
pub(crate) unsafe fn string_from_c(
    ptr: *const c_char,
    param_name: &str,
) -> Result<String, DefaultCanopySimError> {
    if ptr.is_null() {
        return Err(DefaultCanopySimError::null_pointer(param_name));
    }
    // SAFETY: non-null and null-terminated per the caller contract
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(str::to_owned)
        .map_err(|_| DefaultCanopySimError::invalid_parameter(param_name, "not valid UTF-8"))
}

/// View a C array as a slice; a zero length accepts a null pointer.
///
/// # Safety
/// When `len > 0`, `ptr` must point to `len` initialized values.
pub(crate) unsafe fn slice_from_c<'a, T>(
    ptr: *const T,
    len: usize,
    param_name: &str,
) -> Result<&'a [T], DefaultCanopySimError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(DefaultCanopySimError::null_pointer(param_name));
    }
    // SAFETY: non-null with `len` elements per the caller contract
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}
