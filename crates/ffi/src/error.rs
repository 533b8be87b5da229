use canopy_sim_core::SimulationError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait CanopySimError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> CanopySimErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `CanopySimError` for the FFI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultCanopySimError {
    code: CanopySimErrorCode,
    msg: String,
}

impl DefaultCanopySimError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_result"`, `"trees"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: CanopySimErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for an invalid argument with a custom message.
    pub fn invalid_parameter(param_name: &str, message: &str) -> Self {
        Self {
            code: CanopySimErrorCode::InvalidParameter,
            msg: format!("Parameter '{param_name}': {message}"),
        }
    }

    /// Create error for an index past the end of a grid or zone list.
    pub fn out_of_range(what: &str, index: usize, len: usize) -> Self {
        Self {
            code: CanopySimErrorCode::OutOfRange,
            msg: format!("{what} index {index} out of range (len {len})"),
        }
    }
}

impl From<SimulationError> for DefaultCanopySimError {
    fn from(error: SimulationError) -> Self {
        let code = match error {
            SimulationError::InvalidInput { .. } => CanopySimErrorCode::InvalidInput,
            SimulationError::GridTooLarge { .. } => CanopySimErrorCode::GridTooLarge,
            SimulationError::UnknownCity(_) => CanopySimErrorCode::UnknownCity,
            SimulationError::Cancelled { .. } => CanopySimErrorCode::Cancelled,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl CanopySimError for DefaultCanopySimError {
    fn code(&self) -> CanopySimErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by canopy simulation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanopySimErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid parameter passed to function (bad UTF-8, unknown enum value, ...).
    InvalidParameter = 2,

    /// The simulation rejected its input (non-finite coordinates or wind).
    InvalidInput = 3,

    /// The requested city id is not in the registry.
    UnknownCity = 4,

    /// The city grid at the configured resolution exceeds the cell limit.
    GridTooLarge = 5,

    /// Row, column or zone index past the end.
    OutOfRange = 6,

    /// The run was cancelled between stages.
    Cancelled = 7,
}

impl From<DefaultCanopySimError> for CanopySimErrorCode {
    fn from(error: DefaultCanopySimError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` is kept here so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, CanopySimErrorCode)> =
        const { RefCell::new((None, CanopySimErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, CanopySimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, CanopySimErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if an error occurred.
/// - `null` if the last call on this thread succeeded.
///
/// The returned pointer is valid until the next FFI call on this thread.
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// CanopySimResult* result = NULL;
/// CanopySimErrorCode err = canopy_sim_run(&request, &result);
/// if (err != Ok) {
///     const char* error = canopy_sim_get_last_error();
///     if (error) {
///         fprintf(stderr, "Simulation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn canopy_sim_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` when the last call succeeded).
#[no_mangle]
pub extern "C" fn canopy_sim_get_last_error_code() -> CanopySimErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
