//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations: C strings
//! instead of `String`, pointer plus length instead of `Vec<u8>`, and enums with
//! explicit discriminants. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use netkit_core::{ErrorAlert, ErrorKind, PendingTask, RawResult, RequestClient, TaskState};

/// Opaque handle to a `RequestClient`.
pub struct FfiRequestClient {
    pub(crate) inner: RequestClient,
}

/// Opaque handle to an in-flight request.
pub struct FfiPendingTask {
    pub(crate) inner: PendingTask,
}

/// Completion called exactly once per request with an owned result. The
/// callee must release the result with `netkit_free_result`.
pub type FfiCompletion = Option<extern "C" fn(result: *mut FfiRawResult, user_data: *mut c_void)>;

/// Carries the C completion and its context pointer to whichever thread
/// delivers the result.
pub(crate) struct CallbackContext {
    callback: extern "C" fn(*mut FfiRawResult, *mut c_void),
    user_data: *mut c_void,
}

// The host promises `user_data` may be used from any thread.
unsafe impl Send for CallbackContext {}

impl CallbackContext {
    pub(crate) fn new(
        callback: extern "C" fn(*mut FfiRawResult, *mut c_void),
        user_data: *mut c_void,
    ) -> Self {
        Self { callback, user_data }
    }

    pub(crate) fn complete(self, result: RawResult) {
        (self.callback)(FfiRawResult::from_core(result), self.user_data);
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Error codes carried by `FfiRawResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Transport = 2,
    EmptyBody = 3,
    Decoding = 4,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidUrl => FfiErrorCode::InvalidUrl,
            ErrorKind::Transport => FfiErrorCode::Transport,
            ErrorKind::EmptyBody => FfiErrorCode::EmptyBody,
            ErrorKind::Decoding => FfiErrorCode::Decoding,
        }
    }
}

/// Request lifecycle as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiTaskState {
    InFlight = 0,
    Succeeded = 1,
    Failed = 2,
}

impl From<TaskState> for FfiTaskState {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::InFlight => FfiTaskState::InFlight,
            TaskState::Succeeded => FfiTaskState::Succeeded,
            TaskState::Failed => FfiTaskState::Failed,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of a request.
///
/// On success `error_code` is `Ok`, `error_message` is null and
/// `data`/`data_len` hold the body. On failure `data` is null and
/// `error_message` is a non-empty description. `cancelled` is set when a
/// transport failure came from cancellation.
#[repr(C)]
pub struct FfiRawResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub cancelled: bool,
    pub data: *mut u8,
    pub data_len: usize,
}

impl FfiRawResult {
    pub(crate) fn from_core(result: RawResult) -> *mut Self {
        let ffi = match result {
            Ok(bytes) => {
                let bytes = bytes.into_boxed_slice();
                let data_len = bytes.len();
                FfiRawResult {
                    error_code: FfiErrorCode::Ok,
                    error_message: std::ptr::null_mut(),
                    cancelled: false,
                    data: Box::into_raw(bytes) as *mut u8,
                    data_len,
                }
            }
            Err(err) => FfiRawResult {
                error_code: err.kind().into(),
                error_message: c_string(err.description()),
                cancelled: err.is_cancelled(),
                data: std::ptr::null_mut(),
                data_len: 0,
            },
        };
        Box::into_raw(Box::new(ffi))
    }
}

// ---------------------------------------------------------------------------
// Error alert
// ---------------------------------------------------------------------------

/// Texts for a single-button error dialog. `message` may be null.
#[repr(C)]
pub struct FfiErrorAlert {
    pub title: *mut c_char,
    pub message: *mut c_char,
    pub done_button_title: *mut c_char,
}

impl FfiErrorAlert {
    pub(crate) fn from_core(alert: ErrorAlert) -> *mut Self {
        let message = match alert.message {
            Some(m) => c_string(m),
            None => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiErrorAlert {
            title: c_string(alert.title),
            message,
            done_button_title: c_string(alert.done_button_title),
        }))
    }
}

/// Convert to an owned C string, dropping interior NULs.
fn c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') { s.replace('\0', "") } else { s };
    CString::new(s).unwrap_or_default().into_raw()
}
