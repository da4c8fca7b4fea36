//! C-ABI wrapper around `netkit-core`.
//!
//! # Overview
//! Lets a mobile host (Swift, Kotlin/JNI, anything with a C FFI) issue
//! single-shot HTTP requests and receive the body bytes or a typed failure
//! through a C callback. Decoding stays on the host side, in its own type
//! system; errors arrive as a code plus a ready-to-display description.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Requests run on one process-wide multi-thread tokio runtime built on
//!   first use. Callbacks fire on its worker threads, except `InvalidUrl`
//!   which fires on the calling thread before `netkit_request` returns.
//! - The host owns every pointer it receives and releases it with the
//!   matching `netkit_*_free` function.

pub mod types;

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use netkit_core::{ErrorAlert, HttpMethod, RequestClient, ReqwestTransport, TaskState};
use tokio::runtime::{Builder, Runtime};

use types::*;

static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();

fn runtime() -> Option<&'static Runtime> {
    RUNTIME
        .get_or_init(|| {
            match Builder::new_multi_thread()
                .enable_all()
                .thread_name("netkit-worker")
                .build()
            {
                Ok(rt) => Some(rt),
                Err(e) => {
                    log::error!("failed to start request runtime: {e}");
                    None
                }
            }
        })
        .as_ref()
}

/// Map the C method code onto `HttpMethod`: 0 = GET, 1 = POST.
fn method_from_code(code: i32) -> Option<HttpMethod> {
    match code {
        0 => Some(HttpMethod::Get),
        1 => Some(HttpMethod::Post),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Route library logs to stderr, filtered by `RUST_LOG`.
///
/// Returns false if a logger was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_init_logging() -> bool {
    catch_unwind(|| env_logger::try_init().is_ok()).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client backed by the default reqwest transport.
///
/// Returns null if the runtime cannot be started or an internal panic occurs.
/// The caller must free the returned pointer with `netkit_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_client_new() -> *mut FfiRequestClient {
    catch_unwind(|| {
        let Some(rt) = runtime() else {
            return std::ptr::null_mut();
        };
        let client = RequestClient::new(ReqwestTransport::new(), rt.handle().clone());
        Box::into_raw(Box::new(FfiRequestClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `netkit_client_new`. Requests already in flight
/// still complete. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_client_free(client: *mut FfiRequestClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Issue a request to `address` with `method` (0 = GET, 1 = POST).
///
/// `callback` receives an owned `FfiRawResult` exactly once, together with
/// `user_data`. A null or non-UTF-8 `address` counts as an invalid URL.
/// Returns null, without calling `callback`, if `client` or `callback` is
/// null or `method` is unknown. Otherwise the caller must free the returned
/// handle with `netkit_task_free`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_request(
    client: *const FfiRequestClient,
    address: *const c_char,
    method: i32,
    callback: FfiCompletion,
    user_data: *mut c_void,
) -> *mut FfiPendingTask {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let Some(callback) = callback else {
            return std::ptr::null_mut();
        };
        let Some(method) = method_from_code(method) else {
            return std::ptr::null_mut();
        };
        let client = unsafe { &*client };
        let address = if address.is_null() {
            ""
        } else {
            unsafe { CStr::from_ptr(address) }.to_str().unwrap_or("")
        };

        let context = CallbackContext::new(callback, user_data);
        let task = client
            .inner
            .request(address, method, move |result| context.complete(result));
        Box::into_raw(Box::new(FfiPendingTask { inner: task }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Current state of a request. A null task reports `Failed`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_task_state(task: *const FfiPendingTask) -> FfiTaskState {
    catch_unwind(AssertUnwindSafe(|| {
        if task.is_null() {
            return FfiTaskState::Failed;
        }
        unsafe { &*task }.inner.state().into()
    }))
    .unwrap_or(FfiTaskState::Failed)
}

/// Cancel a request. If it has not completed, its callback receives a
/// `Transport` failure with `cancelled` set, on the calling thread.
/// No-op for finished requests and for null.
///
/// The callback may free `task` with `netkit_task_free`; the handle is not
/// read once the callback runs.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_task_cancel(task: *const FfiPendingTask) {
    if task.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let pending = unsafe { &*task }.inner.clone();
        pending.cancel();
    }));
}

/// Free a task handle. Does not cancel the request. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_task_free(task: *mut FfiPendingTask) {
    if task.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let task = unsafe { Box::from_raw(task) };
        if task.inner.state() == TaskState::InFlight {
            log::debug!("releasing handle of an in-flight request");
        }
    }));
}

// ---------------------------------------------------------------------------
// Error alert
// ---------------------------------------------------------------------------

/// Build the error dialog texts for a failed result.
///
/// Returns null if `result` is null or succeeded. The caller must free the
/// returned pointer with `netkit_free_error_alert`.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_error_alert(result: *const FfiRawResult) -> *mut FfiErrorAlert {
    catch_unwind(AssertUnwindSafe(|| {
        if result.is_null() {
            return std::ptr::null_mut();
        }
        let result = unsafe { &*result };
        if result.error_code == FfiErrorCode::Ok || result.error_message.is_null() {
            return std::ptr::null_mut();
        }
        let message = unsafe { CStr::from_ptr(result.error_message) }
            .to_string_lossy()
            .into_owned();
        FfiErrorAlert::from_core(ErrorAlert::new(Some(message)))
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a result passed to a completion callback. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_free_result(result: *mut FfiRawResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.data.is_null() {
            let data = std::ptr::slice_from_raw_parts_mut(result.data, result.data_len);
            drop(unsafe { Box::from_raw(data) });
        }
    }));
}

/// Free an alert returned by `netkit_error_alert`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn netkit_free_error_alert(alert: *mut FfiErrorAlert) {
    if alert.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let alert = unsafe { Box::from_raw(alert) };
        for s in [alert.title, alert.message, alert.done_button_title] {
            if !s.is_null() {
                drop(unsafe { CString::from_raw(s) });
            }
        }
    }));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Collects what the completion received.
    #[derive(Default)]
    struct Seen {
        calls: AtomicUsize,
        codes: Mutex<Vec<FfiErrorCode>>,
        messages: Mutex<Vec<String>>,
    }

    extern "C" fn record(result: *mut FfiRawResult, user_data: *mut c_void) {
        let seen = unsafe { &*(user_data as *const Seen) };
        let r = unsafe { &*result };
        seen.calls.fetch_add(1, Ordering::SeqCst);
        seen.codes.lock().unwrap().push(r.error_code);
        if !r.error_message.is_null() {
            let msg = unsafe { CStr::from_ptr(r.error_message) }.to_str().unwrap();
            seen.messages.lock().unwrap().push(msg.to_string());
        }
        netkit_free_result(result);
    }

    fn user_data(seen: &Seen) -> *mut c_void {
        seen as *const Seen as *mut c_void
    }

    #[test]
    fn client_new_and_free() {
        let client = netkit_client_new();
        assert!(!client.is_null());
        netkit_client_free(client);
    }

    #[test]
    fn client_free_null_is_safe() {
        netkit_client_free(std::ptr::null_mut());
    }

    #[test]
    fn request_null_client_returns_null() {
        let seen = Seen::default();
        let address = CString::new("http://localhost:3000/items").unwrap();
        let task = netkit_request(std::ptr::null(), address.as_ptr(), 0, Some(record), user_data(&seen));
        assert!(task.is_null());
        assert_eq!(seen.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn request_null_callback_returns_null() {
        let client = netkit_client_new();
        let address = CString::new("http://localhost:3000/items").unwrap();
        let task = netkit_request(client, address.as_ptr(), 0, None, std::ptr::null_mut());
        assert!(task.is_null());
        netkit_client_free(client);
    }

    #[test]
    fn request_unknown_method_returns_null() {
        let seen = Seen::default();
        let client = netkit_client_new();
        let address = CString::new("http://localhost:3000/items").unwrap();
        let task = netkit_request(client, address.as_ptr(), 7, Some(record), user_data(&seen));
        assert!(task.is_null());
        assert_eq!(seen.calls.load(Ordering::SeqCst), 0);
        netkit_client_free(client);
    }

    #[test]
    fn invalid_url_completes_before_returning() {
        let seen = Seen::default();
        let client = netkit_client_new();
        let address = CString::new("not a url").unwrap();
        let task = netkit_request(client, address.as_ptr(), 0, Some(record), user_data(&seen));
        assert!(!task.is_null());
        assert_eq!(seen.calls.load(Ordering::SeqCst), 1);
        assert_eq!(seen.codes.lock().unwrap()[0], FfiErrorCode::InvalidUrl);
        assert!(!seen.messages.lock().unwrap()[0].is_empty());
        assert_eq!(netkit_task_state(task), FfiTaskState::Failed);

        // Cancelling a finished task does not call back again.
        netkit_task_cancel(task);
        assert_eq!(seen.calls.load(Ordering::SeqCst), 1);

        netkit_task_free(task);
        netkit_client_free(client);
    }

    #[test]
    fn null_address_is_invalid_url() {
        let seen = Seen::default();
        let client = netkit_client_new();
        let task = netkit_request(client, std::ptr::null(), 1, Some(record), user_data(&seen));
        assert_eq!(seen.codes.lock().unwrap().as_slice(), &[FfiErrorCode::InvalidUrl]);
        netkit_task_free(task);
        netkit_client_free(client);
    }

    #[test]
    fn task_functions_accept_null() {
        assert_eq!(netkit_task_state(std::ptr::null()), FfiTaskState::Failed);
        netkit_task_cancel(std::ptr::null());
        netkit_task_free(std::ptr::null_mut());
        netkit_free_result(std::ptr::null_mut());
        netkit_free_error_alert(std::ptr::null_mut());
        assert!(netkit_error_alert(std::ptr::null()).is_null());
    }

    #[test]
    fn success_result_carries_bytes() {
        let result = FfiRawResult::from_core(Ok(b"{\"id\":1}".to_vec()));
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        let data = unsafe { std::slice::from_raw_parts(r.data, r.data_len) };
        assert_eq!(data, b"{\"id\":1}");
        assert!(netkit_error_alert(result).is_null());
        netkit_free_result(result);
    }

    #[test]
    fn error_alert_uses_failure_description() {
        let result = FfiRawResult::from_core(Err(netkit_core::NetworkError::EmptyBody));
        let alert = netkit_error_alert(result);
        assert!(!alert.is_null());
        let a = unsafe { &*alert };
        let title = unsafe { CStr::from_ptr(a.title) }.to_str().unwrap();
        let message = unsafe { CStr::from_ptr(a.message) }.to_str().unwrap();
        let button = unsafe { CStr::from_ptr(a.done_button_title) }.to_str().unwrap();
        assert_eq!(title, "Error");
        assert_eq!(message, netkit_core::NetworkError::EmptyBody.description());
        assert_eq!(button, "OK");
        netkit_free_error_alert(alert);
        netkit_free_result(result);
    }

    #[test]
    fn cancelled_flag_is_set_for_cancellation() {
        let err = netkit_core::NetworkError::transport(netkit_core::Cancelled);
        let result = FfiRawResult::from_core(Err(err));
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Transport);
        assert!(r.cancelled);
        assert!(r.data.is_null());
        netkit_free_result(result);
    }
}
