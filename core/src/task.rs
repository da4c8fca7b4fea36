//! Handle to an in-flight request and the single-delivery slot behind it.
//!
//! # Design
//! Each request owns one `Delivery`, shared between the spawned task, the
//! `PendingTask` handle and a drop guard. Whoever takes the completion first
//! delivers; every later attempt is a no-op. That covers the races between
//! normal completion, `cancel()` and the runtime dropping the task.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;

use crate::error::{Cancelled, NetworkError, TransportPanicked};
use crate::RawResult;

pub(crate) type Completion = Box<dyn FnOnce(RawResult) + Send + 'static>;

/// Lifecycle of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    InFlight,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskState::InFlight)
    }
}

struct Slot {
    on_complete: Option<Completion>,
    state: TaskState,
}

pub(crate) struct Delivery {
    slot: Mutex<Slot>,
}

impl Delivery {
    pub(crate) fn new(on_complete: Completion) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Slot {
                on_complete: Some(on_complete),
                state: TaskState::InFlight,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand `result` to the completion if nobody has yet. Returns whether
    /// this call delivered.
    pub(crate) fn deliver(&self, result: RawResult) -> bool {
        let on_complete = {
            let mut slot = self.lock();
            let Some(on_complete) = slot.on_complete.take() else {
                return false;
            };
            slot.state = if result.is_ok() {
                TaskState::Succeeded
            } else {
                TaskState::Failed
            };
            on_complete
        };
        // Run the callback outside the lock so it may inspect the task.
        on_complete(result);
        true
    }

    pub(crate) fn state(&self) -> TaskState {
        self.lock().state
    }
}

/// Owned by the spawned future. Delivers a failure if the future is dropped
/// before it completes: a cancellation for abort and runtime shutdown, a
/// `TransportPanicked` cause when the drop happens while unwinding.
pub(crate) struct DeliveryGuard(Arc<Delivery>);

impl DeliveryGuard {
    pub(crate) fn new(delivery: Arc<Delivery>) -> Self {
        Self(delivery)
    }

    pub(crate) fn complete(self, result: RawResult) {
        self.0.deliver(result);
    }
}

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if self.0.deliver(Err(NetworkError::transport(TransportPanicked))) {
                log::error!("transport panicked while executing request");
            }
        } else if self.0.deliver(Err(NetworkError::transport(Cancelled))) {
            log::debug!("request task dropped before completing");
        }
    }
}

/// Handle to a request returned by `RequestClient::request`.
///
/// Dropping the handle does not cancel the request. Clones refer to the same
/// request.
#[derive(Clone)]
pub struct PendingTask {
    delivery: Arc<Delivery>,
    abort: Option<AbortHandle>,
}

impl PendingTask {
    pub(crate) fn spawned(delivery: Arc<Delivery>, abort: AbortHandle) -> Self {
        Self {
            delivery,
            abort: Some(abort),
        }
    }

    /// A task whose outcome was delivered before any work was scheduled.
    pub(crate) fn completed(delivery: Arc<Delivery>) -> Self {
        Self {
            delivery,
            abort: None,
        }
    }

    pub fn state(&self) -> TaskState {
        self.delivery.state()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Cancel the request. If it has not completed yet, the completion
    /// receives `NetworkError::Transport` with a [`Cancelled`] cause on the
    /// calling thread. No-op once the task is terminal.
    ///
    /// The completion may release this handle; nothing of `self` is touched
    /// once it runs.
    pub fn cancel(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
        let delivery = Arc::clone(&self.delivery);
        if delivery.deliver(Err(NetworkError::transport(Cancelled))) {
            log::debug!("request cancelled");
        }
    }
}

impl fmt::Debug for PendingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTask")
            .field("state", &self.state())
            .finish()
    }
}
