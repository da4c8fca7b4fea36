//! One request, one outcome.
//!
//! # Design
//! `RequestClient` holds only a transport and a runtime handle and carries no
//! state between calls. Every call builds a fresh `HttpRequest`, spawns the
//! round-trip on the runtime and returns a `PendingTask` straight away. The
//! outcome reaches the completion exactly once, on a runtime worker thread,
//! except for `InvalidUrl` which is reported synchronously before anything is
//! spawned.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::oneshot;
use url::Url;

use crate::decode::decode_result;
use crate::error::{BoxError, Cancelled, NetworkError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::task::{Delivery, DeliveryGuard, PendingTask};
use crate::transport::{ReqwestTransport, Transport};
use crate::{DecodedResult, RawResult};

/// Issues single HTTP requests through a [`Transport`].
pub struct RequestClient<T = ReqwestTransport> {
    transport: Arc<T>,
    runtime: Handle,
}

impl<T: Transport> RequestClient<T> {
    /// Create a client that spawns requests onto `runtime`.
    pub fn new(transport: T, runtime: Handle) -> Self {
        Self {
            transport: Arc::new(transport),
            runtime,
        }
    }

    /// Create a client bound to the runtime the caller is running in.
    pub fn with_current_runtime(transport: T) -> Result<Self, TryCurrentError> {
        Ok(Self::new(transport, Handle::try_current()?))
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Parse `address` and issue the request.
    ///
    /// An address that is not an absolute URL completes with
    /// `NetworkError::InvalidUrl` before this returns, without touching the
    /// transport.
    pub fn request<F>(&self, address: &str, method: HttpMethod, on_complete: F) -> PendingTask
    where
        F: FnOnce(RawResult) + Send + 'static,
    {
        match Url::parse(address) {
            Ok(url) => self.request_url(url, method, on_complete),
            Err(e) => {
                log::warn!("rejecting {method} request to {address:?}: {e}");
                let delivery = Delivery::new(Box::new(on_complete));
                delivery.deliver(Err(NetworkError::InvalidUrl));
                PendingTask::completed(delivery)
            }
        }
    }

    /// Issue a request to an already-parsed URL.
    pub fn request_url<F>(&self, url: Url, method: HttpMethod, on_complete: F) -> PendingTask
    where
        F: FnOnce(RawResult) + Send + 'static,
    {
        let request = HttpRequest::new(url, method);
        log::debug!("sending {} {}", request.method, request.url);

        let delivery = Delivery::new(Box::new(on_complete));
        let guard = DeliveryGuard::new(Arc::clone(&delivery));
        let transport = Arc::clone(&self.transport);

        let handle = self.runtime.spawn(async move {
            let method = request.method;
            let url = request.url.clone();
            let outcome = transport.send(request).await;
            guard.complete(into_raw_result(method, &url, outcome));
        });

        PendingTask::spawned(delivery, handle.abort_handle())
    }

    /// Issue a request and decode a successful body into `D`.
    pub fn request_json<D, F>(&self, address: &str, method: HttpMethod, on_complete: F) -> PendingTask
    where
        D: DeserializeOwned,
        F: FnOnce(DecodedResult<D>) + Send + 'static,
    {
        self.request(address, method, move |raw| on_complete(decode_result(raw)))
    }

    /// Future form of [`request`](Self::request).
    ///
    /// The request keeps running if the returned future is dropped.
    pub async fn fetch(&self, address: &str, method: HttpMethod) -> RawResult {
        let (tx, rx) = oneshot::channel();
        self.request(address, method, move |result| {
            // The receiver may already be gone; nothing to report then.
            let _ = tx.send(result);
        });
        rx.await.unwrap_or_else(|_| Err(NetworkError::transport(Cancelled)))
    }

    /// Future form of [`request_json`](Self::request_json).
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        address: &str,
        method: HttpMethod,
    ) -> DecodedResult<D> {
        decode_result(self.fetch(address, method).await)
    }
}

/// Map a transport outcome onto the request's single result.
fn into_raw_result(
    method: HttpMethod,
    url: &Url,
    outcome: Result<HttpResponse, BoxError>,
) -> RawResult {
    match outcome {
        Err(e) => {
            log::warn!("{method} {url} failed: {e}");
            Err(NetworkError::transport(e))
        }
        Ok(response) => {
            log::debug!("{method} {url} -> {}", response.status);
            match response.body {
                Some(body) if !body.is_empty() => Ok(body),
                _ => Err(NetworkError::EmptyBody),
            }
        }
    }
}

impl<T> Clone for RequestClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T> fmt::Debug for RequestClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestClient").finish_non_exhaustive()
    }
}
