//! The network seam used by `RequestClient`.
//!
//! # Design
//! A transport executes one `HttpRequest` and reports either the raw response
//! or the error that prevented it. It is the only place that touches the
//! network, so tests swap in a stub and hosts can plug in any HTTP library.
//! `ReqwestTransport` is the default and opens a new `reqwest::Client` (and so
//! a new connection pool) for every request.

use std::future::Future;

use crate::error::BoxError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
pub trait Transport: Send + Sync + 'static {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send;
}

/// Transport backed by `reqwest`, with no connection reuse across calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
        execute(request)
    }
}

async fn execute(request: HttpRequest) -> Result<HttpResponse, BoxError> {
    let client = reqwest::Client::builder().build()?;

    let method = match request.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
    };
    let mut builder = client.request(method, request.url);
    for (name, value) in request.headers {
        builder = builder.header(*name, *value);
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();

    // Collect the whole body; no streaming.
    let body = response.bytes().await?;

    Ok(HttpResponse {
        status,
        body: Some(body.to_vec()),
    })
}
