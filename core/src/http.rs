//! HTTP request and response values exchanged with a [`Transport`].
//!
//! # Design
//! These types describe a single round-trip as plain data. `RequestClient`
//! builds an `HttpRequest` per call and hands it to the transport, which
//! answers with an `HttpResponse`. Neither type carries connection state, so
//! a transport is free to open a fresh session for every request.
//!
//! [`Transport`]: crate::transport::Transport

use std::fmt;

use url::Url;

/// Headers attached to every outbound request.
pub const DEFAULT_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// The upper-case verb as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound HTTP call.
///
/// Built fresh by `RequestClient` for every call and never mutated after
/// construction. Headers always come from [`DEFAULT_HEADERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: &'static [(&'static str, &'static str)],
}

impl HttpRequest {
    pub fn new(url: Url, method: HttpMethod) -> Self {
        Self {
            method,
            url,
            headers: DEFAULT_HEADERS,
        }
    }
}

/// What a transport returns after a completed round-trip.
///
/// `body` is `None` when the transport received no payload at all. The status
/// code is informational: `RequestClient` logs it but does not turn non-2xx
/// responses into errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    /// A response that arrived without any body.
    pub fn without_body(status: u16) -> Self {
        Self { status, body: None }
    }
}
