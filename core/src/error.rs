//! Error taxonomy for request and decode outcomes.
//!
//! # Design
//! `NetworkError` is a closed set: every failed request ends in exactly one
//! variant. Transport and decoding failures keep their underlying cause when
//! one exists. Causes are reference-counted so the error stays `Clone` and can
//! be handed to several observers (callback, logs, alert) without losing
//! `source()`.
//!
//! Every variant renders a non-empty description. When a cause is missing or
//! renders as an empty string, a fixed sentence for that variant is used
//! instead.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Error type accepted from transports.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Shared, cloneable underlying cause.
pub type Cause = Arc<dyn StdError + Send + Sync>;

const INVALID_URL: &str = "The request URL is invalid.";
const TRANSPORT_FALLBACK: &str = "The network request failed.";
const EMPTY_BODY: &str = "The server returned an empty response.";
const DECODING_FALLBACK: &str = "The response could not be decoded.";

/// Failure delivered in place of a response.
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    /// The address could not be parsed as an absolute URL.
    #[error("{}", INVALID_URL)]
    InvalidUrl,

    /// The transport failed: connection refused, DNS, TLS, timeout, or the
    /// request was cancelled.
    #[error("{}", describe(.0, TRANSPORT_FALLBACK))]
    Transport(#[source] Option<Cause>),

    /// The transport completed but delivered no bytes.
    #[error("{}", EMPTY_BODY)]
    EmptyBody,

    /// The body was not valid JSON or did not match the target type.
    #[error("{}", describe(.0, DECODING_FALLBACK))]
    Decoding(#[source] Option<Cause>),
}

/// Fieldless discriminant of [`NetworkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    Transport,
    EmptyBody,
    Decoding,
}

impl NetworkError {
    pub fn transport(cause: impl Into<BoxError>) -> Self {
        NetworkError::Transport(Some(Arc::from(cause.into())))
    }

    pub fn decoding(cause: impl Into<BoxError>) -> Self {
        NetworkError::Decoding(Some(Arc::from(cause.into())))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::InvalidUrl => ErrorKind::InvalidUrl,
            NetworkError::Transport(_) => ErrorKind::Transport,
            NetworkError::EmptyBody => ErrorKind::EmptyBody,
            NetworkError::Decoding(_) => ErrorKind::Decoding,
        }
    }

    /// Human-readable text suitable for an error dialog. Never empty.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// The underlying cause, for transport and decoding failures.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            NetworkError::Transport(cause) | NetworkError::Decoding(cause) => cause.as_ref(),
            NetworkError::InvalidUrl | NetworkError::EmptyBody => None,
        }
    }

    /// True when this is the failure delivered for a cancelled request.
    pub fn is_cancelled(&self) -> bool {
        self.cause().is_some_and(|c| c.is::<Cancelled>())
    }
}

/// Cause attached to `NetworkError::Transport` when a request is cancelled
/// or its task is dropped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the request was cancelled")]
pub struct Cancelled;

/// Cause attached to `NetworkError::Transport` when the transport panicked
/// while executing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the transport failed unexpectedly")]
pub struct TransportPanicked;

fn describe(cause: &Option<Cause>, fallback: &str) -> String {
    match cause {
        Some(cause) => {
            let message = cause.to_string();
            if message.trim().is_empty() {
                fallback.to_string()
            } else {
                message
            }
        }
        None => fallback.to_string(),
    }
}
