//! Single-shot HTTP requests with typed JSON decoding.
//!
//! # Overview
//! `RequestClient` issues one GET or POST per call and reports exactly one
//! outcome through a completion callback: the raw body bytes or a
//! `NetworkError`. `decode` turns that raw outcome into any
//! `serde::Deserialize` type. `ErrorAlert` packages a failure as text for the
//! host's error dialog.
//!
//! # Design
//! - `RequestClient` is stateless; each call builds its own `HttpRequest` and
//!   the default transport opens its own session.
//! - The network sits behind the `Transport` trait so hosts and tests can
//!   substitute their own.
//! - Requests run on a caller-supplied tokio runtime; the completion runs on a
//!   runtime worker thread, never blocking the caller.
//! - Nothing panics or returns early across the API boundary: every failure
//!   ends up in `NetworkError`.

pub mod alert;
pub mod client;
pub mod decode;
pub mod error;
pub mod http;
pub mod task;
pub mod transport;

pub use alert::ErrorAlert;
pub use client::RequestClient;
pub use decode::{decode, decode_result};
pub use error::{BoxError, Cancelled, ErrorKind, NetworkError, TransportPanicked};
pub use http::{HttpMethod, HttpRequest, HttpResponse, DEFAULT_HEADERS};
pub use task::{PendingTask, TaskState};
pub use transport::{ReqwestTransport, Transport};

/// Outcome of a request before decoding.
pub type RawResult = Result<Vec<u8>, NetworkError>;

/// Outcome of a request after JSON decoding into `T`.
pub type DecodedResult<T> = Result<T, NetworkError>;
