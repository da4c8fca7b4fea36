//! JSON decoding of raw request outcomes.
//!
//! Failures pass through untouched; only a successful payload is parsed.

use serde::de::DeserializeOwned;

use crate::error::NetworkError;
use crate::{DecodedResult, RawResult};

/// Decode `raw` into `T` and hand the outcome to `on_complete`.
///
/// Runs synchronously on the caller's thread.
pub fn decode<T, F>(raw: RawResult, on_complete: F)
where
    T: DeserializeOwned,
    F: FnOnce(DecodedResult<T>),
{
    on_complete(decode_result(raw));
}

/// Return-value form of [`decode`].
pub fn decode_result<T: DeserializeOwned>(raw: RawResult) -> DecodedResult<T> {
    let bytes = raw?;
    serde_json::from_slice(&bytes).map_err(NetworkError::decoding)
}
