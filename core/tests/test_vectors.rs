//! Check address validation and decoding against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Address cases run through a recording transport so the test can see
//! whether a session was opened and which URL it received. Decode cases
//! compare parsed JSON values, not raw strings.

use std::future::Future;
use std::sync::Mutex;

use netkit_core::{
    decode_result, BoxError, ErrorKind, HttpMethod, HttpRequest, HttpResponse, RequestClient,
    Transport,
};
use serde::{Deserialize, Serialize};

/// Transport that records every request and answers with a fixed body.
#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<HttpRequest>>,
}

impl Transport for Recorder {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, BoxError>> + Send {
        self.requests.lock().unwrap().push(request);
        async { Ok::<_, BoxError>(HttpResponse::new(200, "{}")) }
    }
}

/// Parse the kind names used by the vectors.
fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "InvalidUrl" => ErrorKind::InvalidUrl,
        "Transport" => ErrorKind::Transport,
        "EmptyBody" => ErrorKind::EmptyBody,
        "Decoding" => ErrorKind::Decoding,
        other => panic!("unknown error kind: {other}"),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Item {
    id: u64,
    name: String,
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn address_test_vectors() {
    let raw = include_str!("../../test-vectors/addresses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let address = case["address"].as_str().unwrap();
        let valid = case["valid"].as_bool().unwrap();

        let client = RequestClient::with_current_runtime(Recorder::default()).unwrap();
        let result = client.fetch(address, HttpMethod::Get).await;
        let requests = client.transport().requests.lock().unwrap();

        if valid {
            assert!(result.is_ok(), "{name}: {result:?}");
            assert_eq!(requests.len(), 1, "{name}: sessions");
            assert_eq!(requests[0].url.as_str(), case["url"].as_str().unwrap(), "{name}: url");
            assert_eq!(requests[0].method, HttpMethod::Get, "{name}: method");
        } else {
            let err = result.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidUrl, "{name}: kind");
            assert!(requests.is_empty(), "{name}: no session expected");
        }
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

#[test]
fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/decode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let body = case["body"].as_str().unwrap().as_bytes().to_vec();
        let expected = &case["expected"];

        let result = decode_result::<Item>(Ok(body));
        if let Some(value) = expected.get("ok") {
            let item = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(serde_json::to_value(&item).unwrap(), *value, "{name}: value");
        } else {
            let kind = parse_kind(expected["error"].as_str().unwrap());
            let err = result.unwrap_err();
            assert_eq!(err.kind(), kind, "{name}: kind");
            assert!(!err.description().is_empty(), "{name}: description");
        }
    }
}
