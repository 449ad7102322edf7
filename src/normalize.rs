//! Result normalizer — raw transport outcomes to the uniform result shape.
//!
//! Mapping order:
//!
//! 1. transport-level failure → `Transport` failure
//! 2. status ≠ 200 → `HttpStatus` failure with the status line
//! 3. body retrieval error → `Body` failure carrying the raw outcome
//! 4. otherwise decode the body as JSON — a body that fails to decode is
//!    coerced to an empty object, not an error
//!
//! Step 4's coercion is deliberate: endpoints that answer 200 with a
//! non-JSON body (empty strings, HTML error pages behind misconfigured
//! proxies) yield a successful-but-empty result rather than a failure.

use serde_json::{Map, Value, json};

use crate::transport::TransportOutcome;
use crate::types::{FailureKind, FetchOutcome};

/// Render a status line like `"HTTP 404 Not Found"`.
fn status_line(status: u16) -> String {
    match reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("HTTP {status} {reason}"),
        None => format!("HTTP {status}"),
    }
}

/// Map a raw transport outcome into a [`FetchOutcome`].
pub fn normalize_outcome(outcome: TransportOutcome) -> FetchOutcome {
    let raw = match outcome {
        TransportOutcome::Failed { message, body } => {
            return FetchOutcome::failure(FailureKind::Transport, message, Value::String(body));
        }
        TransportOutcome::Response(raw) => raw,
    };

    if raw.status != 200 {
        return FetchOutcome::failure(
            FailureKind::HttpStatus,
            status_line(raw.status),
            Value::String(raw.body),
        );
    }

    if let Some(error) = raw.body_error {
        return FetchOutcome::failure(
            FailureKind::Body,
            error,
            json!({ "status": raw.status, "body": raw.body }),
        );
    }

    let data = serde_json::from_str(&raw.body).unwrap_or_else(|_| Value::Object(Map::new()));
    FetchOutcome::live(data)
}
