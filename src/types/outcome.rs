//! Uniform request outcome shape.
//!
//! Every call to [`RemoteCache::fetch_cached`](crate::RemoteCache::fetch_cached)
//! resolves to a [`FetchOutcome`] — failures included. Callers branch on
//! [`FetchOutcome::success`]; nothing request-level is ever returned as `Err`.

use serde::Serialize;
use serde_json::Value;

/// Message on a live-fetch success.
pub const MSG_LIVE: &str = "served live";

/// Message on a cache hit.
pub const MSG_CACHE: &str = "served from cache";

/// Message when the refresh throttle denies a live fetch.
pub const MSG_THROTTLED: &str = "max requests reached, served from cache";

/// What made a request fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The input was empty — nothing to fetch.
    InvalidArguments,
    /// The descriptor URL was empty after normalization.
    InvalidEndpoint,
    /// Network-level failure (DNS, connect, timeout).
    Transport,
    /// The endpoint answered with a non-200 status.
    HttpStatus,
    /// The response body could not be retrieved.
    Body,
}

/// Uniform result of a cached GET request.
///
/// `data` is the decoded JSON body on success, or the raw body / error text
/// on failure. `expiration` is present on cache-hit and throttled outcomes
/// (the configured window length in seconds); `kind` is present on failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub success: bool,
    pub message: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
}

impl FetchOutcome {
    /// Successful live fetch.
    pub fn live(data: Value) -> Self {
        Self {
            success: true,
            message: MSG_LIVE.to_string(),
            data,
            expiration: None,
            kind: None,
        }
    }

    /// Successful cache hit.
    pub fn cached(data: Value, expiration_secs: u64) -> Self {
        Self {
            success: true,
            message: MSG_CACHE.to_string(),
            data,
            expiration: Some(expiration_secs),
            kind: None,
        }
    }

    /// Throttle-denied outcome, served from whatever the cache holds.
    ///
    /// Deliberately `success: true` even when `data` is null — the throttle
    /// denying a refresh is not an error from the caller's point of view.
    pub fn throttled(data: Value, expiration_secs: u64) -> Self {
        Self {
            success: true,
            message: MSG_THROTTLED.to_string(),
            data,
            expiration: Some(expiration_secs),
            kind: None,
        }
    }

    /// Failed request of the given kind.
    pub fn failure(kind: FailureKind, message: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
            expiration: None,
            kind: Some(kind),
        }
    }
}
