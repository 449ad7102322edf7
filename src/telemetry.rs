//! Telemetry metric name constants.
//!
//! Centralised metric names for muninn operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `muninn_` and counters end in `_total`.
//!
//! # Common labels
//!
//! - `branch` — which arm of the request flow resolved the call:
//!   "live", "cache", "throttled", "invalid", "error"
//! - `keyspace` — store keyspace touched: "cache" or "throttle"
//! - `sink` — export sink: "file" or "option"

/// Total requests resolved through [`RemoteCache::fetch_cached`](crate::RemoteCache::fetch_cached).
///
/// Labels: `branch` ("live" | "cache" | "throttled" | "invalid" | "error").
pub const REQUESTS_TOTAL: &str = "muninn_requests_total";

/// Total cache entry hits on non-forced calls.
pub const CACHE_HITS_TOTAL: &str = "muninn_cache_hits_total";

/// Total cache entry misses on non-forced calls.
pub const CACHE_MISSES_TOTAL: &str = "muninn_cache_misses_total";

/// Total live fetches denied by the refresh throttle.
pub const THROTTLE_DENIED_TOTAL: &str = "muninn_throttle_denied_total";

/// Total swallowed TTL-store failures.
///
/// Labels: `keyspace` ("cache" | "throttle").
pub const STORE_FAILURES_TOTAL: &str = "muninn_store_failures_total";

/// Total swallowed export-sink failures.
///
/// Labels: `sink` ("file" | "option").
pub const EXPORT_FAILURES_TOTAL: &str = "muninn_export_failures_total";
