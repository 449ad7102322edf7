//! Request fingerprinting — stable identity for cache and throttle keys.
//!
//! A fingerprint is a lowercase-hex SHA-256 digest of the effective URL
//! concatenated with a canonical JSON serialization of the policy-selected
//! option mapping. Descriptors keep their mappings in [`BTreeMap`]s, so the
//! serialization is key-ordered regardless of how the caller built the map —
//! structurally equal inputs always digest to the same token.
//!
//! SHA-256 (rather than a process-local `DefaultHasher`) keeps fingerprints
//! stable across processes, so a shared TTL store backend can be swapped in
//! without invalidating existing keys.

use std::collections::BTreeMap;

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Which descriptor mapping feeds the fingerprint digest.
///
/// Two historical behaviours exist for keying a logical request; neither is
/// privileged, so the choice is an explicit configuration knob on
/// [`MuninnBuilder`](crate::MuninnBuilder) rather than hidden policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintPolicy {
    /// Digest over `(effective_url, transport_options)` — query args
    /// contribute only through the URL they are folded into.
    #[default]
    TransportOptions,
    /// Digest over `(effective_url, query_args)`.
    QueryArgs,
}

/// Compute the fingerprint for a request.
///
/// `options` is whichever mapping the active [`FingerprintPolicy`] selects.
/// Returns a 64-character lowercase hex string. A NUL separator keeps the
/// URL and option inputs from bleeding into each other — a URL ending in
/// JSON text cannot collide with a shorter URL plus matching options.
pub fn fingerprint(url: &str, options: &BTreeMap<String, Value>) -> String {
    let canonical = serde_json::to_string(options).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update([0u8]);
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}
