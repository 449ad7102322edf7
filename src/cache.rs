//! Cache store adapter — fingerprint-keyed response entries.
//!
//! Narrow wrapper over the injected [`TtlStore`] that owns the
//! `"{prefix}:{fingerprint}"` keyspace. Store failures never escape this
//! adapter: a failed read is a cache miss and a failed write is dropped,
//! both logged and counted, so a flaky backend degrades to "no caching"
//! instead of failing requests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::store::TtlStore;
use crate::telemetry;

/// Adapter owning the response-entry keyspace of the TTL store.
pub struct CacheStore {
    store: Arc<dyn TtlStore>,
    prefix: String,
}

impl CacheStore {
    pub fn new(store: Arc<dyn TtlStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn entry_key(&self, fingerprint: &str) -> String {
        format!("{}:{}", self.prefix, fingerprint)
    }

    /// Read the cached response for a fingerprint.
    ///
    /// Returns `None` on miss *and* on store failure.
    pub async fn get(&self, fingerprint: &str) -> Option<Value> {
        let key = self.entry_key(fingerprint);
        match self.store.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed, treating as miss");
                metrics::counter!(telemetry::STORE_FAILURES_TOTAL, "keyspace" => "cache")
                    .increment(1);
                None
            }
        }
    }

    /// Write a response entry with the given lifetime.
    ///
    /// Write failures are dropped (logged and counted).
    pub async fn put(&self, fingerprint: &str, value: Value, ttl: Duration) {
        let key = self.entry_key(fingerprint);
        if let Err(e) = self.store.set(&key, value, ttl).await {
            warn!(key = %key, error = %e, "cache write failed, entry dropped");
            metrics::counter!(telemetry::STORE_FAILURES_TOTAL, "keyspace" => "cache").increment(1);
        }
    }

    /// Evict the entry for a fingerprint (manual invalidation).
    pub async fn delete(&self, fingerprint: &str) {
        let key = self.entry_key(fingerprint);
        if let Err(e) = self.store.delete(&key).await {
            warn!(key = %key, error = %e, "cache delete failed");
            metrics::counter!(telemetry::STORE_FAILURES_TOTAL, "keyspace" => "cache").increment(1);
        }
    }
}
