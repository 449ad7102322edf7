//! Refresh throttle — caps live fetches per fingerprint per window.
//!
//! Each non-forced call increments a counter keyed on the request
//! fingerprint. Once the counter reaches the configured maximum, further
//! live fetches are denied until the window's TTL evicts the counter, at
//! which point the next read sees zero and the window re-opens.
//!
//! The counter lives in the same TTL store as the cache entries but owns
//! its own `"{prefix}:limit:{fingerprint}"` keyspace. Store failures
//! degrade open: an unreadable counter reads as zero and a failed
//! increment still allows the fetch.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::store::TtlStore;
use crate::telemetry;

/// Default ceiling on live fetches per fingerprint per window.
pub const DEFAULT_MAX_REFRESHES: u32 = 3;

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Fetch permitted; carries the count after increment.
    Allowed(u32),
    /// Ceiling reached; carries the current count.
    Denied(u32),
}

/// Per-fingerprint refresh counter over the injected TTL store.
pub struct ThrottleCounter {
    store: Arc<dyn TtlStore>,
    prefix: String,
}

impl ThrottleCounter {
    pub fn new(store: Arc<dyn TtlStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn counter_key(&self, fingerprint: &str) -> String {
        format!("{}:limit:{}", self.prefix, fingerprint)
    }

    /// Check the counter and, when under the ceiling, increment it.
    ///
    /// Incrementing re-arms the counter's TTL to `ttl`, so the window is
    /// measured from the most recent permitted call. Absent or garbled
    /// counters read as zero.
    pub async fn check(&self, fingerprint: &str, max: u32, ttl: Duration) -> ThrottleDecision {
        let key = self.counter_key(fingerprint);

        let count = match self.store.get(&key).await {
            Ok(value) => value
                .as_ref()
                .and_then(Value::as_u64)
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                .unwrap_or(0),
            Err(e) => {
                warn!(key = %key, error = %e, "throttle read failed, counting as zero");
                metrics::counter!(telemetry::STORE_FAILURES_TOTAL, "keyspace" => "throttle")
                    .increment(1);
                0
            }
        };

        if count >= max {
            return ThrottleDecision::Denied(count);
        }

        let next = count + 1;
        if let Err(e) = self.store.set(&key, Value::from(next), ttl).await {
            warn!(key = %key, error = %e, "throttle increment failed");
            metrics::counter!(telemetry::STORE_FAILURES_TOTAL, "keyspace" => "throttle")
                .increment(1);
        }
        ThrottleDecision::Allowed(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTtlStore;
    use serde_json::json;

    const FP: &str = "deadbeef";

    #[tokio::test]
    async fn allows_until_ceiling() {
        let throttle = ThrottleCounter::new(Arc::new(MemoryTtlStore::new()), "muninn");
        let ttl = Duration::from_secs(60);

        assert_eq!(
            throttle.check(FP, 3, ttl).await,
            ThrottleDecision::Allowed(1)
        );
        assert_eq!(
            throttle.check(FP, 3, ttl).await,
            ThrottleDecision::Allowed(2)
        );
        assert_eq!(
            throttle.check(FP, 3, ttl).await,
            ThrottleDecision::Allowed(3)
        );
        assert_eq!(
            throttle.check(FP, 3, ttl).await,
            ThrottleDecision::Denied(3)
        );
        // Denied calls do not increment
        assert_eq!(
            throttle.check(FP, 3, ttl).await,
            ThrottleDecision::Denied(3)
        );
    }

    #[tokio::test]
    async fn fingerprints_are_counted_independently() {
        let throttle = ThrottleCounter::new(Arc::new(MemoryTtlStore::new()), "muninn");
        let ttl = Duration::from_secs(60);

        assert_eq!(
            throttle.check("aaa", 1, ttl).await,
            ThrottleDecision::Allowed(1)
        );
        assert_eq!(
            throttle.check("aaa", 1, ttl).await,
            ThrottleDecision::Denied(1)
        );
        assert_eq!(
            throttle.check("bbb", 1, ttl).await,
            ThrottleDecision::Allowed(1)
        );
    }

    #[tokio::test]
    async fn window_expiry_resets_count() {
        let throttle = ThrottleCounter::new(Arc::new(MemoryTtlStore::new()), "muninn");
        let ttl = Duration::from_millis(50);

        assert_eq!(
            throttle.check(FP, 1, ttl).await,
            ThrottleDecision::Allowed(1)
        );
        assert_eq!(throttle.check(FP, 1, ttl).await, ThrottleDecision::Denied(1));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(
            throttle.check(FP, 1, ttl).await,
            ThrottleDecision::Allowed(1)
        );
    }

    #[tokio::test]
    async fn garbled_counter_reads_as_zero() {
        let store = Arc::new(MemoryTtlStore::new());
        store
            .set(
                "muninn:limit:deadbeef",
                json!("not a number"),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let throttle = ThrottleCounter::new(store, "muninn");
        assert_eq!(
            throttle.check(FP, 3, Duration::from_secs(60)).await,
            ThrottleDecision::Allowed(1)
        );
    }
}
