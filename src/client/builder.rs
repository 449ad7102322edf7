//! Builder for configuring [`RemoteCache`] instances.

use std::sync::Arc;

use super::RemoteCache;
use crate::cache::CacheStore;
use crate::export::Exporter;
use crate::fingerprint::FingerprintPolicy;
use crate::store::{MemoryOptionStore, MemoryTtlStore, OptionStore, TtlStore};
use crate::throttle::{DEFAULT_MAX_REFRESHES, ThrottleCounter};
use crate::transport::{HttpTransport, Transport};
use crate::types::DEFAULT_TIMEOUT_SECS;

/// Default prefix for all store keys.
pub const DEFAULT_KEY_PREFIX: &str = "muninn";

/// Main entry point for creating [`RemoteCache`] instances.
pub struct Muninn;

impl Muninn {
    /// Create a new builder for configuring the cache layer.
    pub fn builder() -> MuninnBuilder {
        MuninnBuilder::new()
    }
}

/// Builder for configuring [`RemoteCache`] instances.
///
/// Everything has a working default: reqwest transport, in-memory moka
/// stores, `"muninn"` key prefix, transport-options fingerprinting, three
/// refreshes per window, 60-second timeout.
///
/// ```rust
/// # use muninn::{Muninn, FingerprintPolicy};
/// let cache = Muninn::builder()
///     .key_prefix("catalog")
///     .fingerprint_policy(FingerprintPolicy::QueryArgs)
///     .max_refreshes(5)
///     .build();
/// ```
pub struct MuninnBuilder {
    transport: Option<Arc<dyn Transport>>,
    ttl_store: Option<Arc<dyn TtlStore>>,
    option_store: Option<Arc<dyn OptionStore>>,
    key_prefix: String,
    policy: FingerprintPolicy,
    max_refreshes: u32,
    default_timeout_secs: u64,
}

impl MuninnBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            ttl_store: None,
            option_store: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            policy: FingerprintPolicy::default(),
            max_refreshes: DEFAULT_MAX_REFRESHES,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Inject a custom transport (defaults to [`HttpTransport`]).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Inject a shared TTL store backend (defaults to [`MemoryTtlStore`]).
    pub fn ttl_store(mut self, store: Arc<dyn TtlStore>) -> Self {
        self.ttl_store = Some(store);
        self
    }

    /// Inject a persistent option store (defaults to [`MemoryOptionStore`]).
    pub fn option_store(mut self, store: Arc<dyn OptionStore>) -> Self {
        self.option_store = Some(store);
        self
    }

    /// Prefix for cache and throttle keys in the TTL store.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Which descriptor mapping feeds the request fingerprint.
    pub fn fingerprint_policy(mut self, policy: FingerprintPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ceiling on live fetches per fingerprint per expiration window.
    pub fn max_refreshes(mut self, max: u32) -> Self {
        self.max_refreshes = max;
        self
    }

    /// Default transport timeout in seconds, used when a descriptor does
    /// not carry its own `"timeout"` option.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.default_timeout_secs = secs;
        self
    }

    /// Build the cache layer.
    pub fn build(self) -> RemoteCache {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(HttpTransport::new()));
        let ttl_store = self
            .ttl_store
            .unwrap_or_else(|| Arc::new(MemoryTtlStore::new()));
        let option_store = self
            .option_store
            .unwrap_or_else(|| Arc::new(MemoryOptionStore::new()));

        RemoteCache::new(
            transport,
            CacheStore::new(ttl_store.clone(), self.key_prefix.clone()),
            ThrottleCounter::new(ttl_store, self.key_prefix),
            Exporter::new(option_store),
            self.policy,
            self.max_refreshes,
            self.default_timeout_secs,
        )
    }
}

impl Default for MuninnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
