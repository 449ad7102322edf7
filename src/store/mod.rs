//! Storage seams — TTL key/value store and persistent option store.
//!
//! Both stores are consumed behind trait objects so a shared backend (redis,
//! a database table) can be injected without touching the request flow. The
//! in-memory defaults in [`memory`] are moka-backed and fully synchronized,
//! so a [`RemoteCache`](crate::RemoteCache) is safe to share across tasks
//! out of the box.
//!
//! Store errors are real (`Err`) at this seam; the adapters sitting above
//! ([`CacheStore`](crate::cache::CacheStore), [`ThrottleCounter`](crate::throttle::ThrottleCounter))
//! are the ones that swallow them.

mod memory;

pub use memory::{MemoryOptionStore, MemoryTtlStore};

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Transient key/value store with per-entry time-to-live.
///
/// Expired entries behave as absent; implementations decide whether eviction
/// is eager or lazy.
#[async_trait]
pub trait TtlStore: Send + Sync {
    /// Look up a value. Absent and expired keys both return `None`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or overwrite a value, (re-)arming its TTL.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Persistent named-value store without expiration.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Look up an option by name.
    async fn get(&self, name: &str) -> Result<Option<Value>>;

    /// Insert or overwrite an option.
    async fn set(&self, name: &str, value: Value) -> Result<()>;
}
