//! In-memory store implementations backed by moka.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use serde_json::Value;

use super::{OptionStore, TtlStore};
use crate::Result;

/// Default capacity bound for the in-memory TTL store.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Entry wrapper carrying its own TTL so one cache can hold entries with
/// differing lifetimes.
#[derive(Debug, Clone)]
struct StoredEntry {
    value: Value,
    ttl: Duration,
}

/// Per-entry expiry: each entry lives for the TTL it was stored with, and
/// overwriting an entry re-arms the clock.
struct PerEntryExpiry;

impl Expiry<String, StoredEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory [`TtlStore`] over a bounded moka cache.
///
/// The drop-in default backend. Thread-safe, lazily evicting, bounded to
/// 10,000 entries unless configured otherwise.
pub struct MemoryTtlStore {
    entries: moka::future::Cache<String, StoredEntry>,
}

impl MemoryTtlStore {
    /// Create a store with the default capacity bound.
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store with a custom capacity bound.
    pub fn with_max_entries(max: u64) -> Self {
        Self {
            entries: moka::future::Cache::builder()
                .max_capacity(max)
                .expire_after(PerEntryExpiry)
                .build(),
        }
    }
}

impl Default for MemoryTtlStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TtlStore for MemoryTtlStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        self.entries
            .insert(key.to_string(), StoredEntry { value, ttl })
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }
}

/// In-memory [`OptionStore`] over an unbounded moka cache.
pub struct MemoryOptionStore {
    entries: moka::sync::Cache<String, Value>,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self {
            entries: moka::sync::Cache::builder().build(),
        }
    }
}

impl Default for MemoryOptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.entries.get(name))
    }

    async fn set(&self, name: &str, value: Value) -> Result<()> {
        self.entries.insert(name.to_string(), value);
        Ok(())
    }
}
