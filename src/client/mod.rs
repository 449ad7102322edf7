//! Request orchestrator — the decision engine behind `fetch_cached`.

mod builder;

pub use builder::{DEFAULT_KEY_PREFIX, Muninn, MuninnBuilder};

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use crate::cache::CacheStore;
use crate::export::Exporter;
use crate::fingerprint::{FingerprintPolicy, fingerprint};
use crate::normalize::normalize_outcome;
use crate::telemetry;
use crate::throttle::{ThrottleCounter, ThrottleDecision};
use crate::transport::Transport;
use crate::types::{FailureKind, FetchOutcome, RequestDescriptor, RequestInput};

/// De-duplicating, rate-limited front for outbound GET requests.
///
/// Holds the transport, the cache/throttle adapters over the TTL store, and
/// the exporter. Construct via [`Muninn::builder()`]; share across tasks by
/// wrapping in an `Arc` (all state is internally synchronized).
///
/// For each call, the flow is: validate → throttle check → cache check →
/// live fetch → normalize → store → export. `force` skips the throttle and
/// cache checks entirely.
pub struct RemoteCache {
    transport: Arc<dyn Transport>,
    cache: CacheStore,
    throttle: ThrottleCounter,
    exporter: Exporter,
    policy: FingerprintPolicy,
    max_refreshes: u32,
    default_timeout_secs: u64,
}

impl RemoteCache {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        cache: CacheStore,
        throttle: ThrottleCounter,
        exporter: Exporter,
        policy: FingerprintPolicy,
        max_refreshes: u32,
        default_timeout_secs: u64,
    ) -> Self {
        Self {
            transport,
            cache,
            throttle,
            exporter,
            policy,
            max_refreshes,
            default_timeout_secs,
        }
    }

    /// Fetch a URL through the cache/throttle layer.
    ///
    /// Accepts a bare URL (`&str`/`String`, descriptor defaults applied) or
    /// a full [`RequestDescriptor`]. Total: every input resolves to a
    /// [`FetchOutcome`]; failures are carried in the outcome, never as
    /// `Err` or panic.
    pub async fn fetch_cached(&self, input: impl Into<RequestInput>) -> FetchOutcome {
        let started = Instant::now();

        let descriptor = match self.resolve(input.into()) {
            Ok(descriptor) => descriptor,
            Err(outcome) => {
                metrics::counter!(telemetry::REQUESTS_TOTAL, "branch" => "invalid").increment(1);
                return outcome;
            }
        };

        let url = descriptor.effective_url();
        let options = match self.policy {
            FingerprintPolicy::TransportOptions => &descriptor.transport_options,
            FingerprintPolicy::QueryArgs => &descriptor.query_args,
        };
        let fp = fingerprint(&url, options);
        let expiration_secs = descriptor.expiration.as_secs();

        debug!(url = %url, fingerprint = %fp, force = descriptor.force, "dispatching request");

        if !descriptor.force {
            // Throttle gate first, then the cache. The counter ticks on
            // every non-forced call, cache hits included, so a window's
            // budget covers the logical request rather than just misses.
            if let ThrottleDecision::Denied(count) = self
                .throttle
                .check(&fp, self.max_refreshes, descriptor.expiration)
                .await
            {
                let data = self.cache.get(&fp).await.unwrap_or(Value::Null);
                debug!(
                    fingerprint = %fp,
                    count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "refresh throttled, serving cached value"
                );
                metrics::counter!(telemetry::THROTTLE_DENIED_TOTAL).increment(1);
                metrics::counter!(telemetry::REQUESTS_TOTAL, "branch" => "throttled").increment(1);
                return FetchOutcome::throttled(data, expiration_secs);
            }

            if let Some(data) = self.cache.get(&fp).await {
                debug!(
                    fingerprint = %fp,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "cache hit"
                );
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                metrics::counter!(telemetry::REQUESTS_TOTAL, "branch" => "cache").increment(1);
                return FetchOutcome::cached(data, expiration_secs);
            }
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }

        let raw = self
            .transport
            .fetch_get(&url, &descriptor.transport_options)
            .await;
        let outcome = normalize_outcome(raw);

        if outcome.success {
            self.cache
                .put(&fp, outcome.data.clone(), descriptor.expiration)
                .await;
            if let Some(spec) = &descriptor.export {
                self.exporter.export(spec, &outcome).await;
            }
        }

        let branch = if outcome.success { "live" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "branch" => branch).increment(1);
        debug!(
            url = %url,
            success = outcome.success,
            message = %outcome.message,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request resolved live"
        );
        outcome
    }

    /// Resolve the input into a normalized descriptor, or an early-exit
    /// failure outcome.
    fn resolve(&self, input: RequestInput) -> Result<RequestDescriptor, FetchOutcome> {
        let descriptor = match input {
            RequestInput::Url(url) => {
                if url.trim().is_empty() {
                    return Err(FetchOutcome::failure(
                        FailureKind::InvalidArguments,
                        "invalid parameters",
                        Value::Null,
                    ));
                }
                RequestDescriptor::new(url)
            }
            RequestInput::Descriptor(descriptor) => descriptor,
        };

        let descriptor = descriptor.normalize(self.default_timeout_secs);
        if descriptor.url.is_empty() {
            return Err(FetchOutcome::failure(
                FailureKind::InvalidEndpoint,
                "invalid request endpoint",
                Value::Null,
            ));
        }
        Ok(descriptor)
    }
}
