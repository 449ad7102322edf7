//! Muninn — request de-duplicating, rate-limited response cache for
//! outbound HTTP GET calls.
//!
//! Given a request descriptor (URL plus query/transport options), muninn
//! returns either a freshly fetched response or a previously cached one,
//! keyed by the semantic identity of the request, and bounds how often the
//! same logical request may hit the network within a time window.
//!
//! Every call resolves to a uniform [`FetchOutcome`] — transport failures,
//! bad statuses and invalid inputs included. Callers branch on
//! [`FetchOutcome::success`]; nothing request-level is returned as `Err`.
//!
//! # Simple example
//!
//! ```rust,no_run
//! use muninn::Muninn;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = Muninn::builder().build();
//!
//!     // First call fetches live and populates the cache
//!     let result = cache.fetch_cached("https://api.example.com/items").await;
//!     println!("{}: {}", result.message, result.data);
//!
//!     // Second call within the expiration window is served from cache
//!     let result = cache.fetch_cached("https://api.example.com/items").await;
//!     assert_eq!(result.message, "served from cache");
//! }
//! ```
//!
//! # Descriptor example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use muninn::{Muninn, RequestDescriptor, ExportSpec};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = Muninn::builder().max_refreshes(5).build();
//!
//!     let descriptor = RequestDescriptor::new("https://api.example.com/posts")
//!         .query_arg("per_page", 5)
//!         .expiration(Duration::from_secs(3600))
//!         .export(ExportSpec::new("posts", "/var/lib/app").option_name("posts_payload"));
//!
//!     let result = cache.fetch_cached(descriptor).await;
//!     assert!(result.success || result.kind.is_some());
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod export;
pub mod fingerprint;
pub mod normalize;
pub mod store;
pub mod telemetry;
pub mod throttle;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use client::{Muninn, MuninnBuilder, RemoteCache};
pub use error::{MuninnError, Result};
pub use fingerprint::FingerprintPolicy;
pub use store::{MemoryOptionStore, MemoryTtlStore, OptionStore, TtlStore};
pub use throttle::DEFAULT_MAX_REFRESHES;
pub use transport::{HttpTransport, RawResponse, Transport, TransportOutcome};
pub use types::{
    DEFAULT_EXPIRATION, DEFAULT_TIMEOUT_SECS, ExportSpec, FailureKind, FetchOutcome, MSG_CACHE,
    MSG_LIVE, MSG_THROTTLED, RequestDescriptor, RequestInput,
};
