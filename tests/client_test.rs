//! End-to-end tests for `RemoteCache::fetch_cached` against a wiremock server.

use std::time::Duration;

use muninn::{
    FailureKind, FingerprintPolicy, MSG_CACHE, MSG_LIVE, MSG_THROTTLED, Muninn, RemoteCache,
    RequestDescriptor,
};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cache() -> RemoteCache {
    Muninn::builder().build()
}

/// Mount a 200 JSON mock at `route`, expecting exactly `calls` hits.
async fn mount_json(server: &MockServer, route: &str, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

// =========================================================================
// Live fetch and cache round-trip
// =========================================================================

#[tokio::test]
async fn first_call_live_second_call_cached() {
    let server = MockServer::start().await;
    mount_json(&server, "/items", json!({"id": 1}), 1).await;

    let cache = cache();
    let url = format!("{}/items", server.uri());

    let first = cache.fetch_cached(url.as_str()).await;
    assert!(first.success);
    assert_eq!(first.message, MSG_LIVE);
    assert_eq!(first.data, json!({"id": 1}));
    assert!(first.expiration.is_none());

    let second = cache.fetch_cached(url.as_str()).await;
    assert!(second.success);
    assert_eq!(second.message, MSG_CACHE);
    assert_eq!(second.data, json!({"id": 1}));
    assert!(second.expiration.is_some());
}

#[tokio::test]
async fn distinct_urls_have_distinct_entries() {
    let server = MockServer::start().await;
    mount_json(&server, "/a", json!({"name": "a"}), 1).await;
    mount_json(&server, "/b", json!({"name": "b"}), 1).await;

    let cache = cache();
    let a = cache.fetch_cached(format!("{}/a", server.uri())).await;
    let b = cache.fetch_cached(format!("{}/b", server.uri())).await;
    assert_eq!(a.data, json!({"name": "a"}));
    assert_eq!(b.data, json!({"name": "b"}));
}

#[tokio::test]
async fn expired_entry_is_fetched_again() {
    let server = MockServer::start().await;
    mount_json(&server, "/items", json!({"id": 1}), 2).await;

    let cache = cache();
    let descriptor = RequestDescriptor::new(format!("{}/items", server.uri()))
        .expiration(Duration::from_millis(50));

    let first = cache.fetch_cached(descriptor.clone()).await;
    assert_eq!(first.message, MSG_LIVE);

    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = cache.fetch_cached(descriptor).await;
    assert_eq!(second.message, MSG_LIVE);
}

// =========================================================================
// Force bypass
// =========================================================================

#[tokio::test]
async fn force_always_invokes_transport() {
    let server = MockServer::start().await;
    mount_json(&server, "/items", json!({"id": 1}), 3).await;

    let cache = cache();
    let url = format!("{}/items", server.uri());

    // Populate cache
    assert_eq!(cache.fetch_cached(url.as_str()).await.message, MSG_LIVE);

    // Forced calls fetch live despite the fresh cache entry
    for _ in 0..2 {
        let forced = cache
            .fetch_cached(RequestDescriptor::new(url.clone()).force(true))
            .await;
        assert_eq!(forced.message, MSG_LIVE);
    }
}

// =========================================================================
// Throttle
// =========================================================================

#[tokio::test]
async fn throttle_caps_live_fetches_per_window() {
    let server = MockServer::start().await;

    // Failing endpoint: nothing ever lands in the cache, so every permitted
    // call goes to the network. With the default ceiling of 3, exactly 3
    // fetches are allowed.
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let cache = cache();
    let url = format!("{}/flaky", server.uri());

    for _ in 0..3 {
        let outcome = cache.fetch_cached(url.as_str()).await;
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(FailureKind::HttpStatus));
    }

    // Fourth call is denied without a fetch. The cache is empty, yet the
    // outcome is still a success with null data.
    let denied = cache.fetch_cached(url.as_str()).await;
    assert!(denied.success);
    assert_eq!(denied.message, MSG_THROTTLED);
    assert_eq!(denied.data, Value::Null);
    assert!(denied.expiration.is_some());
}

#[tokio::test]
async fn throttle_denial_serves_cached_data() {
    let server = MockServer::start().await;
    mount_json(&server, "/items", json!({"id": 7}), 1).await;

    let cache = Muninn::builder().max_refreshes(3).build();
    let url = format!("{}/items", server.uri());

    // Call 1 fetches live; calls 2–3 hit the cache. All three tick the
    // counter, so call 4 is denied and served from the cache entry.
    assert_eq!(cache.fetch_cached(url.as_str()).await.message, MSG_LIVE);
    assert_eq!(cache.fetch_cached(url.as_str()).await.message, MSG_CACHE);
    assert_eq!(cache.fetch_cached(url.as_str()).await.message, MSG_CACHE);

    let denied = cache.fetch_cached(url.as_str()).await;
    assert_eq!(denied.message, MSG_THROTTLED);
    assert_eq!(denied.data, json!({"id": 7}));
}

#[tokio::test]
async fn forced_calls_skip_the_throttle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;

    let cache = Muninn::builder().max_refreshes(1).build();
    let descriptor = RequestDescriptor::new(format!("{}/flaky", server.uri())).force(true);

    for _ in 0..5 {
        let outcome = cache.fetch_cached(descriptor.clone()).await;
        assert_eq!(outcome.kind, Some(FailureKind::HttpStatus));
    }
}

// =========================================================================
// Failure normalization
// =========================================================================

#[tokio::test]
async fn not_found_yields_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let outcome = cache()
        .fetch_cached(format!("{}/missing", server.uri()))
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(FailureKind::HttpStatus));
    assert!(outcome.message.contains("404"));
    assert!(outcome.message.contains("Not Found"));
    assert_eq!(outcome.data, json!("gone"));
}

#[tokio::test]
async fn failed_fetch_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let cache = cache();
    let url = format!("{}/missing", server.uri());
    assert!(!cache.fetch_cached(url.as_str()).await.success);
    // Second call goes to the network again — no entry was written
    assert!(!cache.fetch_cached(url.as_str()).await.success);
}

#[tokio::test]
async fn malformed_json_body_is_an_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let outcome = cache().fetch_cached(format!("{}/html", server.uri())).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, MSG_LIVE);
    assert_eq!(outcome.data, json!({}));
}

#[tokio::test]
async fn connection_refused_yields_transport_failure() {
    // Reserve a port, then drop the listener so the connect is refused.
    // (A pooled wiremock server keeps listening after drop, so bind a raw
    // TcpListener instead.)
    let url = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        format!("http://127.0.0.1:{port}/gone")
    };

    let outcome = cache().fetch_cached(url).await;
    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(FailureKind::Transport));
}

// =========================================================================
// Validation
// =========================================================================

#[tokio::test]
async fn empty_url_input_is_invalid_arguments() {
    let cache = cache();
    for input in ["", "   "] {
        let outcome = cache.fetch_cached(input).await;
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(FailureKind::InvalidArguments));
    }
}

#[tokio::test]
async fn descriptor_without_url_is_invalid_endpoint() {
    let outcome = cache().fetch_cached(RequestDescriptor::default()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(FailureKind::InvalidEndpoint));
}

// =========================================================================
// Query args and fingerprint policy
// =========================================================================

#[tokio::test]
async fn query_args_are_folded_into_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor =
        RequestDescriptor::new(format!("{}/posts", server.uri())).query_arg("per_page", 5);
    let outcome = cache().fetch_cached(descriptor).await;
    assert!(outcome.success);
    assert_eq!(outcome.data, json!([{"id": 1}]));
}

#[tokio::test]
async fn transport_options_policy_separates_entries_by_options() {
    let server = MockServer::start().await;
    mount_json(&server, "/items", json!({"id": 1}), 2).await;

    let cache = Muninn::builder()
        .fingerprint_policy(FingerprintPolicy::TransportOptions)
        .build();
    let url = format!("{}/items", server.uri());

    let first = cache
        .fetch_cached(RequestDescriptor::new(url.clone()).transport_option("timeout", 30))
        .await;
    let second = cache
        .fetch_cached(RequestDescriptor::new(url).transport_option("timeout", 31))
        .await;
    // Different transport options → different fingerprints → two live fetches
    assert_eq!(first.message, MSG_LIVE);
    assert_eq!(second.message, MSG_LIVE);
}

#[tokio::test]
async fn concurrent_callers_all_resolve() {
    let server = MockServer::start().await;
    // No expected-call count: racing callers may each fetch live before the
    // first write lands. Every caller must still get a successful outcome.
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let cache = std::sync::Arc::new(Muninn::builder().max_refreshes(100).build());
    let url = format!("{}/items", server.uri());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let url = url.clone();
            tokio::spawn(async move { cache.fetch_cached(url).await })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.data, json!({"id": 1}));
    }
}

#[tokio::test]
async fn query_args_policy_ignores_transport_options() {
    let server = MockServer::start().await;
    mount_json(&server, "/items", json!({"id": 1}), 1).await;

    let cache = Muninn::builder()
        .fingerprint_policy(FingerprintPolicy::QueryArgs)
        .build();
    let url = format!("{}/items", server.uri());

    let first = cache
        .fetch_cached(RequestDescriptor::new(url.clone()).transport_option("timeout", 30))
        .await;
    let second = cache
        .fetch_cached(RequestDescriptor::new(url).transport_option("timeout", 31))
        .await;
    // Under the query-args policy the transport options don't key the
    // cache, so the second call is a hit
    assert_eq!(first.message, MSG_LIVE);
    assert_eq!(second.message, MSG_CACHE);
}
