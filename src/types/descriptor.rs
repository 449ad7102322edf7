//! Request descriptors — what to fetch and how to cache it.
//!
//! The entry point accepts either a bare URL string or a full
//! [`RequestDescriptor`]; both resolve once into a normalized descriptor
//! before anything downstream sees them. Normalization is idempotent:
//! applying it twice yields the same effective descriptor as once. Query
//! args are never written back into the stored URL — the folded form is a
//! derived value ([`RequestDescriptor::effective_url`]), which is what makes
//! repeated normalization harmless.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;

/// Default transport timeout in seconds, merged into `transport_options`
/// when the caller supplies none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default cache entry lifetime: one month.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Input accepted by [`RemoteCache::fetch_cached`](crate::RemoteCache::fetch_cached).
///
/// A bare URL gets descriptor defaults applied; a full descriptor is used
/// as-is (after normalization).
#[derive(Debug, Clone)]
pub enum RequestInput {
    Url(String),
    Descriptor(RequestDescriptor),
}

impl From<&str> for RequestInput {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

impl From<String> for RequestInput {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl From<RequestDescriptor> for RequestInput {
    fn from(descriptor: RequestDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// Controls the optional side-effect export of a successful live result.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpec {
    /// File stem for the JSON dump; `.json` is appended unless present.
    pub file_name: String,
    /// When set, the payload is also upserted into the option store under
    /// this name, and the name is stamped into the file payload.
    pub option_name: Option<String>,
    /// Directory the file is written into. Must already exist.
    pub location: PathBuf,
    /// Master switch; `false` turns the exporter into a no-op.
    pub condition: bool,
}

impl ExportSpec {
    /// Export to `location/file_name.json`, condition enabled.
    pub fn new(file_name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            option_name: None,
            location: location.into(),
            condition: true,
        }
    }

    /// Also mirror the payload into the option store under `name`.
    pub fn option_name(mut self, name: impl Into<String>) -> Self {
        self.option_name = Some(name.into());
        self
    }

    /// Gate the export on a caller-computed condition.
    pub fn condition(mut self, condition: bool) -> Self {
        self.condition = condition;
        self
    }
}

/// Full description of a cached GET request.
///
/// ```rust
/// # use muninn::RequestDescriptor;
/// # use std::time::Duration;
/// let descriptor = RequestDescriptor::new("https://api.example.com/items")
///     .query_arg("per_page", 5)
///     .expiration(Duration::from_secs(3600))
///     .force(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Request URL, before query-arg folding.
    pub url: String,
    /// Query args folded into the URL ahead of the fetch.
    pub query_args: BTreeMap<String, Value>,
    /// Transport options handed to the HTTP client; merged over
    /// `{"timeout": 60}` during normalization.
    pub transport_options: BTreeMap<String, Value>,
    /// Cache entry lifetime, also the throttle window length.
    pub expiration: Duration,
    /// Bypass throttle and cache, always fetch live.
    pub force: bool,
    /// Optional side-effect export of a successful result.
    pub export: Option<ExportSpec>,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            url: String::new(),
            query_args: BTreeMap::new(),
            transport_options: BTreeMap::new(),
            expiration: DEFAULT_EXPIRATION,
            force: false,
            export: None,
        }
    }
}

impl RequestDescriptor {
    /// Descriptor for `url` with all defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a query arg (folded into the URL before fetching).
    pub fn query_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query_args.insert(key.into(), value.into());
        self
    }

    /// Add a transport option (e.g. `"timeout"` in seconds).
    pub fn transport_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.transport_options.insert(key.into(), value.into());
        self
    }

    /// Set the cache entry lifetime / throttle window.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Bypass throttle and cache on this call.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Attach an export spec.
    pub fn export(mut self, spec: ExportSpec) -> Self {
        self.export = Some(spec);
        self
    }

    /// Normalize the descriptor: trim the URL and merge the default timeout
    /// into `transport_options` when absent. Idempotent.
    pub(crate) fn normalize(mut self, default_timeout_secs: u64) -> Self {
        self.url = self.url.trim().to_string();
        self.transport_options
            .entry("timeout".to_string())
            .or_insert_with(|| Value::from(default_timeout_secs));
        self
    }

    /// The URL actually fetched: `url` with `query_args` folded in.
    ///
    /// The path gets a trailing slash before the args are appended, matching
    /// how the endpoints this layer fronts canonicalize their routes.
    /// Existing query pairs on the URL are preserved. An unparseable URL is
    /// returned untouched — the transport surfaces the failure.
    pub(crate) fn effective_url(&self) -> String {
        if self.query_args.is_empty() {
            return self.url.clone();
        }
        let Ok(mut url) = reqwest::Url::parse(&self.url) else {
            return self.url.clone();
        };
        if !url.path().ends_with('/') {
            let slashed = format!("{}/", url.path());
            url.set_path(&slashed);
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_args {
                pairs.append_pair(key, &render_scalar(value));
            }
        }
        url.to_string()
    }
}

/// Render a JSON value as a query-string scalar (strings unquoted).
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
