//! Side-effect exporter — mirror a successful result to secondary storage.
//!
//! Driven entirely by the descriptor's [`ExportSpec`]: a successful live
//! result can be upserted into the persistent option store and/or dumped as
//! a JSON file. Exports are fire-and-forget — a failed write is logged and
//! counted but never turns a successful fetch into a failed one.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::store::OptionStore;
use crate::telemetry;
use crate::types::{ExportSpec, FetchOutcome};

/// Exporter over the injected option store and the local filesystem.
pub struct Exporter {
    options: Arc<dyn OptionStore>,
}

impl Exporter {
    pub fn new(options: Arc<dyn OptionStore>) -> Self {
        Self { options }
    }

    /// Export a successful outcome per `spec`. No-op unless the spec's
    /// condition holds, file name and location are non-empty, and the
    /// outcome carries data.
    pub async fn export(&self, spec: &ExportSpec, outcome: &FetchOutcome) {
        if !should_export(spec, outcome) {
            debug!(file = %spec.file_name, "export skipped");
            return;
        }

        let mut payload = strip_payload(outcome);

        if let Some(name) = &spec.option_name {
            if let Err(e) = self.options.set(name, Value::Object(payload.clone())).await {
                warn!(option = %name, error = %e, "option export failed");
                metrics::counter!(telemetry::EXPORT_FAILURES_TOTAL, "sink" => "option")
                    .increment(1);
            }
            // The file payload records which option mirrors it
            payload.insert("option_name".to_string(), Value::String(name.clone()));
        }

        let path = spec.location.join(file_name_with_extension(&spec.file_name));
        let json = match serde_json::to_string_pretty(&Value::Object(payload)) {
            Ok(json) => json,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export payload serialization failed");
                metrics::counter!(telemetry::EXPORT_FAILURES_TOTAL, "sink" => "file").increment(1);
                return;
            }
        };
        if let Err(e) = std::fs::write(&path, json) {
            warn!(path = %path.display(), error = %e, "file export failed");
            metrics::counter!(telemetry::EXPORT_FAILURES_TOTAL, "sink" => "file").increment(1);
        } else {
            debug!(path = %path.display(), "exported result");
        }
    }
}

/// Whether an export should run at all.
fn should_export(spec: &ExportSpec, outcome: &FetchOutcome) -> bool {
    spec.condition
        && !spec.file_name.trim().is_empty()
        && !spec.location.as_os_str().is_empty()
        && !outcome.data.is_null()
}

/// Build the exported payload: `success`/`message` stripped, `data` and
/// `expiration` (when present) kept.
fn strip_payload(outcome: &FetchOutcome) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("data".to_string(), outcome.data.clone());
    if let Some(expiration) = outcome.expiration {
        payload.insert("expiration".to_string(), Value::from(expiration));
    }
    payload
}

fn file_name_with_extension(file_name: &str) -> String {
    if file_name.ends_with(".json") {
        file_name.to_string()
    } else {
        format!("{file_name}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_payload_drops_success_and_message() {
        let payload = strip_payload(&FetchOutcome::live(json!({"id": 1})));
        assert_eq!(payload.get("data"), Some(&json!({"id": 1})));
        assert!(!payload.contains_key("success"));
        assert!(!payload.contains_key("message"));
    }

    #[test]
    fn strip_payload_keeps_expiration_when_present() {
        let payload = strip_payload(&FetchOutcome::cached(json!(1), 300));
        assert_eq!(payload.get("expiration"), Some(&json!(300)));
    }

    #[test]
    fn file_extension_appended_once() {
        assert_eq!(file_name_with_extension("items"), "items.json");
        assert_eq!(file_name_with_extension("items.json"), "items.json");
    }

    #[test]
    fn should_export_gates() {
        let outcome = FetchOutcome::live(json!({"id": 1}));

        let spec = ExportSpec::new("items", "/tmp");
        assert!(should_export(&spec, &outcome));

        assert!(!should_export(&spec.clone().condition(false), &outcome));
        assert!(!should_export(&ExportSpec::new("", "/tmp"), &outcome));
        assert!(!should_export(&ExportSpec::new("items", ""), &outcome));
        assert!(!should_export(
            &spec,
            &FetchOutcome::live(serde_json::Value::Null)
        ));
    }
}
