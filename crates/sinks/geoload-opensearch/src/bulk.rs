//! Bulk request encoding and response accounting.

use geoload_core_common::{Feature, JsonValue};
use log::warn;
use serde::Deserialize;
use serde_json::json;

/// Encodes `features` as a newline-delimited bulk body. Feature `i` (1-based)
/// becomes document `_id` `"i"` with a matching numeric `id` field.
#[must_use]
pub fn build_bulk_body(index: &str, features: &[Feature]) -> String {
    let mut body = String::new();
    for (i, feature) in features.iter().enumerate() {
        let id = i + 1;
        let action = json!({"index": {"_index": index, "_id": id.to_string()}});
        let document = json!({
            "id": id,
            "type": "Feature",
            "properties": feature.properties,
            "geometry": feature.geometry_json(),
        });
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&document.to_string());
        body.push('\n');
    }
    body
}

/// Body of a `_bulk` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkResponse {
    /// Set when at least one item failed
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

/// One entry of [`BulkResponse::items`], keyed by action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkItem {
    #[serde(default)]
    pub index: Option<BulkItemResult>,
}

/// Result of a single index action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkItemResult {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<JsonValue>,
}

impl BulkItemResult {
    fn failure_reason(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(
            error
                .get("reason")
                .and_then(JsonValue::as_str)
                .map_or_else(|| error.to_string(), str::to_string),
        )
    }
}

impl BulkResponse {
    /// Number of rejected documents. Each rejection is logged with its
    /// document id and reason.
    #[must_use]
    pub fn error_count(&self) -> u64 {
        if !self.errors {
            return 0;
        }
        let mut failed = 0;
        for result in self.items.iter().filter_map(|item| item.index.as_ref()) {
            if let Some(reason) = result.failure_reason() {
                warn!(
                    "Document {} rejected (status {}): {reason}",
                    result.id.as_deref().unwrap_or("?"),
                    result.status.unwrap_or_default()
                );
                failed += 1;
            }
        }
        failed
    }
}
