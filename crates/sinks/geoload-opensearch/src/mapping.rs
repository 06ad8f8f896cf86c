//! Index creation body.

use geoload_core_common::{FieldMapping, FieldType, JsonValue};
use serde_json::json;

fn field_definition(field_type: FieldType) -> JsonValue {
    match field_type {
        FieldType::Boolean => json!({"type": "boolean"}),
        FieldType::Integer => json!({"type": "integer"}),
        FieldType::Float => json!({"type": "float"}),
        FieldType::Text => json!({"type": "text", "fields": {"raw": {"type": "keyword"}}}),
        FieldType::Keyword => json!({"type": "keyword"}),
    }
}

/// Builds the `PUT /<index>` body for documents shaped like GeoJSON features:
/// a numeric `id`, a `type` keyword, a `geo_shape` geometry and a typed
/// `properties` object.
#[must_use]
pub fn index_body(fields: &FieldMapping) -> JsonValue {
    let properties: serde_json::Map<String, JsonValue> = fields
        .fields()
        .iter()
        .map(|(name, field_type)| (name.clone(), field_definition(*field_type)))
        .collect();

    json!({
        "mappings": {
            "properties": {
                "id": {"type": "integer"},
                "type": {"type": "keyword"},
                "geometry": {"type": "geo_shape"},
                "properties": {"type": "object", "properties": properties}
            }
        }
    })
}
