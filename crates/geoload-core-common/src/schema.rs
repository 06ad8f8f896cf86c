//! Schema inference for the relational and document sinks.
//!
//! The two sinks are served asymmetrically:
//!
//! - [`infer_columns`] scans *every* feature. The table is created once, up
//!   front, so its column set must cover every key that appears anywhere in
//!   the dataset.
//! - [`infer_field_mapping`] inspects a single representative property map.
//!   The search index accepts heterogeneous documents and only needs a
//!   reasonable starting mapping.

use std::collections::HashMap;
use std::fmt;

use geojson::{JsonObject, JsonValue};

use crate::feature::Feature;

/// Relational column type resolved from property samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// `BOOLEAN`
    Boolean,
    /// `BIGINT`
    Integer,
    /// `DOUBLE PRECISION`
    Double,
    /// `TEXT`, also the default for keys without a non-null sample.
    Text,
}

impl ColumnType {
    /// Resolves the type of a single non-null sample.
    #[must_use]
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Bool(_) => Self::Boolean,
            JsonValue::Number(n) if n.is_i64() => Self::Integer,
            JsonValue::Number(_) => Self::Double,
            _ => Self::Text,
        }
    }

    /// The PostgreSQL type name used in DDL.
    #[must_use]
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "BIGINT",
            Self::Double => "DOUBLE PRECISION",
            Self::Text => "TEXT",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Property key, used verbatim as the column name.
    pub name: String,
    /// Resolved type.
    pub column_type: ColumnType,
}

/// Ordered column set for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    columns: Vec<Column>,
}

impl ColumnSchema {
    /// The columns in first-observation order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of property columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when no feature carried any property.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Infers the relational schema of a feature set.
///
/// Pass 1 collects the ordered union of property keys over all features.
/// Pass 2 resolves each key from its first non-null sample, scanning features
/// in order; later samples never change the resolved type.
#[must_use]
pub fn infer_columns(features: &[Feature]) -> ColumnSchema {
    let mut keys: Vec<&str> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();
    for feature in features {
        for key in feature.properties.keys() {
            if !position.contains_key(key.as_str()) {
                position.insert(key.as_str(), keys.len());
                keys.push(key.as_str());
            }
        }
    }

    let mut resolved: Vec<Option<ColumnType>> = vec![None; keys.len()];
    let mut pending = keys.len();
    'scan: for feature in features {
        for (key, value) in &feature.properties {
            if value.is_null() {
                continue;
            }
            let slot = &mut resolved[position[key.as_str()]];
            if slot.is_none() {
                *slot = Some(ColumnType::of(value));
                pending -= 1;
                if pending == 0 {
                    break 'scan;
                }
            }
        }
    }

    let columns = keys
        .into_iter()
        .zip(resolved)
        .map(|(name, column_type)| Column {
            name: name.to_string(),
            column_type: column_type.unwrap_or(ColumnType::Text),
        })
        .collect();
    ColumnSchema { columns }
}

/// Document-index field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `boolean`
    Boolean,
    /// `integer`
    Integer,
    /// `float`
    Float,
    /// Full-text `text` with an exact-match `raw` keyword subfield.
    Text,
    /// Exact-match `keyword`.
    Keyword,
}

impl FieldType {
    /// Resolves the field type of one sample value.
    #[must_use]
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Bool(_) => Self::Boolean,
            JsonValue::Number(n) if n.is_i64() => Self::Integer,
            JsonValue::Number(_) => Self::Float,
            JsonValue::String(_) => Self::Text,
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => Self::Keyword,
        }
    }
}

/// Ordered field types for the `properties` object of indexed documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMapping {
    fields: Vec<(String, FieldType)>,
}

impl FieldMapping {
    /// Fields in sample order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldType)] {
        &self.fields
    }

    /// Looks up the type of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, field_type)| *field_type)
    }

    /// Returns `true` when the sample had no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Infers a document field mapping from one representative property map.
#[must_use]
pub fn infer_field_mapping(sample: &JsonObject) -> FieldMapping {
    FieldMapping {
        fields: sample
            .iter()
            .map(|(key, value)| (key.clone(), FieldType::of(value)))
            .collect(),
    }
}
