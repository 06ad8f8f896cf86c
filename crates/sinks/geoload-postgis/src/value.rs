//! Property values bound as statement parameters.
//!
//! A value is coerced to its column's inferred type before it is bound.
//! Anything can be stored as text, integers widen to double precision and
//! finite floats round into BIGINT. Strings headed for a typed column are
//! read with PostgreSQL's input rules for that type, as an untyped literal
//! would be. Every other combination is rejected.

use std::error::Error;

use bytes::BytesMut;
use geoload_core_common::{Column, ColumnType, JsonValue, SinkError, SinkResult};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A scalar ready to be written to a typed column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    /// Coerces a property value to the type of `column`. A missing key or a
    /// JSON `null` becomes SQL `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::TypeMismatch`] when the value cannot be stored in
    /// the column.
    pub fn for_column(value: Option<&JsonValue>, column: &Column) -> SinkResult<Self> {
        let value = match value {
            None | Some(JsonValue::Null) => return Ok(Self::Null),
            Some(value) => value,
        };

        let coerced = match (column.column_type, value) {
            (ColumnType::Text, JsonValue::String(s)) => Some(Self::Text(s.clone())),
            (ColumnType::Text, other) => Some(Self::Text(other.to_string())),
            (ColumnType::Boolean, JsonValue::Bool(b)) => Some(Self::Bool(*b)),
            (ColumnType::Boolean, JsonValue::String(s)) => parse_bool(s).map(Self::Bool),
            (ColumnType::Integer, JsonValue::Number(n)) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().and_then(round_to_i64).map(Self::Int),
            },
            (ColumnType::Integer, JsonValue::String(s)) => s.trim().parse().ok().map(Self::Int),
            (ColumnType::Double, JsonValue::Number(n)) => n.as_f64().map(Self::Float),
            (ColumnType::Double, JsonValue::String(s)) => s.trim().parse().ok().map(Self::Float),
            _ => None,
        };

        coerced.ok_or_else(|| SinkError::TypeMismatch {
            column: column.name.clone(),
            expected: column.column_type.sql_name().to_string(),
            found: json_kind(value).to_string(),
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

fn round_to_i64(value: f64) -> Option<i64> {
    let rounded = value.round();
    // i64::MAX is not representable as f64; the bound is exclusive.
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        #[allow(clippy::cast_possible_truncation)]
        Some(rounded as i64)
    } else {
        None
    }
}

/// Boolean input as PostgreSQL's `boolin` reads it: surrounding whitespace
/// is ignored and any unambiguous, case-insensitive prefix of `true`, `false`,
/// `yes`, `no`, `on` or `off` is accepted, as are `1` and `0`.
fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim().to_ascii_lowercase();
    if text.is_empty() {
        return None;
    }
    let prefix_of = |word: &str| word.starts_with(text.as_str());
    match text.as_str() {
        "1" => Some(true),
        "0" => Some(false),
        // A lone "o" could be either.
        "o" => None,
        _ if prefix_of("true") || prefix_of("yes") || prefix_of("on") => Some(true),
        _ if prefix_of("false") || prefix_of("no") || prefix_of("off") => Some(false),
        _ => None,
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "float",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match (self, ty) {
            (Self::Null, _) => Ok(IsNull::Yes),
            (Self::Bool(v), &Type::BOOL) => v.to_sql(ty, out),
            (Self::Int(v), &Type::INT8) => v.to_sql(ty, out),
            (Self::Float(v), &Type::FLOAT8) => v.to_sql(ty, out),
            (Self::Text(v), &Type::TEXT | &Type::VARCHAR) => v.to_sql(ty, out),
            (value, ty) => Err(format!("cannot bind {} value to {ty} parameter", value.kind()).into()),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL | Type::INT8 | Type::FLOAT8 | Type::TEXT | Type::VARCHAR
        )
    }

    to_sql_checked!();
}
