//! SQL statements for a destructive table replace.
//!
//! All builders are pure; the loader runs them in order inside one
//! transaction.

use std::collections::HashMap;

use geoload_core_common::{ColumnSchema, Crs, SinkError, SinkResult};

/// Name of the geometry column.
pub const GEOMETRY_COLUMN: &str = "geom";

/// Name of the generated key column.
pub const KEY_COLUMN: &str = "gid";

/// Longest identifier PostgreSQL keeps (`NAMEDATALEN - 1`); longer names are
/// silently truncated.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Quotes an identifier, doubling any embedded double quote.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Name of the spatial index on `table`.
#[must_use]
pub fn spatial_index_name(table: &str) -> String {
    format!("idx_{table}_geom")
}

#[must_use]
pub fn drop_table(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(table))
}

/// `CREATE TABLE` with a serial key, one column per schema entry and a
/// geometry column tagged with the SRID of `crs`.
#[must_use]
pub fn create_table(table: &str, schema: &ColumnSchema, crs: Crs) -> String {
    let mut columns = vec![format!("{KEY_COLUMN} SERIAL PRIMARY KEY")];
    columns.extend(
        schema
            .columns()
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.sql_name())),
    );
    columns.push(format!("{GEOMETRY_COLUMN} GEOMETRY(Geometry, {})", crs.srid()));
    format!("CREATE TABLE {} ({})", quote_ident(table), columns.join(", "))
}

/// Parameterized `INSERT` taking one value per schema column followed by the
/// geometry as GeoJSON text.
#[must_use]
pub fn insert_row(table: &str, schema: &ColumnSchema, crs: Crs) -> String {
    let mut names: Vec<String> = schema.names().map(quote_ident).collect();
    let mut params: Vec<String> = (1..=schema.len()).map(|i| format!("${i}")).collect();
    names.push(GEOMETRY_COLUMN.to_string());
    params.push(format!(
        "ST_SetSRID(ST_GeomFromGeoJSON(${}::text), {})",
        schema.len() + 1,
        crs.srid()
    ));
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        params.join(", ")
    )
}

#[must_use]
pub fn create_spatial_index(table: &str) -> String {
    format!(
        "CREATE INDEX {} ON {} USING GIST ({GEOMETRY_COLUMN})",
        quote_ident(&spatial_index_name(table)),
        quote_ident(table)
    )
}

#[must_use]
pub fn count_rows(table: &str) -> String {
    format!("SELECT count(*) FROM {}", quote_ident(table))
}

/// The part of `name` PostgreSQL keeps: at most [`MAX_IDENTIFIER_LEN`] bytes,
/// cut on a character boundary.
#[must_use]
pub fn stored_identifier(name: &str) -> &str {
    if name.len() <= MAX_IDENTIFIER_LEN {
        return name;
    }
    let mut end = MAX_IDENTIFIER_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Checks that the table, its spatial index and every property column get
/// distinct, valid identifiers once PostgreSQL has stored them.
///
/// # Errors
///
/// Returns [`SinkError::InvalidIdentifier`] when the table or index name
/// would be truncated, a property key is empty, or a key lands on `gid`,
/// `geom` or another key after truncation.
pub fn check_identifiers(table: &str, schema: &ColumnSchema) -> SinkResult<()> {
    for name in [table.to_string(), spatial_index_name(table)] {
        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(invalid(
                &name,
                format!(
                    "{} bytes exceeds the {MAX_IDENTIFIER_LEN}-byte identifier limit",
                    name.len()
                ),
            ));
        }
    }

    let mut seen: HashMap<&str, &str> = HashMap::new();
    for name in schema.names() {
        let stored = stored_identifier(name);
        if stored.is_empty() {
            return Err(invalid(name, "empty property names cannot be columns".to_string()));
        }
        if stored == KEY_COLUMN || stored == GEOMETRY_COLUMN {
            return Err(invalid(
                name,
                format!("collides with the generated '{stored}' column"),
            ));
        }
        if let Some(first) = seen.insert(stored, name) {
            return Err(invalid(
                name,
                format!("collides with property '{first}' after truncation to '{stored}'"),
            ));
        }
    }
    Ok(())
}

fn invalid(name: &str, reason: String) -> SinkError {
    SinkError::InvalidIdentifier {
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoload_core_common::Feature;
    use geoload_core_common::schema::infer_columns;
    use serde_json::json;

    fn schema() -> ColumnSchema {
        let properties = json!({"name": "a", "lanes": 2, "width": 3.5, "lit": true});
        let features = vec![Feature::new(
            None,
            properties.as_object().cloned().unwrap_or_default(),
        )];
        infer_columns(&features)
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("geojson_roads"), "\"geojson_roads\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_drop_table() {
        assert_eq!(
            drop_table("geojson_roads"),
            "DROP TABLE IF EXISTS \"geojson_roads\" CASCADE"
        );
    }

    #[test]
    fn test_create_table() {
        assert_eq!(
            create_table("geojson_roads", &schema(), Crs::Wgs84),
            "CREATE TABLE \"geojson_roads\" (gid SERIAL PRIMARY KEY, \"name\" TEXT, \
             \"lanes\" BIGINT, \"width\" DOUBLE PRECISION, \"lit\" BOOLEAN, \
             geom GEOMETRY(Geometry, 4326))"
        );
    }

    #[test]
    fn test_create_table_without_properties() {
        assert_eq!(
            create_table("geojson_x_lv95", &ColumnSchema::default(), Crs::Lv95),
            "CREATE TABLE \"geojson_x_lv95\" (gid SERIAL PRIMARY KEY, geom GEOMETRY(Geometry, 2056))"
        );
    }

    #[test]
    fn test_insert_row() {
        assert_eq!(
            insert_row("geojson_roads", &schema(), Crs::Lv95),
            "INSERT INTO \"geojson_roads\" (\"name\", \"lanes\", \"width\", \"lit\", geom) \
             VALUES ($1, $2, $3, $4, ST_SetSRID(ST_GeomFromGeoJSON($5::text), 2056))"
        );
    }

    #[test]
    fn test_insert_row_geometry_only() {
        assert_eq!(
            insert_row("t", &ColumnSchema::default(), Crs::Wgs84),
            "INSERT INTO \"t\" (geom) VALUES (ST_SetSRID(ST_GeomFromGeoJSON($1::text), 4326))"
        );
    }

    fn schema_with_keys(keys: &[&str]) -> ColumnSchema {
        let properties = keys
            .iter()
            .map(|key| ((*key).to_string(), json!(1)))
            .collect();
        infer_columns(&[Feature::new(None, properties)])
    }

    fn invalid_name(result: SinkResult<()>) -> String {
        match result {
            Err(SinkError::InvalidIdentifier { name, .. }) => name,
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_stored_identifier_truncates_on_char_boundary() {
        assert_eq!(stored_identifier("short"), "short");
        let long = "a".repeat(70);
        assert_eq!(stored_identifier(&long).len(), MAX_IDENTIFIER_LEN);
        // 62 ASCII bytes then a two-byte character straddling the limit.
        let straddling = format!("{}é", "b".repeat(62));
        assert_eq!(stored_identifier(&straddling), "b".repeat(62));
    }

    #[test]
    fn test_check_identifiers_accepts_ordinary_names() {
        assert!(check_identifiers("geojson_roads", &schema()).is_ok());
        assert!(check_identifiers("geojson_roads_lv95", &ColumnSchema::default()).is_ok());
        // Quoted identifiers are case-sensitive, so these do not clash.
        assert!(check_identifiers("t", &schema_with_keys(&["GID", "Geom"])).is_ok());
    }

    #[test]
    fn test_check_identifiers_rejects_long_table_names() {
        // The WGS84 names fit; the LV95 index name is 66 bytes.
        let stem = "s".repeat(44);
        let wgs84 = format!("geojson_{stem}");
        let lv95 = format!("geojson_{stem}_lv95");
        assert!(check_identifiers(&wgs84, &ColumnSchema::default()).is_ok());
        assert_eq!(
            invalid_name(check_identifiers(&lv95, &ColumnSchema::default())),
            spatial_index_name(&lv95)
        );

        let table = format!("geojson_{}", "s".repeat(56));
        assert_eq!(
            invalid_name(check_identifiers(&table, &ColumnSchema::default())),
            table
        );
    }

    #[test]
    fn test_check_identifiers_rejects_reserved_and_empty_columns() {
        assert_eq!(invalid_name(check_identifiers("t", &schema_with_keys(&["gid"]))), "gid");
        assert_eq!(
            invalid_name(check_identifiers("t", &schema_with_keys(&["name", "geom"]))),
            "geom"
        );
        assert_eq!(invalid_name(check_identifiers("t", &schema_with_keys(&[""]))), "");
    }

    #[test]
    fn test_check_identifiers_rejects_keys_equal_after_truncation() {
        let prefix = "k".repeat(MAX_IDENTIFIER_LEN);
        let first = format!("{prefix}_one");
        let second = format!("{prefix}_two");
        match check_identifiers("t", &schema_with_keys(&[first.as_str(), second.as_str()])) {
            Err(SinkError::InvalidIdentifier { name, reason }) => {
                assert_eq!(name, second);
                assert!(reason.contains(&first));
            },
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_spatial_index_and_count() {
        assert_eq!(spatial_index_name("geojson_roads"), "idx_geojson_roads_geom");
        assert_eq!(
            create_spatial_index("geojson_roads"),
            "CREATE INDEX \"idx_geojson_roads_geom\" ON \"geojson_roads\" USING GIST (geom)"
        );
        assert_eq!(count_rows("geojson_roads"), "SELECT count(*) FROM \"geojson_roads\"");
    }
}
