//! Table replace against a running PostGIS server.
//!
//! Run with `cargo test -p geoload-postgis -- --ignored` after pointing
//! `GEOLOAD_TEST_PG_HOST` (and optionally `GEOLOAD_TEST_PG_PORT`,
//! `GEOLOAD_TEST_PG_DB`, `GEOLOAD_TEST_PG_USER`, `GEOLOAD_TEST_PG_PASSWORD`)
//! at a database with the PostGIS extension installed.

use geoload_core_common::{Crs, Feature, RelationalSink, SinkError};
use geoload_postgis::{PostgisConfig, PostgisSink};
use serde_json::json;
use tokio_postgres::{Client, NoTls};

fn test_config() -> PostgisConfig {
    let host = std::env::var("GEOLOAD_TEST_PG_HOST")
        .expect("GEOLOAD_TEST_PG_HOST not set; skipping PostGIS integration test");
    let defaults = PostgisConfig::default();
    let var = |name: &str, default: String| std::env::var(name).unwrap_or(default);
    PostgisConfig::default()
        .with_host(host)
        .with_port(
            var("GEOLOAD_TEST_PG_PORT", defaults.port.to_string())
                .parse()
                .unwrap(),
        )
        .with_database(var("GEOLOAD_TEST_PG_DB", defaults.database.clone()))
        .with_credentials(
            var("GEOLOAD_TEST_PG_USER", defaults.user.clone()),
            var("GEOLOAD_TEST_PG_PASSWORD", defaults.password.clone()),
        )
}

async fn inspect(config: &PostgisConfig) -> Client {
    let mut pg = tokio_postgres::Config::new();
    pg.host(&config.host)
        .port(config.port)
        .dbname(&config.database)
        .user(&config.user)
        .password(&config.password);
    let (client, connection) = pg.connect(NoTls).await.unwrap();
    tokio::spawn(connection);
    client
}

async fn row_count(client: &Client, table: &str) -> i64 {
    client
        .query_one(&format!("SELECT count(*) FROM \"{table}\""), &[])
        .await
        .unwrap()
        .get(0)
}

fn point(x: f64, y: f64, properties: serde_json::Value) -> Feature {
    Feature::from_json(&json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [x, y]},
        "properties": properties
    }))
}

#[tokio::test]
#[ignore = "requires GEOLOAD_TEST_PG_HOST"]
async fn test_load_replaces_table_and_counts_rows() {
    let config = test_config();
    let table = "geojson_live_replace";
    let mut sink = PostgisSink::connect(&config).await.unwrap();
    let client = inspect(&config).await;

    let first = vec![
        point(7.44, 46.95, json!({"name": "Bern", "zip": 3000})),
        point(8.54, 47.37, json!({"name": "Zurich", "zip": "8001"})),
        Feature::from_json(&json!({"type": "Feature", "geometry": null, "properties": {}})),
    ];
    assert_eq!(sink.load(table, &first, Crs::Wgs84).await.unwrap(), 3);

    let row = client
        .query_one(
            &format!(
                "SELECT name, zip, ST_SRID(geom), ST_X(geom) FROM \"{table}\" WHERE gid = 1"
            ),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, String>(0), "Bern");
    assert_eq!(row.get::<_, i64>(1), 3000);
    assert_eq!(row.get::<_, i32>(2), 4326);
    assert!((row.get::<_, f64>(3) - 7.44).abs() < 1e-9);

    let nulls = client
        .query_one(
            &format!("SELECT count(*) FROM \"{table}\" WHERE geom IS NULL AND name IS NULL"),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(nulls.get::<_, i64>(0), 1);

    // A second load drops the previous rows and the previous columns.
    let second = vec![point(2_600_000.0, 1_200_000.0, json!({"lanes": 2}))];
    assert_eq!(sink.load(table, &second, Crs::Lv95).await.unwrap(), 1);
    assert_eq!(row_count(&client, table).await, 1);
    let srid = client
        .query_one(&format!("SELECT ST_SRID(geom) FROM \"{table}\""), &[])
        .await
        .unwrap();
    assert_eq!(srid.get::<_, i32>(0), 2056);
    assert!(
        client
            .query_one(&format!("SELECT name FROM \"{table}\""), &[])
            .await
            .is_err()
    );

    client
        .batch_execute(&format!("DROP TABLE \"{table}\""))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires GEOLOAD_TEST_PG_HOST"]
async fn test_failed_load_keeps_previous_table() {
    let config = test_config();
    let table = "geojson_live_rollback";
    let mut sink = PostgisSink::connect(&config).await.unwrap();
    let client = inspect(&config).await;

    let good = vec![
        point(7.0, 46.0, json!({"zip": 1000})),
        point(7.1, 46.1, json!({"zip": 1001})),
    ];
    assert_eq!(sink.load(table, &good, Crs::Wgs84).await.unwrap(), 2);

    // Rejected while building parameters, after the drop has run.
    let mismatched = vec![
        point(7.0, 46.0, json!({"zip": 2000})),
        point(7.1, 46.1, json!({"zip": "unknown"})),
    ];
    let err = sink.load(table, &mismatched, Crs::Wgs84).await.unwrap_err();
    assert!(matches!(err, SinkError::TypeMismatch { .. }), "{err:?}");
    assert_eq!(row_count(&client, table).await, 2);

    // Rejected by the server while inserting.
    let unparseable = vec![
        point(7.0, 46.0, json!({"zip": 3000})),
        Feature::from_json(&json!({
            "type": "Feature",
            "geometry": {"type": "Curve", "coordinates": [[7.0, 46.0]]},
            "properties": {"zip": 3001}
        })),
    ];
    let err = sink.load(table, &unparseable, Crs::Wgs84).await.unwrap_err();
    match err {
        SinkError::Query { operation, .. } => assert_eq!(operation, "insert row"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(row_count(&client, table).await, 2);

    // The sink's connection is still usable after a rollback.
    assert_eq!(sink.load(table, &good[..1], Crs::Wgs84).await.unwrap(), 1);

    client
        .batch_execute(&format!("DROP TABLE \"{table}\""))
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires GEOLOAD_TEST_PG_HOST"]
async fn test_reserved_column_is_rejected_before_drop() {
    let config = test_config();
    let table = "geojson_live_reserved";
    let mut sink = PostgisSink::connect(&config).await.unwrap();
    let client = inspect(&config).await;

    let good = vec![point(7.0, 46.0, json!({"name": "a"}))];
    assert_eq!(sink.load(table, &good, Crs::Wgs84).await.unwrap(), 1);

    let clashing = vec![point(7.0, 46.0, json!({"gid": 9}))];
    let err = sink.load(table, &clashing, Crs::Wgs84).await.unwrap_err();
    assert!(matches!(err, SinkError::InvalidIdentifier { ref name, .. } if name == "gid"));
    assert_eq!(row_count(&client, table).await, 1);

    client
        .batch_execute(&format!("DROP TABLE \"{table}\""))
        .await
        .unwrap();
}
