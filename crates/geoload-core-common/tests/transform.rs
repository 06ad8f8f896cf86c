use geoload_core_common::reproject::Reprojector;
use geoload_core_common::sanitize::sanitize_features;
use geoload_core_common::schema::{ColumnType, infer_columns, infer_field_mapping};
use geoload_core_common::{Dataset, Geometry};
use serde_json::json;

fn mixed_dataset() -> Dataset {
    Dataset::from_json(
        "mixed",
        &json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [7.44, 46.95]},
                    "properties": {"count": 1}
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[7.0, 46.0], [7.0, 46.0], [7.1, 46.1], [7.0, 46.0]]]
                    },
                    "properties": {"name": "b", "count": null}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Curve", "coordinates": [[7.0, 46.0]]},
                    "properties": {"name": "c"}
                }
            ]
        }),
    )
}

/// Keys that first show up after the first feature still become columns, in
/// the order they were first seen.
#[test]
fn test_schema_covers_every_key_in_first_seen_order() {
    let dataset = mixed_dataset();
    let schema = infer_columns(&dataset.features);

    let columns: Vec<(&str, ColumnType)> = schema
        .columns()
        .iter()
        .map(|c| (c.name.as_str(), c.column_type))
        .collect();
    assert_eq!(
        columns,
        [("count", ColumnType::Integer), ("name", ColumnType::Text)]
    );
}

/// The document mapping only looks at the representative feature.
#[test]
fn test_field_mapping_uses_single_sample() {
    let dataset = mixed_dataset();
    let mapping = infer_field_mapping(&dataset.features[0].properties);
    assert_eq!(mapping.fields().len(), 1);
    assert!(mapping.get("name").is_none());
}

/// The three loads of a dataset get independent copies: sanitizing and
/// reprojecting never touch the parsed features.
#[test]
fn test_transforms_do_not_share_state() {
    let dataset = mixed_dataset();
    let pristine = dataset.clone();

    let reprojector = Reprojector::wgs84_to_lv95().unwrap();
    let sanitized = sanitize_features(&dataset.features);
    let projected = reprojector.reproject_features(&dataset.features).unwrap();

    assert_eq!(dataset, pristine);

    // Sanitized copy drops the repeated vertex, original keeps it.
    match (&sanitized[1].geometry, &dataset.features[1].geometry) {
        (Some(Geometry::Polygon(clean)), Some(Geometry::Polygon(raw))) => {
            assert_eq!(clean[0].len(), 3);
            assert_eq!(raw[0].len(), 4);
        },
        other => panic!("unexpected geometries: {other:?}"),
    }

    // Reprojected copy keeps the duplicate (only the index copy is sanitized).
    match &projected[1].geometry {
        Some(Geometry::Polygon(rings)) => {
            assert_eq!(rings[0].len(), 4);
            assert!(rings[0].iter().all(|p| p[0] > 2_400_000.0));
        },
        other => panic!("unexpected geometry: {other:?}"),
    }

    // Unknown geometry types pass through both transforms.
    assert_eq!(projected[2].geometry, dataset.features[2].geometry);
    assert_eq!(sanitized[2].geometry, dataset.features[2].geometry);
}
