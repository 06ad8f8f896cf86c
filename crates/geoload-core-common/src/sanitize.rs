//! Polygon ring cleanup for the search index's geometry validator.
//!
//! The document sink rejects rings containing zero-length segments, i.e. two
//! consecutive identical positions. Only polygon rings are touched; points and
//! lines are passed through as they are.

use geojson::Position;

use crate::feature::Feature;
use crate::geometry::Geometry;

/// Collapses runs of consecutive, exactly equal positions to their first
/// occurrence.
#[must_use]
pub fn dedup_ring(ring: &[Position]) -> Vec<Position> {
    let mut result: Vec<Position> = Vec::with_capacity(ring.len());
    for position in ring {
        if result.last() != Some(position) {
            result.push(position.clone());
        }
    }
    result
}

fn dedup_rings(rings: &[Vec<Position>]) -> Vec<Vec<Position>> {
    rings.iter().map(|ring| dedup_ring(ring)).collect()
}

/// Returns a copy of `geometry` with every polygon ring deduplicated.
#[must_use]
pub fn sanitize_geometry(geometry: &Geometry) -> Geometry {
    match geometry {
        Geometry::Polygon(rings) => Geometry::Polygon(dedup_rings(rings)),
        Geometry::MultiPolygon(polygons) => {
            Geometry::MultiPolygon(polygons.iter().map(|rings| dedup_rings(rings)).collect())
        },
        other => other.clone(),
    }
}

/// Returns copies of `features` with sanitized geometries.
#[must_use]
pub fn sanitize_features(features: &[Feature]) -> Vec<Feature> {
    features
        .iter()
        .map(|feature| feature.with_geometry(feature.geometry.as_ref().map(sanitize_geometry)))
        .collect()
}
