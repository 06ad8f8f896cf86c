//! Geometry model shared by every transform and sink.
//!
//! [`Geometry`] is a closed tagged union over the six point/line/polygon
//! variants. Each variant carries its coordinate tree at the nesting depth the
//! type dictates, so transforms recurse through the tree by type instead of
//! inspecting values at every level. Anything the model does not understand is
//! kept verbatim in [`Geometry::Unsupported`] and passes through untouched.

use geojson::{JsonObject, JsonValue, Position, Value};

/// A parsed feature geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single position.
    Point(Position),
    /// A sequence of positions.
    MultiPoint(Vec<Position>),
    /// A sequence of positions forming a path.
    LineString(Vec<Position>),
    /// A sequence of paths.
    MultiLineString(Vec<Vec<Position>>),
    /// A sequence of rings; the first is the exterior.
    Polygon(Vec<Vec<Position>>),
    /// A sequence of polygons.
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    /// A geometry of unknown type or without usable coordinates, kept as raw JSON.
    Unsupported(JsonValue),
}

impl Geometry {
    /// Parses a GeoJSON geometry object.
    ///
    /// This never fails: geometries the `geojson` crate rejects, and
    /// `GeometryCollection`s, become [`Geometry::Unsupported`].
    #[must_use]
    pub fn from_json(value: JsonValue) -> Self {
        match geojson::Geometry::from_json_value(value.clone()) {
            Ok(geometry) => match geometry.value {
                Value::Point(p) => Self::Point(p),
                Value::MultiPoint(points) => Self::MultiPoint(points),
                Value::LineString(line) => Self::LineString(line),
                Value::MultiLineString(lines) => Self::MultiLineString(lines),
                Value::Polygon(rings) => Self::Polygon(rings),
                Value::MultiPolygon(polygons) => Self::MultiPolygon(polygons),
                Value::GeometryCollection(_) => Self::Unsupported(value),
            },
            Err(err) => {
                log::debug!("Keeping unsupported geometry as-is: {err}");
                Self::Unsupported(value)
            },
        }
    }

    /// Renders the geometry back to a GeoJSON object.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let value = match self {
            Self::Point(p) => Value::Point(p.clone()),
            Self::MultiPoint(points) => Value::MultiPoint(points.clone()),
            Self::LineString(line) => Value::LineString(line.clone()),
            Self::MultiLineString(lines) => Value::MultiLineString(lines.clone()),
            Self::Polygon(rings) => Value::Polygon(rings.clone()),
            Self::MultiPolygon(polygons) => Value::MultiPolygon(polygons.clone()),
            Self::Unsupported(raw) => return raw.clone(),
        };
        JsonValue::Object(JsonObject::from(&value))
    }

    /// The GeoJSON type tag, or whatever `type` the unsupported geometry declared.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Point(_) => "Point",
            Self::MultiPoint(_) => "MultiPoint",
            Self::LineString(_) => "LineString",
            Self::MultiLineString(_) => "MultiLineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::Unsupported(raw) => raw
                .get("type")
                .and_then(JsonValue::as_str)
                .unwrap_or("Unknown"),
        }
    }

    /// Nesting depth of the coordinate tree: 0 for a bare position up to 3
    /// for a multipolygon. `None` for unsupported geometries.
    #[must_use]
    pub fn depth(&self) -> Option<usize> {
        match self {
            Self::Point(_) => Some(0),
            Self::MultiPoint(_) | Self::LineString(_) => Some(1),
            Self::MultiLineString(_) | Self::Polygon(_) => Some(2),
            Self::MultiPolygon(_) => Some(3),
            Self::Unsupported(_) => None,
        }
    }

    /// Applies `f` to every position, rebuilding the tree with the same shape.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    pub fn try_map_positions<E, F>(&self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(&Position) -> Result<Position, E>,
    {
        Ok(match self {
            Self::Point(p) => Self::Point(p.try_map(&mut f)?),
            Self::MultiPoint(points) => Self::MultiPoint(points.try_map(&mut f)?),
            Self::LineString(line) => Self::LineString(line.try_map(&mut f)?),
            Self::MultiLineString(lines) => Self::MultiLineString(lines.try_map(&mut f)?),
            Self::Polygon(rings) => Self::Polygon(rings.try_map(&mut f)?),
            Self::MultiPolygon(polygons) => Self::MultiPolygon(polygons.try_map(&mut f)?),
            Self::Unsupported(raw) => Self::Unsupported(raw.clone()),
        })
    }
}

/// A coordinate tree of statically known depth.
///
/// Implemented for a single [`Position`] (depth 0) and for `Vec<T>` of any
/// coordinate tree (depth of `T` plus one).
pub trait Coordinates: Sized {
    /// Rebuilds the tree with `f` applied to each position.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `f`.
    fn try_map<E, F>(&self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Position) -> Result<Position, E>;
}

impl Coordinates for Position {
    fn try_map<E, F>(&self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Position) -> Result<Position, E>,
    {
        f(self)
    }
}

impl<T: Coordinates> Coordinates for Vec<T> {
    fn try_map<E, F>(&self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(&Position) -> Result<Position, E>,
    {
        self.iter().map(|child| child.try_map(&mut *f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::convert::Infallible;

    #[test]
    fn test_parse_polygon() {
        let geometry = Geometry::from_json(json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }));
        assert_eq!(geometry.depth(), Some(2));
        assert_eq!(geometry.type_name(), "Polygon");
        match geometry {
            Geometry::Polygon(rings) => assert_eq!(rings[0].len(), 4),
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_type_is_kept_verbatim() {
        let raw = json!({"type": "Circle", "coordinates": [1.0, 2.0], "radius": 3});
        let geometry = Geometry::from_json(raw.clone());
        assert_eq!(geometry, Geometry::Unsupported(raw.clone()));
        assert_eq!(geometry.type_name(), "Circle");
        assert_eq!(geometry.depth(), None);
        assert_eq!(geometry.to_json(), raw);
    }

    #[test]
    fn test_parse_missing_coordinates_is_unsupported() {
        let raw = json!({"type": "Point"});
        assert_eq!(Geometry::from_json(raw.clone()), Geometry::Unsupported(raw));
    }

    #[test]
    fn test_geometry_collection_is_unsupported() {
        let raw = json!({
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [1.0, 2.0]}]
        });
        assert!(matches!(Geometry::from_json(raw), Geometry::Unsupported(_)));
    }

    #[test]
    fn test_depths() {
        let p = vec![0.0, 0.0];
        assert_eq!(Geometry::Point(p.clone()).depth(), Some(0));
        assert_eq!(Geometry::MultiPoint(vec![p.clone()]).depth(), Some(1));
        assert_eq!(Geometry::LineString(vec![p.clone()]).depth(), Some(1));
        assert_eq!(Geometry::MultiLineString(vec![vec![p.clone()]]).depth(), Some(2));
        assert_eq!(Geometry::MultiPolygon(vec![vec![vec![p]]]).depth(), Some(3));
    }

    #[test]
    fn test_to_json_round_trips_point() {
        let geometry = Geometry::Point(vec![7.5, 46.9, 540.0]);
        let rendered = geometry.to_json();
        assert_eq!(rendered["type"], "Point");
        assert_eq!(rendered["coordinates"], json!([7.5, 46.9, 540.0]));
        assert_eq!(Geometry::from_json(rendered), geometry);
    }

    #[test]
    fn test_try_map_positions_visits_every_position() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0], vec![1.0, 1.0]]],
            vec![vec![vec![2.0, 2.0]], vec![vec![3.0, 3.0]]],
        ]);
        let mut visited = 0;
        let shifted = geometry
            .try_map_positions(|p| {
                visited += 1;
                Ok::<_, Infallible>(vec![p[0] + 10.0, p[1]])
            })
            .unwrap();
        assert_eq!(visited, 4);
        assert_eq!(
            shifted,
            Geometry::MultiPolygon(vec![
                vec![vec![vec![10.0, 0.0], vec![11.0, 1.0]]],
                vec![vec![vec![12.0, 2.0]], vec![vec![13.0, 3.0]]],
            ])
        );
    }
}
