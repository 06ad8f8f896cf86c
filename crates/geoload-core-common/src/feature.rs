//! Feature collection model and lenient GeoJSON parsing.

use geojson::{JsonObject, JsonValue};

use crate::geometry::Geometry;

/// One record of a dataset: a geometry plus loosely-typed properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Parsed geometry; `None` when the feature's geometry is `null` or missing.
    pub geometry: Option<Geometry>,
    /// Property map in document order.
    pub properties: JsonObject,
}

impl Feature {
    /// Creates a feature from a geometry and a property map.
    #[must_use]
    pub fn new(geometry: Option<Geometry>, properties: JsonObject) -> Self {
        Self {
            geometry,
            properties,
        }
    }

    /// Parses a GeoJSON `Feature` object.
    ///
    /// Missing or non-object `properties` become an empty map; the geometry is
    /// parsed with [`Geometry::from_json`], so unusual geometries are kept
    /// rather than rejected.
    #[must_use]
    pub fn from_json(value: &JsonValue) -> Self {
        let geometry = match value.get("geometry") {
            None | Some(JsonValue::Null) => None,
            Some(geometry) => Some(Geometry::from_json(geometry.clone())),
        };
        let properties = match value.get("properties") {
            Some(JsonValue::Object(map)) => map.clone(),
            _ => JsonObject::new(),
        };
        Self {
            geometry,
            properties,
        }
    }

    /// Returns a copy of this feature carrying `geometry` instead of its own.
    #[must_use]
    pub fn with_geometry(&self, geometry: Option<Geometry>) -> Self {
        Self {
            geometry,
            properties: self.properties.clone(),
        }
    }

    /// The GeoJSON rendering of the geometry, or `null`.
    #[must_use]
    pub fn geometry_json(&self) -> JsonValue {
        self.geometry
            .as_ref()
            .map_or(JsonValue::Null, Geometry::to_json)
    }
}

/// A named feature collection loaded from one input file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Dataset name, the input file stem used verbatim.
    pub name: String,
    /// Features in file order.
    pub features: Vec<Feature>,
}

impl Dataset {
    /// Creates a dataset from already parsed features.
    #[must_use]
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }

    /// Builds a dataset from a parsed GeoJSON document.
    ///
    /// Only the `features` array is consulted. A document without one yields
    /// an empty dataset, which the pipeline treats as a skip.
    #[must_use]
    pub fn from_json(name: impl Into<String>, document: &JsonValue) -> Self {
        let features = document
            .get("features")
            .and_then(JsonValue::as_array)
            .map(|features| features.iter().map(Feature::from_json).collect())
            .unwrap_or_default();
        Self::new(name, features)
    }

    /// Returns `true` when the dataset has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }
}
