//! Load targets and sink naming.
//!
//! Every dataset is published to the same fixed set of sinks. Sink names are
//! pure functions of the dataset name, so re-running a load replaces the same
//! table or index instead of accumulating new ones.
//!
//! # Examples
//!
//! ```
//! use geoload_core_common::targets::{Crs, LoadTarget};
//!
//! assert_eq!(LoadTarget::Relational.sink_name("bike-lanes"), "geojson_bike_lanes");
//! assert_eq!(LoadTarget::DocumentIndex.sink_name("bike-lanes"), "geojson-bike-lanes");
//! assert_eq!(LoadTarget::RelationalLv95.sink_name("bike-lanes"), "geojson_bike_lanes_lv95");
//! assert_eq!(LoadTarget::RelationalLv95.crs(), Crs::Lv95);
//! ```

use std::fmt;

/// Prefix of every relational table.
pub const TABLE_PREFIX: &str = "geojson_";

/// Prefix of every search index.
pub const INDEX_PREFIX: &str = "geojson-";

/// Dataset suffix of the reprojected relational copy.
pub const LV95_SUFFIX: &str = "-lv95";

/// The two coordinate reference systems this tool knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// WGS84 longitude/latitude, EPSG:4326.
    Wgs84,
    /// CH1903+ / LV95 easting/northing, EPSG:2056.
    Lv95,
}

impl Crs {
    /// The EPSG code, used as the PostGIS SRID.
    #[must_use]
    pub const fn srid(self) -> i32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Lv95 => 2056,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.srid())
    }
}

/// One of the sinks a dataset is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    /// PostGIS table in WGS84.
    Relational,
    /// OpenSearch index in WGS84.
    DocumentIndex,
    /// PostGIS table in LV95.
    RelationalLv95,
}

impl LoadTarget {
    /// All targets, in the order the pipeline loads them.
    pub const ALL: [LoadTarget; 3] = [
        LoadTarget::Relational,
        LoadTarget::DocumentIndex,
        LoadTarget::RelationalLv95,
    ];

    /// Coordinate reference system of the data written to this target.
    #[must_use]
    pub const fn crs(self) -> Crs {
        match self {
            LoadTarget::Relational | LoadTarget::DocumentIndex => Crs::Wgs84,
            LoadTarget::RelationalLv95 => Crs::Lv95,
        }
    }

    /// Whether the target needs the reprojected copy of the features.
    #[must_use]
    pub const fn is_reprojected(self) -> bool {
        matches!(self, LoadTarget::RelationalLv95)
    }

    /// Short label for progress output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            LoadTarget::Relational => "PostGIS",
            LoadTarget::DocumentIndex => "OpenSearch",
            LoadTarget::RelationalLv95 => "PostGIS LV95",
        }
    }

    /// Table or index name for `dataset`.
    #[must_use]
    pub fn sink_name(self, dataset: &str) -> String {
        match self {
            LoadTarget::Relational => table_name(dataset),
            LoadTarget::DocumentIndex => index_name(dataset),
            LoadTarget::RelationalLv95 => table_name(&format!("{dataset}{LV95_SUFFIX}")),
        }
    }
}

impl fmt::Display for LoadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Relational table name for a dataset. Hyphens are not valid in unquoted SQL
/// identifiers and become underscores.
#[must_use]
pub fn table_name(dataset: &str) -> String {
    format!("{TABLE_PREFIX}{}", dataset.replace('-', "_"))
}

/// Search index name for a dataset.
#[must_use]
pub fn index_name(dataset: &str) -> String {
    format!("{INDEX_PREFIX}{dataset}")
}
