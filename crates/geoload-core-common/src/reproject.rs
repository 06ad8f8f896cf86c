//! Reprojection from WGS84 (EPSG:4326) to Swiss LV95 (EPSG:2056).
//!
//! Coordinates are read in longitude/latitude order, transformed with
//! `proj4rs`, and rounded to centimetres. Ordinates beyond the second (such as
//! elevation) are copied through unchanged.

use geojson::Position;
use proj4rs::proj::Proj;

use crate::error::TransformError;
use crate::feature::Feature;
use crate::geometry::Geometry;

/// Proj definition of the geographic source system.
pub const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Proj definition of EPSG:2056 (CH1903+ / LV95).
pub const LV95_PROJ: &str = concat!(
    "+proj=somerc +lat_0=46.9524055555556 +lon_0=7.43958333333333 +k_0=1",
    " +x_0=2600000 +y_0=1200000 +ellps=bessel",
    " +towgs84=674.374,15.056,405.346,0,0,0,0 +units=m +no_defs"
);

/// Decimal places kept on projected easting/northing.
const PRECISION: i32 = 2;

/// A fixed forward transform between two coordinate reference systems.
#[derive(Clone)]
pub struct Reprojector {
    source: Proj,
    target: Proj,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("source", &WGS84_PROJ)
            .field("target", &LV95_PROJ)
            .finish()
    }
}

impl Reprojector {
    /// Builds the WGS84 to LV95 transform.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Projection`] if a definition fails to parse.
    pub fn wgs84_to_lv95() -> Result<Self, TransformError> {
        Ok(Self {
            source: Proj::from_proj_string(WGS84_PROJ)?,
            target: Proj::from_proj_string(LV95_PROJ)?,
        })
    }

    /// Transforms one `[lon, lat, ...]` position in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidPosition`] for positions with fewer
    /// than two ordinates and [`TransformError::Projection`] if the point
    /// cannot be projected.
    pub fn transform_position(&self, position: &Position) -> Result<Position, TransformError> {
        let [lon, lat, extra @ ..] = position.as_slice() else {
            return Err(TransformError::InvalidPosition {
                len: position.len(),
            });
        };

        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        proj4rs::transform::transform(&self.source, &self.target, &mut point)?;

        let mut projected = Vec::with_capacity(position.len());
        projected.push(round(point.0));
        projected.push(round(point.1));
        projected.extend_from_slice(extra);
        Ok(projected)
    }

    /// Returns a reprojected copy of `geometry`.
    ///
    /// Unsupported geometries are returned unchanged.
    ///
    /// # Errors
    ///
    /// Fails on the first position that cannot be transformed.
    pub fn reproject(&self, geometry: &Geometry) -> Result<Geometry, TransformError> {
        geometry.try_map_positions(|position| self.transform_position(position))
    }

    /// Returns independent copies of `features` with reprojected geometries.
    ///
    /// # Errors
    ///
    /// Fails on the first position that cannot be transformed.
    pub fn reproject_features(&self, features: &[Feature]) -> Result<Vec<Feature>, TransformError> {
        features
            .iter()
            .map(|feature| {
                let geometry = feature
                    .geometry
                    .as_ref()
                    .map(|g| self.reproject(g))
                    .transpose()?;
                Ok(feature.with_geometry(geometry))
            })
            .collect()
    }
}

fn round(value: f64) -> f64 {
    let factor = 10f64.powi(PRECISION);
    (value * factor).round() / factor
}
