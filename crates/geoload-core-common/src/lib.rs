//! Common types and transforms shared across `GeoLoad` crates.
//!
//! This crate holds the data-transformation core that both sinks and the
//! pipeline depend on, preventing circular dependencies between them:
//!
//! - [`feature`] and [`geometry`]: the parsed feature model
//! - [`schema`]: relational column and document field inference
//! - [`reproject`]: WGS84 to LV95 coordinate transform
//! - [`sanitize`]: polygon ring deduplication
//! - [`targets`]: the fixed set of sinks and their names
//! - [`io`]: traits the sink crates implement

pub mod error;
pub mod feature;
pub mod geometry;
pub mod io;
pub mod reproject;
pub mod sanitize;
pub mod schema;
pub mod targets;

// Re-export commonly used types
pub use error::{SinkError, SinkResult, TransformError};
pub use feature::{Dataset, Feature};
pub use geometry::Geometry;
pub use io::{DocumentSink, IndexReport, RelationalSink};
pub use reproject::Reprojector;
pub use schema::{Column, ColumnSchema, ColumnType, FieldMapping, FieldType};
pub use targets::{Crs, LoadTarget};

pub use geojson::{JsonObject, JsonValue, Position};
