//! PostGIS sink for `GeoLoad`.
//!
//! Each load replaces one table: drop, create from the inferred column
//! schema, insert every feature, build a GIST index on the geometry column.
//! These steps share a transaction, so a failed load leaves the previous
//! table untouched.

pub mod config;
pub mod ddl;
pub mod loader;
pub mod value;

pub use config::PostgisConfig;
pub use loader::PostgisSink;
pub use value::SqlValue;
