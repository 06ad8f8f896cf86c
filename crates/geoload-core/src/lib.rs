//! `geoload-core` drives a `GeoLoad` run: it finds the input files, parses
//! them into datasets and publishes each dataset to PostGIS (WGS84),
//! OpenSearch and PostGIS (LV95).
//!
//! The sinks are reached through the [`RelationalSink`] and [`DocumentSink`]
//! traits, so [`pipeline::load_dataset`] can be exercised without servers.
//!
//! [`RelationalSink`]: geoload_core_common::RelationalSink
//! [`DocumentSink`]: geoload_core_common::DocumentSink

pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod types;

pub use config::LoadConfig;
pub use error::{GeoLoadError, Result};
pub use pipeline::{LoadObserver, NoopObserver, load_all, load_dataset, run};
pub use types::{DatasetReport, RunSummary, SinkOutcome};

pub use geoload_core_common::{Crs, LoadTarget};
pub use geoload_opensearch::OpenSearchConfig;
pub use geoload_postgis::PostgisConfig;
