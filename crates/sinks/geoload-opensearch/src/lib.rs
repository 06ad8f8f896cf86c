//! OpenSearch sink for `GeoLoad`.
//!
//! A load deletes and recreates the dataset's index, bulk-indexes one
//! document per feature, refreshes, and reports the resulting document count
//! along with the number of documents the cluster rejected.

pub mod bulk;
pub mod client;
pub mod config;
pub mod loader;
pub mod mapping;

pub use bulk::BulkResponse;
pub use client::{HttpIndexClient, IndexClient};
pub use config::OpenSearchConfig;
pub use loader::OpenSearchSink;
