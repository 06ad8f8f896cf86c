//! Sink traits implemented by the backend crates.
//!
//! The pipeline drives both sinks through these traits, which keeps it free of
//! database and HTTP client types and lets tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::SinkResult;
use crate::feature::Feature;
use crate::targets::Crs;

/// Outcome of a document index load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexReport {
    /// Documents visible in the index after the load.
    pub indexed: u64,
    /// Documents the index rejected.
    pub errors: u64,
}

/// A relational store that can replace a table with a feature set.
#[async_trait]
pub trait RelationalSink: Send {
    /// Drops `table` if present, recreates it from `features` and returns the
    /// row count the store reports afterwards.
    ///
    /// # Arguments
    ///
    /// * `table` - Target table name
    /// * `features` - Features to write; geometries must already be in `crs`
    /// * `crs` - Reference system the geometry column is tagged with
    async fn load(&mut self, table: &str, features: &[Feature], crs: Crs) -> SinkResult<u64>;
}

/// A search index that can be rebuilt from a feature set.
#[async_trait]
pub trait DocumentSink: Send {
    /// Deletes `index` if present, recreates it and writes one document per
    /// feature.
    async fn load(&mut self, index: &str, features: &[Feature]) -> SinkResult<IndexReport>;
}
