//! Index rebuild driven through an [`IndexClient`].

use async_trait::async_trait;
use geoload_core_common::sanitize::sanitize_features;
use geoload_core_common::schema::infer_field_mapping;
use geoload_core_common::{DocumentSink, Feature, IndexReport, SinkResult};
use log::{debug, info, warn};

use crate::bulk::build_bulk_body;
use crate::client::IndexClient;
use crate::mapping::index_body;

/// Writes feature collections to OpenSearch indices.
///
/// The field mapping is inferred from the first feature only. Geometries are
/// sanitized on a private copy before indexing, since `geo_shape` rejects
/// rings with repeated consecutive vertices.
pub struct OpenSearchSink<C> {
    client: C,
}

impl<C: IndexClient> OpenSearchSink<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C: IndexClient> DocumentSink for OpenSearchSink<C> {
    async fn load(&mut self, index: &str, features: &[Feature]) -> SinkResult<IndexReport> {
        let Some(sample) = features.first() else {
            debug!("No features for {index}; leaving it untouched");
            return Ok(IndexReport::default());
        };

        info!("Indexing {} feature(s) into {index}", features.len());
        let documents = sanitize_features(features);
        let mapping = infer_field_mapping(&sample.properties);

        self.client.delete_index(index).await?;
        self.client.create_index(index, &index_body(&mapping)).await?;

        let response = self.client.bulk(build_bulk_body(index, &documents)).await?;
        let errors = response.error_count();
        if errors > 0 {
            warn!("{errors} document(s) rejected by {index}");
        }

        self.client.refresh(index).await?;
        let indexed = self.client.count(index).await?;
        info!("Index {index} now holds {indexed} document(s)");

        Ok(IndexReport { indexed, errors })
    }
}
