//! Index operations used by the sink, and their HTTP implementation.

use async_trait::async_trait;
use geoload_core_common::{JsonValue, SinkError, SinkResult};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response};

use crate::bulk::BulkResponse;
use crate::config::OpenSearchConfig;

/// The subset of the OpenSearch REST API the sink needs.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Deletes `index`. A missing index is not an error.
    async fn delete_index(&self, index: &str) -> SinkResult<()>;

    /// Creates `index` with the given settings and mappings.
    async fn create_index(&self, index: &str, body: &JsonValue) -> SinkResult<()>;

    /// Sends a newline-delimited bulk body.
    async fn bulk(&self, body: String) -> SinkResult<BulkResponse>;

    /// Makes recently indexed documents visible to search. Failures are
    /// logged, not returned.
    async fn refresh(&self, index: &str) -> SinkResult<()>;

    /// Number of searchable documents in `index`.
    async fn count(&self, index: &str) -> SinkResult<u64>;
}

/// [`IndexClient`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpIndexClient {
    client: Client,
    config: OpenSearchConfig,
}

impl HttpIndexClient {
    /// Creates a client for the configured cluster.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Connection`] if the HTTP client cannot be built.
    pub fn new(config: OpenSearchConfig) -> SinkResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.request_timeout)
            .build()
            .map_err(|e| SinkError::Connection {
                endpoint: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &OpenSearchConfig {
        &self.config
    }

    async fn send(&self, operation: &str, request: RequestBuilder) -> SinkResult<Response> {
        debug!("OpenSearch request: {operation}");
        request.send().await.map_err(|e| {
            if e.is_connect() {
                SinkError::Connection {
                    endpoint: self.config.base_url.clone(),
                    message: e.to_string(),
                }
            } else {
                SinkError::Transport {
                    operation: operation.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

async fn ensure_success(operation: &str, response: Response) -> SinkResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SinkError::Http {
        operation: operation.to_string(),
        status: status.as_u16(),
        body: truncate(&body, 512),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

async fn read_json(operation: &str, response: Response) -> SinkResult<JsonValue> {
    response.json().await.map_err(|e| SinkError::Response {
        operation: operation.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl IndexClient for HttpIndexClient {
    async fn delete_index(&self, index: &str) -> SinkResult<()> {
        let operation = format!("delete index {index}");
        let request = self
            .client
            .delete(self.config.url(index))
            .timeout(self.config.request_timeout);
        let response = self.send(&operation, request).await?;
        debug!("{operation}: HTTP {}", response.status());
        Ok(())
    }

    async fn create_index(&self, index: &str, body: &JsonValue) -> SinkResult<()> {
        let operation = format!("create index {index}");
        let request = self
            .client
            .put(self.config.url(index))
            .timeout(self.config.request_timeout)
            .json(body);
        let response = self.send(&operation, request).await?;
        ensure_success(&operation, response).await?;
        Ok(())
    }

    async fn bulk(&self, body: String) -> SinkResult<BulkResponse> {
        let operation = "bulk index";
        let request = self
            .client
            .post(self.config.url("_bulk"))
            .timeout(self.config.bulk_timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);
        let response = self.send(operation, request).await?;
        let response = ensure_success(operation, response).await?;
        response.json().await.map_err(|e| SinkError::Response {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }

    async fn refresh(&self, index: &str) -> SinkResult<()> {
        let operation = format!("refresh {index}");
        let request = self
            .client
            .post(self.config.url(&format!("{index}/_refresh")))
            .timeout(self.config.request_timeout);
        let response = self.send(&operation, request).await?;
        if !response.status().is_success() {
            warn!("{operation}: HTTP {}", response.status());
        }
        Ok(())
    }

    async fn count(&self, index: &str) -> SinkResult<u64> {
        let operation = format!("count {index}");
        let request = self
            .client
            .get(self.config.url(&format!("{index}/_count")))
            .timeout(self.config.request_timeout);
        let response = self.send(&operation, request).await?;
        let response = ensure_success(&operation, response).await?;
        let body = read_json(&operation, response).await?;
        body.get("count")
            .and_then(JsonValue::as_u64)
            .ok_or_else(|| SinkError::Response {
                operation,
                message: "missing 'count' field".to_string(),
            })
    }
}
