//! Connection settings for the OpenSearch sink.

use std::time::Duration;

/// Default cluster URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Timeout for index management, refresh and count requests.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Timeout for bulk requests, which carry the whole dataset.
const DEFAULT_BULK_TIMEOUT_SECS: u64 = 120;

/// Configuration for [`HttpIndexClient`](crate::client::HttpIndexClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSearchConfig {
    /// Cluster base URL without a trailing slash
    pub base_url: String,
    /// Timeout for every request except bulk
    pub request_timeout: Duration,
    /// Timeout for bulk requests
    pub bulk_timeout: Duration,
}

impl Default for OpenSearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            bulk_timeout: Duration::from_secs(DEFAULT_BULK_TIMEOUT_SECS),
        }
    }
}

impl OpenSearchConfig {
    /// Creates a configuration for the given base URL. Trailing slashes are
    /// removed.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the timeout for non-bulk requests.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the bulk request timeout.
    #[must_use]
    pub fn with_bulk_timeout(mut self, timeout: Duration) -> Self {
        self.bulk_timeout = timeout;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}
