//! Run configuration.

use std::path::PathBuf;

use geoload_opensearch::OpenSearchConfig;
use geoload_postgis::PostgisConfig;
use url::Url;

use crate::error::ConfigError;

/// Default directory scanned for input files.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Everything a run needs: where to read from and where to write to.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Directory scanned for `*.geojson` files
    pub data_dir: PathBuf,
    /// PostGIS connection
    pub postgis: PostgisConfig,
    /// OpenSearch connection
    pub opensearch: OpenSearchConfig,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            postgis: PostgisConfig::default(),
            opensearch: OpenSearchConfig::default(),
        }
    }
}

impl LoadConfig {
    /// Checks the settings that can be checked without contacting a server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for an empty PostgreSQL host or
    /// database, port 0, or an OpenSearch URL that is not an absolute
    /// `http`/`https` URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.postgis.host.trim().is_empty() {
            return Err(invalid("pg-host", "host must not be empty"));
        }
        if self.postgis.port == 0 {
            return Err(invalid("pg-port", "port must be between 1 and 65535"));
        }
        if self.postgis.database.trim().is_empty() {
            return Err(invalid("pg-db", "database name must not be empty"));
        }

        let url = Url::parse(&self.opensearch.base_url)
            .map_err(|e| invalid("os-url", &format!("'{}': {e}", self.opensearch.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "os-url",
                &format!("unsupported scheme '{}', expected http or https", url.scheme()),
            ));
        }
        if url.host_str().is_none() {
            return Err(invalid("os-url", "URL has no host"));
        }
        Ok(())
    }
}

fn invalid(option: &str, message: &str) -> ConfigError {
    ConfigError::InvalidOption {
        option: option.to_string(),
        message: message.to_string(),
    }
}
