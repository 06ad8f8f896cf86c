//! Custom error types for `GeoLoad` operations.
//!
//! Each variant keeps enough context (file, dataset, sink) to produce a
//! message a user can act on without reading a backtrace.

use std::path::PathBuf;

use geoload_core_common::{LoadTarget, SinkError, TransformError};
use thiserror::Error;

/// Main error type for `GeoLoad` operations.
#[derive(Debug, Error)]
pub enum GeoLoadError {
    /// I/O errors (directory scan, file read)
    #[error(transparent)]
    Io(#[from] IoError),

    /// Input files that are not valid JSON
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Coordinate transform failures
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A sink failed while loading a dataset
    #[error("{target} load of dataset '{dataset}' failed: {source}")]
    Sink {
        /// Sink that failed
        target: LoadTarget,
        /// Dataset being loaded
        dataset: String,
        /// Underlying sink error
        #[source]
        source: SinkError,
    },

    /// A sink could not be set up before any dataset was loaded
    #[error("{target} connection failed: {source}")]
    Connect {
        /// Sink that could not be reached
        target: LoadTarget,
        /// Underlying sink error
        #[source]
        source: SinkError,
    },

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic errors from dependencies
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// I/O related errors.
#[derive(Debug, Error)]
pub enum IoError {
    /// The data directory does not exist
    #[error("Directory not found: '{path}'")]
    DirectoryNotFound {
        /// The missing directory
        path: PathBuf,
    },

    /// Failed to list a directory
    #[error("Failed to list directory '{path}': {source}")]
    ReadDir {
        /// The directory
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a file
    #[error("Failed to read file '{path}': {source}")]
    Read {
        /// The file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Input parsing errors.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A file is not valid JSON
    #[error("Failed to parse '{path}' at line {line}, column {column}: {message}")]
    Parse {
        /// The file path
        path: PathBuf,
        /// Line of the syntax error
        line: usize,
        /// Column of the syntax error
        column: usize,
        /// Parser message
        message: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid option value
    #[error("Invalid {option} option: {message}")]
    InvalidOption {
        /// The option name
        option: String,
        /// Why it's invalid
        message: String,
    },
}

/// Type alias for Results using `GeoLoadError`.
pub type Result<T> = std::result::Result<T, GeoLoadError>;

impl GeoLoadError {
    /// Wraps a sink failure with the sink and dataset it happened in.
    pub fn sink(target: LoadTarget, dataset: impl Into<String>, source: SinkError) -> Self {
        Self::Sink {
            target,
            dataset: dataset.into(),
            source,
        }
    }

    /// Get a user-friendly error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => e.user_message(),
            Self::Format(e) => e.to_string(),
            Self::Transform(e) => format!("Reprojection error: {e}"),
            Self::Sink {
                target,
                dataset,
                source,
            } => format!("{target} load of '{dataset}' failed: {source}"),
            Self::Connect { target, source } => format!("Cannot connect to {target}: {source}"),
            Self::Config(e) => format!("Configuration error: {e}"),
            Self::Other(e) => format!("Error: {e}"),
        }
    }

    /// Get recovery suggestions if available.
    #[must_use]
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::Io(e) => e.recovery_suggestion(),
            Self::Format(_) => {
                Some("Check that the file is a valid GeoJSON FeatureCollection.".to_string())
            },
            Self::Sink { target, source, .. } | Self::Connect { target, source } => {
                sink_suggestion(*target, source)
            },
            Self::Config(_) => Some("Run 'geoload --help' to see accepted options.".to_string()),
            Self::Transform(_) | Self::Other(_) => None,
        }
    }

    /// Check if this error is potentially recoverable.
    ///
    /// Recoverable errors might be fixed by retrying after the user changes
    /// the configuration or starts a missing service.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Io(IoError::DirectoryNotFound { .. }) => true,
            Self::Sink { source, .. } | Self::Connect { source, .. } => source.is_connectivity(),
            _ => false,
        }
    }
}

fn sink_suggestion(target: LoadTarget, source: &SinkError) -> Option<String> {
    match source {
        SinkError::Connection { .. } | SinkError::Transport { .. } => match target {
            LoadTarget::Relational | LoadTarget::RelationalLv95 => Some(
                "Check that PostgreSQL is running and PG_HOST, PG_PORT, PG_DB, PG_USER and \
                 PG_PASSWORD are correct."
                    .to_string(),
            ),
            LoadTarget::DocumentIndex => {
                Some("Check that OpenSearch is running and OS_URL is correct.".to_string())
            },
        },
        SinkError::TypeMismatch { column, .. } => Some(format!(
            "Property '{column}' mixes value types across features; make them consistent."
        )),
        SinkError::Query { .. } => {
            Some("Check that the PostGIS extension is installed in the database.".to_string())
        },
        SinkError::InvalidIdentifier { .. } => Some(
            "Rename the file or property so it fits PostgreSQL's 63-byte identifier limit and \
             does not clash with the gid or geom columns."
                .to_string(),
        ),
        SinkError::Http { .. } | SinkError::Response { .. } => None,
    }
}

impl IoError {
    fn user_message(&self) -> String {
        match self {
            Self::DirectoryNotFound { path } => {
                format!("Data directory not found: {}", path.display())
            },
            Self::Read { path, .. } => format!("Failed to read file: {}", path.display()),
            Self::ReadDir { .. } => self.to_string(),
        }
    }

    fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::DirectoryNotFound { .. } => Some(
                "Pass --data-dir or set GEOLOAD_DATA_DIR to a directory containing .geojson files."
                    .to_string(),
            ),
            Self::Read { .. } | Self::ReadDir { .. } => {
                Some("Check file permissions and ensure you have access.".to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_message() {
        let err = GeoLoadError::sink(
            LoadTarget::RelationalLv95,
            "roads",
            SinkError::TypeMismatch {
                column: "lanes".to_string(),
                expected: "BIGINT".to_string(),
                found: "string".to_string(),
            },
        );
        assert_eq!(
            err.user_message(),
            "PostGIS LV95 load of 'roads' failed: Column 'lanes' has type BIGINT but a feature \
             supplied string"
        );
        assert!(err.recovery_suggestion().unwrap().contains("lanes"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_connectivity_is_recoverable() {
        let err = GeoLoadError::sink(
            LoadTarget::DocumentIndex,
            "roads",
            SinkError::Connection {
                endpoint: "http://localhost:9200".to_string(),
                message: "connection refused".to_string(),
            },
        );
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().unwrap().contains("OS_URL"));
    }

    #[test]
    fn test_directory_not_found() {
        let err: GeoLoadError = IoError::DirectoryNotFound {
            path: PathBuf::from("/missing"),
        }
        .into();
        assert_eq!(err.user_message(), "Data directory not found: /missing");
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_parse_error_display() {
        let err: GeoLoadError = FormatError::Parse {
            path: PathBuf::from("data/roads.geojson"),
            line: 3,
            column: 7,
            message: "expected value".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Failed to parse 'data/roads.geojson' at line 3, column 7: expected value"
        );
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_other_has_no_suggestion() {
        let err: GeoLoadError = anyhow::anyhow!("boom").into();
        assert_eq!(err.user_message(), "Error: boom");
        assert!(err.recovery_suggestion().is_none());
    }
}
