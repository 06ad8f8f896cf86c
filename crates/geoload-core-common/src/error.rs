//! Error types shared by the transform core and the sink crates.

use thiserror::Error;

/// Errors raised while transforming coordinates.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The projection library rejected a definition or a coordinate.
    #[error("Projection failed: {0}")]
    Projection(#[from] proj4rs::errors::Error),

    /// A position had fewer than two ordinates.
    #[error("Invalid position with {len} ordinate(s); expected at least 2")]
    InvalidPosition {
        /// Number of ordinates found
        len: usize,
    },
}

/// Errors raised by a sink while loading a dataset.
///
/// Sinks report failures in these terms so the pipeline can classify them
/// without depending on any database or HTTP client crate.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink endpoint could not be reached or the connection dropped.
    #[error("Connection to {endpoint} failed: {message}")]
    Connection {
        /// Host, port or URL that was contacted
        endpoint: String,
        /// Underlying failure
        message: String,
    },

    /// A statement failed inside the sink.
    #[error("Query failed during {operation}: {message}")]
    Query {
        /// What the loader was doing (e.g. "create table")
        operation: String,
        /// Database error text
        message: String,
    },

    /// A property value did not fit its inferred column type.
    #[error("Column '{column}' has type {expected} but a feature supplied {found}")]
    TypeMismatch {
        /// Column name
        column: String,
        /// Column type from schema inference
        expected: String,
        /// Kind of the offending value
        found: String,
    },

    /// A table, index or column name cannot be used as a database identifier.
    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier {
        /// The offending name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// An HTTP request completed with a non-success status.
    #[error("{operation} returned HTTP {status}: {body}")]
    Http {
        /// Request description (e.g. "create index geojson-roads")
        operation: String,
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// An HTTP request could not be sent or its response not received.
    #[error("{operation} failed: {message}")]
    Transport {
        /// Request description
        operation: String,
        /// Client error text
        message: String,
    },

    /// The sink answered with a body that could not be interpreted.
    #[error("Unexpected response from {operation}: {message}")]
    Response {
        /// Request description
        operation: String,
        /// Decoding failure
        message: String,
    },
}

impl SinkError {
    /// Returns `true` for failures caused by an unreachable endpoint.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Transport { .. })
    }
}

/// Result alias for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;
