//! Error types for the product catalog client

use thiserror::Error;

/// Errors that can occur when fetching from the product catalog
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The request never produced a response (connection refused, reset, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The catalog answered with a non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Every attempt failed with a transient error
    #[error("Product catalog unavailable after {attempts} attempts: {last_error}")]
    RemoteUnavailable {
        /// Attempts made, including the first
        attempts: usize,
        /// The failure from the final attempt
        last_error: Box<CatalogError>,
    },

    /// The response body did not match the catalog schema
    #[error("Response decoding failed: {0}")]
    DecodeFailed(String),

    /// The caller cancelled the fetch
    #[error("Fetch cancelled")]
    Cancelled,

    /// The base URL could not be parsed
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// Whether another attempt could succeed.
    ///
    /// Only transport failures and error statuses are transient; a malformed body
    /// will be just as malformed the next time.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::UnexpectedStatus { .. })
    }
}
