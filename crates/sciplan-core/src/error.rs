//! Error types for the SciPlan core crate.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the store, tab controllers, and export pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before any network call (missing fields, empty revision text).
    #[error("{0}")]
    Validation(String),

    /// The relay answered with an error payload or a non-success status.
    #[error("relay request failed: {0}")]
    Relay(String),

    /// The relay answered 2xx but the body did not have the expected shape.
    #[error("relay response was malformed: {0}")]
    MalformedResponse(String),

    /// A store subscriber reported a failure (logged, never propagated past the bus).
    #[error("subscriber error: {0}")]
    Subscriber(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
