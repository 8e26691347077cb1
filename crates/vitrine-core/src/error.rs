use thiserror::Error;

/// Application-wide error types for Vitrine.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed or returned a non-2xx status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Artwork id whose prefix does not name a known museum.
    #[error("Unknown artwork ID format: {0}")]
    UnknownArtworkId(String),

    /// Museum selector that maps to no known museum.
    #[error("Unknown museum: {0}")]
    UnknownMuseum(String),

    /// Known museum with no adapter in the registry.
    #[error("No adapter registered for museum {0}")]
    MuseumNotRegistered(String),

    /// Collection storage read/write failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if this error comes from the environment (network, upstream
    /// API) rather than from how the caller used the API.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_) | AppError::Timeout(_) | AppError::NetworkError(_)
        )
    }

    /// Returns true if this error indicates caller misuse: an id or selector
    /// that can never route anywhere.
    pub fn is_contract_error(&self) -> bool {
        matches!(
            self,
            AppError::UnknownArtworkId(_)
                | AppError::UnknownMuseum(_)
                | AppError::MuseumNotRegistered(_)
        )
    }
}
