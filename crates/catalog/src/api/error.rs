use thiserror::Error;

/// Failures at the catalog fetch boundary.
///
/// The `Display` text is what the front end shows to the user.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP 429 from the catalog.
    #[error("Too many requests. Please wait a moment.")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("HTTP error: {status}")]
    Status { status: u16 },

    /// Connection, TLS, or body read failure.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Body is not JSON or lacks the expected `data` envelope.
    #[error("Invalid API response format")]
    Malformed { reason: String },
}

impl CatalogError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CatalogError::RateLimited)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Status { status: 404 })
    }
}
