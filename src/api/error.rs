use thiserror::Error;

// ============================================================================
// API ERRORS
// ============================================================================

/// Errors surfaced by the board API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status. Displays as the response body text, or the
    /// status reason phrase when the body was empty.
    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    /// Transport-level failure, propagated unchanged.
    #[error(transparent)]
    Transport(Box<ureq::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}
