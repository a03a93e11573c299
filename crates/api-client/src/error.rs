//! Error types for the API client crate.

use thiserror::Error;

use fintrack_core::sync::GatewayError;

/// Result type alias for API client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the finance service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the service
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// Create an API error from status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status if this is an API error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The sync pass distinguishes per-record rejections from transport trouble.
/// A decoded error response is a rejection; anything else, including a body
/// we could not decode, counts as transport.
impl From<ApiError> for GatewayError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Api { status, message } => GatewayError::Api { status, message },
            ApiError::Http(e) => GatewayError::transport(e.to_string()),
            ApiError::Json(e) => GatewayError::transport(format!("undecodable response: {}", e)),
        }
    }
}
