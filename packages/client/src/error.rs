//! Client error types
use thiserror::Error;

/// Result type for API operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Fallback shown when the server gives no usable message
pub const GENERIC_SERVER_ERROR: &str = "Terjadi kesalahan pada server. Silakan coba lagi.";

/// Shown for transport failures (offline, timeout, refused connection)
pub const GENERIC_UNEXPECTED_ERROR: &str =
    "Terjadi kesalahan yang tidak terduga. Periksa koneksi Anda dan coba lagi.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Response body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for a toast or error banner
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            ClientError::Api { .. } => GENERIC_SERVER_ERROR.to_string(),
            _ => GENERIC_UNEXPECTED_ERROR.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(
            ClientError::api(422, "Vendor belum terverifikasi").user_message(),
            "Vendor belum terverifikasi"
        );
        assert_eq!(ClientError::api(500, "").user_message(), GENERIC_SERVER_ERROR);
        assert_eq!(
            ClientError::Network("connection refused".to_string()).user_message(),
            GENERIC_UNEXPECTED_ERROR
        );
    }

    #[test]
    fn test_error_display() {
        let error = ClientError::api(404, "Not found");
        assert_eq!(error.to_string(), "API error (404): Not found");
        assert_eq!(error.status(), Some(404));
        assert!(!error.is_network_error());
    }
}
