//! Error types for the Flickr provider

use thiserror::Error;

/// Flickr provider errors
#[derive(Error, Debug)]
pub enum FlickrError {
    /// API request returned a non-success HTTP status
    #[error("Flickr API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// API answered 200 but the JSON envelope reports failure (stat != "ok")
    #[error("Flickr protocol error (code {code}): {message}")]
    ProtocolError { code: i64, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport error
    #[error(transparent)]
    Transport(#[from] migrate_traits::error::TransportError),
}

/// Result type for Flickr operations
pub type Result<T> = std::result::Result<T, FlickrError>;

impl From<FlickrError> for migrate_traits::error::TransportError {
    fn from(error: FlickrError) -> Self {
        match error {
            FlickrError::ApiError {
                status_code,
                message,
            } => migrate_traits::error::TransportError::Http {
                status: status_code,
                message,
            },
            FlickrError::ProtocolError { code, message } => {
                migrate_traits::error::TransportError::OperationFailed(format!(
                    "Flickr protocol error (code {}): {}",
                    code, message
                ))
            }
            FlickrError::ParseError(msg) => {
                migrate_traits::error::TransportError::OperationFailed(format!(
                    "Parse error: {}",
                    msg
                ))
            }
            FlickrError::Transport(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = FlickrError::ProtocolError {
            code: 1,
            message: "Photoset not found".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Flickr protocol error (code 1): Photoset not found"
        );
    }

    #[test]
    fn test_error_conversion() {
        let error = FlickrError::ApiError {
            status_code: 503,
            message: "unavailable".to_string(),
        };
        let transport: migrate_traits::error::TransportError = error.into();

        assert!(matches!(
            transport,
            migrate_traits::error::TransportError::Http { status: 503, .. }
        ));
    }
}
