//! Error types for the Google Photos provider

use thiserror::Error;

/// Google Photos provider errors
#[derive(Error, Debug)]
pub enum GooglePhotosError {
    /// API request returned a non-success HTTP status
    #[error("Google Photos API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Upload endpoint answered but did not return a usable token
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Credential acquisition or refresh failed
    #[error("Credential error: {0}")]
    Credential(#[from] core_auth::AuthError),

    /// Transport error
    #[error(transparent)]
    Transport(#[from] migrate_traits::error::TransportError),
}

/// Result type for Google Photos operations
pub type Result<T> = std::result::Result<T, GooglePhotosError>;

impl From<GooglePhotosError> for migrate_traits::error::TransportError {
    fn from(error: GooglePhotosError) -> Self {
        match error {
            GooglePhotosError::ApiError {
                status_code,
                message,
            } => migrate_traits::error::TransportError::Http {
                status: status_code,
                message,
            },
            GooglePhotosError::UploadFailed(msg) => {
                migrate_traits::error::TransportError::OperationFailed(format!(
                    "Upload failed: {}",
                    msg
                ))
            }
            GooglePhotosError::ParseError(msg) => {
                migrate_traits::error::TransportError::OperationFailed(format!(
                    "Parse error: {}",
                    msg
                ))
            }
            GooglePhotosError::Credential(e) => {
                migrate_traits::error::TransportError::Unauthorized(e.to_string())
            }
            GooglePhotosError::Transport(e) => e,
        }
    }
}
