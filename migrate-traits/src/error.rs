use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    /// Credential is invalid and could not be refreshed.
    ///
    /// Unlike every other variant this one is not containable at item
    /// level; no later call can succeed until the grant is repaired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
