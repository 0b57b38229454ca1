use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("No refresh token available")]
    NoRefreshToken,

    #[error("Token file error: {0}")]
    TokenFile(String),

    #[error("Transport error: {0}")]
    Transport(#[from] migrate_traits::error::TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;
