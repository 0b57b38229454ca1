use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Malformed progress record for container {container}: {reason}")]
    Malformed { container: String, reason: String },

    #[error("Failed to serialize progress record: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
