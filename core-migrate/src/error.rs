use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] core_ledger::LedgerError),

    #[error("Transport error: {0}")]
    Transport(#[from] migrate_traits::error::TransportError),
}

pub type Result<T> = std::result::Result<T, MigrateError>;
