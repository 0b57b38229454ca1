//! # Core Migration Engine
//!
//! Orchestrates a resumable, idempotent media migration between a source
//! inventory service and a destination library service.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Migrator`]: the sequential migration pipeline (enumerate, transfer,
//!   register, record)
//! - [`MigrationConfig`]: validated run configuration
//! - [`MigrationReport`]: per-run summary counters
//! - Logging setup for migration binaries
//!
//! The service seams ([`SourceInventory`](migrate_traits::source::SourceInventory),
//! [`TransferClient`](migrate_traits::destination::TransferClient),
//! [`RegistrationClient`](migrate_traits::destination::RegistrationClient) and
//! [`ProgressStore`](core_ledger::ProgressStore)) are injected, so the engine
//! is independent of any concrete service pair.

pub mod config;
pub mod error;
pub mod logging;
pub mod migrator;
pub mod progress;

pub use config::{MigrationConfig, MigrationConfigBuilder};
pub use error::{MigrateError, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
pub use migrator::Migrator;
pub use progress::{ContainerPhase, MigrationReport};
