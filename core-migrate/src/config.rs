//! Migration configuration.

use crate::error::{MigrateError, Result};
use migrate_traits::model::UNFILED_CONTAINER_TITLE;
use std::path::PathBuf;

/// Configuration for a migration run.
///
/// Built through [`MigrationConfigBuilder`], which validates fail-fast so a
/// misconfigured run dies before touching either service.
///
/// # Example
///
/// ```
/// use core_migrate::MigrationConfig;
///
/// let config = MigrationConfig::builder()
///     .ledger_dir("albums")
///     .include_unfiled(true)
///     .build()
///     .unwrap();
///
/// assert!(config.include_unfiled);
/// ```
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Directory holding one progress record file per container
    pub ledger_dir: PathBuf,
    /// Whether to migrate items that belong to no album
    pub include_unfiled: bool,
    /// Destination title for the unfiled pseudo-container.
    ///
    /// Seeded into the progress record before any page is fetched, so it
    /// wins over the title the source reports for that pool.
    pub unfiled_title: String,
}

impl MigrationConfig {
    pub fn builder() -> MigrationConfigBuilder {
        MigrationConfigBuilder::default()
    }
}

/// Builder for [`MigrationConfig`]
#[derive(Debug, Default)]
pub struct MigrationConfigBuilder {
    ledger_dir: Option<PathBuf>,
    include_unfiled: Option<bool>,
    unfiled_title: Option<String>,
}

impl MigrationConfigBuilder {
    pub fn ledger_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ledger_dir = Some(dir.into());
        self
    }

    pub fn include_unfiled(mut self, include: bool) -> Self {
        self.include_unfiled = Some(include);
        self
    }

    pub fn unfiled_title(mut self, title: impl Into<String>) -> Self {
        self.unfiled_title = Some(title.into());
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<MigrationConfig> {
        let ledger_dir = self
            .ledger_dir
            .ok_or_else(|| MigrateError::Config("ledger_dir is required".to_string()))?;

        if ledger_dir.as_os_str().is_empty() {
            return Err(MigrateError::Config(
                "ledger_dir must not be empty".to_string(),
            ));
        }

        let unfiled_title = self
            .unfiled_title
            .unwrap_or_else(|| UNFILED_CONTAINER_TITLE.to_string());
        if unfiled_title.is_empty() {
            return Err(MigrateError::Config(
                "unfiled_title must not be empty".to_string(),
            ));
        }

        Ok(MigrationConfig {
            ledger_dir,
            include_unfiled: self.include_unfiled.unwrap_or(true),
            unfiled_title,
        })
    }
}
