//! Durable persistence for container progress records.

use crate::error::{LedgerError, Result};
use crate::record::ContainerRecord;
use async_trait::async_trait;
use migrate_traits::model::ContainerId;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Persistence seam for container progress records.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load the record for a container, `None` if none has been saved yet.
    ///
    /// A record that exists but cannot be parsed is
    /// [`LedgerError::Malformed`]; the caller decides whether to skip the
    /// container or abort.
    async fn load(&self, id: &ContainerId) -> Result<Option<ContainerRecord>>;

    /// Persist the record, replacing any previous version atomically.
    async fn save(&self, record: &ContainerRecord) -> Result<()>;

    /// Whether a record has ever been saved for this container
    async fn exists(&self, id: &ContainerId) -> bool;
}

/// File-backed progress store, one JSON file per container.
///
/// Writes go to a temporary sibling file first and are renamed into place,
/// so a crash mid-write never leaves a half-written record behind. The
/// ledger directory is created on first save.
pub struct FileProgressStore {
    dir: PathBuf,
}

impl FileProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &ContainerId) -> PathBuf {
        self.dir.join(id.ledger_file_name())
    }
}

#[async_trait]
impl ProgressStore for FileProgressStore {
    #[instrument(skip(self), fields(container = %id))]
    async fn load(&self, id: &ContainerId) -> Result<Option<ContainerRecord>> {
        let path = self.path_for(id);

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No progress record on disk");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let record: ContainerRecord =
            serde_json::from_str(&raw).map_err(|e| LedgerError::Malformed {
                container: id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Some(record))
    }

    #[instrument(skip(self, record), fields(container = %record.container_id))]
    async fn save(&self, record: &ContainerRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(&record.container_id);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;

        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        debug!(
            completed = record.completed_total(),
            "Progress record saved"
        );
        Ok(())
    }

    async fn exists(&self, id: &ContainerId) -> bool {
        tokio::fs::try_exists(self.path_for(id))
            .await
            .unwrap_or(false)
    }
}
