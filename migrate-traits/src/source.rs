//! Source inventory abstraction.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ContainerId, ContainerPage, SourceContainer};

/// Read-only view of the source service's albums and their contents.
///
/// Implementations are stateless adapters over the source API; the caller
/// owns pagination state and passes explicit 1-based page numbers.
#[async_trait]
pub trait SourceInventory: Send + Sync {
    /// List all containers (albums) with their expected item counts.
    ///
    /// The synthetic [`ContainerId::Unfiled`] container is never part of
    /// this listing.
    async fn list_containers(&self) -> Result<Vec<SourceContainer>>;

    /// Fetch one page of a container's items.
    ///
    /// Pages are 1-based. The returned envelope carries the freshest total
    /// item count the source knows; for `Unfiled` that total is unknown to
    /// the caller until the first page arrives.
    async fn fetch_page(&self, id: &ContainerId, page: u32) -> Result<ContainerPage>;
}
