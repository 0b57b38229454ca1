//! Destination upload and registration abstractions.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{RegistrationOutcome, RegistrationRequest, UploadToken};

/// Moves item bytes from the source to the destination's upload endpoint.
///
/// A transfer commits nothing on the destination; the returned token is
/// only redeemed by a later registration call, so a failed transfer needs
/// no cleanup.
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Stream the bytes at `url` to the destination, returning the opaque
    /// upload token for the stored payload.
    async fn transfer(&self, url: &str, filename: &str) -> Result<UploadToken>;
}

/// Creates destination containers and registers uploaded bytes into them.
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    /// Create a destination container with the given title, returning its id.
    async fn create_container(&self, title: &str) -> Result<String>;

    /// Register uploaded items into the destination container.
    ///
    /// A transport-level failure is an `Err` and means nothing was
    /// registered. A successful call returns one outcome per request item;
    /// outcomes are independent and each must be inspected.
    async fn register(
        &self,
        destination_id: &str,
        items: &[RegistrationRequest],
    ) -> Result<Vec<RegistrationOutcome>>;
}
