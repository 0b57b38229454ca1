//! Google Photos connector implementation
//!
//! Implements the `TransferClient` and `RegistrationClient` traits for the
//! Google Photos Library API.

use async_trait::async_trait;
use core_auth::CredentialProvider;
use migrate_traits::destination::{RegistrationClient, TransferClient};
use migrate_traits::error::Result as TransportResult;
use migrate_traits::http::{HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use migrate_traits::model::{RegistrationOutcome, RegistrationRequest, UploadToken};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{GooglePhotosError, Result};
use crate::types::{
    AlbumCreateRequest, AlbumCreateResponse, AlbumSpec, BatchCreateRequest, BatchCreateResponse,
    NewMediaItem, SimpleMediaItem,
};

/// Google Photos Library API base URL
const PHOTOS_API_BASE: &str = "https://photoslibrary.googleapis.com/v1";

/// Timeout for byte transfers; large originals take a while
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(600);

/// Google Photos Library API connector
///
/// Byte uploads go to the `/uploads` endpoint via the streaming pipe; the
/// returned token is redeemed with `mediaItems:batchCreate`, which commits
/// items into an album. A fresh access token is obtained from the
/// credential provider before every call.
pub struct GooglePhotosConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Supplies valid OAuth 2.0 access tokens
    credentials: Arc<dyn CredentialProvider>,

    api_base: String,
}

impl GooglePhotosConnector {
    /// Create a new Google Photos connector
    pub fn new(http_client: Arc<dyn HttpClient>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http_client,
            credentials,
            api_base: PHOTOS_API_BASE.to_string(),
        }
    }

    /// Override the API endpoint (used by tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn bearer_token(&self) -> Result<String> {
        Ok(self.credentials.access_token().await?)
    }
}

#[async_trait]
impl TransferClient for GooglePhotosConnector {
    #[instrument(skip(self, url), fields(filename = %filename))]
    async fn transfer(&self, url: &str, filename: &str) -> TransportResult<UploadToken> {
        let token = self.bearer_token().await?;

        debug!("Streaming item bytes to upload endpoint");

        let request = HttpRequest::new(HttpMethod::Post, format!("{}/uploads", self.api_base))
            .bearer_token(token)
            .header("Content-Type", "application/octet-stream")
            .header("X-Goog-Upload-File-Name", filename)
            .header("X-Goog-Upload-Protocol", "raw")
            .timeout(TRANSFER_TIMEOUT);

        let response = self.http_client.pipe(url.to_string(), request).await?;

        if !response.is_success() {
            return Err(GooglePhotosError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        // The upload endpoint answers with the bare token as the body
        let upload_token = response.text()?;
        if upload_token.is_empty() {
            return Err(
                GooglePhotosError::UploadFailed("Empty upload token".to_string()).into(),
            );
        }

        debug!("Upload token received");
        Ok(UploadToken::new(upload_token))
    }
}

#[async_trait]
impl RegistrationClient for GooglePhotosConnector {
    #[instrument(skip(self), fields(title = %title))]
    async fn create_container(&self, title: &str) -> TransportResult<String> {
        let token = self.bearer_token().await?;

        info!("Creating destination album");

        let body = AlbumCreateRequest {
            album: AlbumSpec {
                title: title.to_string(),
            },
        };

        let request = HttpRequest::new(HttpMethod::Post, format!("{}/albums", self.api_base))
            .bearer_token(token)
            .json(&body)?
            .timeout(Duration::from_secs(30));

        // Album creation is not idempotent; a transport retry after a
        // timeout could create a duplicate album.
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::none())
            .await?;

        if !response.is_success() {
            return Err(GooglePhotosError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        let album: AlbumCreateResponse = serde_json::from_slice(&response.body)
            .map_err(|e| GooglePhotosError::ParseError(e.to_string()))?;

        info!(album_id = %album.id, "Destination album created");
        Ok(album.id)
    }

    #[instrument(skip(self, items), fields(destination_id = %destination_id, count = items.len()))]
    async fn register(
        &self,
        destination_id: &str,
        items: &[RegistrationRequest],
    ) -> TransportResult<Vec<RegistrationOutcome>> {
        let token = self.bearer_token().await?;

        let body = BatchCreateRequest {
            album_id: destination_id.to_string(),
            new_media_items: items
                .iter()
                .map(|item| NewMediaItem {
                    description: item.description.clone(),
                    simple_media_item: SimpleMediaItem {
                        upload_token: item.upload_token.as_str().to_string(),
                    },
                })
                .collect(),
        };

        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/mediaItems:batchCreate", self.api_base),
        )
        .bearer_token(token)
        .json(&body)?
        .timeout(Duration::from_secs(30));

        // batchCreate commits items; a transport retry after a timeout
        // could register the same batch twice, outside the ledger's view.
        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::none())
            .await?;

        // Non-2xx means nothing in the batch was committed
        if !response.is_success() {
            return Err(GooglePhotosError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            }
            .into());
        }

        let parsed: BatchCreateResponse = serde_json::from_slice(&response.body)
            .map_err(|e| GooglePhotosError::ParseError(e.to_string()))?;

        if parsed.new_media_item_results.len() != items.len() {
            warn!(
                expected = items.len(),
                got = parsed.new_media_item_results.len(),
                "Batch response item count mismatch"
            );
        }

        let outcomes = parsed
            .new_media_item_results
            .into_iter()
            .map(|result| {
                let media_id = result.media_item.map(|item| item.id);
                let error = result.status.and_then(|s| s.message);

                // A 2xx entry without a media id cannot be trusted as
                // created; the item stays pending for the next run.
                if media_id.is_none() {
                    warn!(error = ?error, "Batch entry has no media id, treating as failed");
                }

                RegistrationOutcome {
                    ok: media_id.is_some(),
                    media_id,
                    error,
                }
            })
            .collect();

        Ok(outcomes)
    }
}
