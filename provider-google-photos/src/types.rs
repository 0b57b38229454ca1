//! Google Photos Library API request and response types
//!
//! See <https://developers.google.com/photos/library/reference/rest>.

use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/albums`
#[derive(Debug, Serialize)]
pub struct AlbumCreateRequest {
    pub album: AlbumSpec,
}

#[derive(Debug, Serialize)]
pub struct AlbumSpec {
    pub title: String,
}

/// Response of `POST /v1/albums`
#[derive(Debug, Deserialize)]
pub struct AlbumCreateResponse {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Request body for `POST /v1/mediaItems:batchCreate`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateRequest {
    pub album_id: String,
    pub new_media_items: Vec<NewMediaItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItem {
    pub description: String,
    pub simple_media_item: SimpleMediaItem,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMediaItem {
    pub upload_token: String,
}

/// Response of `POST /v1/mediaItems:batchCreate`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateResponse {
    #[serde(default)]
    pub new_media_item_results: Vec<NewMediaItemResult>,
}

/// One entry of `newMediaItemResults`.
///
/// The `status` field is a `google.rpc.Status`; a created entry additionally
/// carries the full `mediaItem` resource.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMediaItemResult {
    #[serde(default)]
    pub upload_token: Option<String>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
    #[serde(default)]
    pub media_item: Option<MediaItem>,
}

#[derive(Debug, Deserialize)]
pub struct ItemStatus {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}
