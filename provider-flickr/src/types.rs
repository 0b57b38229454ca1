//! Flickr REST API response types
//!
//! All endpoints are called with `format=json&nojsoncallback=1`. Flickr
//! serializes several numeric fields as strings (notably `total`), so the
//! paging fields accept both representations.

use serde::{Deserialize, Deserializer};

/// Status envelope present on every REST response.
///
/// `stat` is `"ok"` on success; on failure `code` and `message` describe the
/// protocol error.
#[derive(Debug, Deserialize)]
pub struct ResponseStatus {
    pub stat: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseStatus {
    pub fn is_ok(&self) -> bool {
        self.stat == "ok"
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn de_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => u32::try_from(n).map_err(serde::de::Error::custom),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Wrapper for Flickr's `{"_content": "..."}` text fields
#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(rename = "_content")]
    pub content: String,
}

/// Response of `flickr.photosets.getList`
#[derive(Debug, Deserialize)]
pub struct PhotosetsListResponse {
    pub photosets: PhotosetList,
}

#[derive(Debug, Deserialize)]
pub struct PhotosetList {
    pub photoset: Vec<Photoset>,
}

/// One photoset as returned by `flickr.photosets.getList`
#[derive(Debug, Deserialize)]
pub struct Photoset {
    pub id: String,
    pub title: Content,
    #[serde(deserialize_with = "de_u64")]
    pub photos: u64,
    #[serde(deserialize_with = "de_u64")]
    pub videos: u64,
}

/// Response of `flickr.photosets.getPhotos`
#[derive(Debug, Deserialize)]
pub struct PhotosetPhotosResponse {
    pub photoset: PhotosetPage,
}

#[derive(Debug, Deserialize)]
pub struct PhotosetPage {
    pub id: String,
    pub title: String,
    pub photo: Vec<PhotoEntry>,
    #[serde(deserialize_with = "de_u32")]
    pub page: u32,
    #[serde(deserialize_with = "de_u32")]
    pub pages: u32,
    #[serde(deserialize_with = "de_u64")]
    pub total: u64,
}

/// Response of `flickr.photos.getNotInSet`
#[derive(Debug, Deserialize)]
pub struct NotInSetResponse {
    pub photos: PhotoPool,
}

#[derive(Debug, Deserialize)]
pub struct PhotoPool {
    pub photo: Vec<PhotoEntry>,
    #[serde(deserialize_with = "de_u32")]
    pub page: u32,
    #[serde(deserialize_with = "de_u32")]
    pub pages: u32,
    #[serde(deserialize_with = "de_u64")]
    pub total: u64,
}

/// One photo or video entry from a paged listing.
///
/// `url_o` and `originalformat` come from the `extras` request parameter
/// and are absent when the account does not expose originals.
#[derive(Debug, Deserialize)]
pub struct PhotoEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub url_o: Option<String>,
    #[serde(default)]
    pub originalformat: Option<String>,
}
