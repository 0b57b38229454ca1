//! Flickr API connector implementation
//!
//! Implements the `SourceInventory` trait against the Flickr REST API.

use async_trait::async_trait;
use migrate_traits::error::Result as TransportResult;
use migrate_traits::http::{HttpClient, HttpMethod, HttpRequest};
use migrate_traits::model::{
    ContainerId, ContainerPage, MediaFilter, MediaKind, SourceContainer, SourceItem,
    UNFILED_CONTAINER_TITLE,
};
use migrate_traits::source::SourceInventory;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{FlickrError, Result};
use crate::types::{
    NotInSetResponse, PhotoEntry, PhotosetPhotosResponse, PhotosetsListResponse, ResponseStatus,
};

/// Flickr REST endpoint
const FLICKR_API_BASE: &str = "https://api.flickr.com/services/rest/";

/// Maximum results per page (Flickr API limit)
const PER_PAGE: u32 = 500;

/// Extra fields requested on paged listings
const PAGE_EXTRAS: &str = "url_o,media,original_format";

/// Flickr API connector
///
/// Implements `SourceInventory` over three REST methods:
/// - `flickr.photosets.getList` for the container listing
/// - `flickr.photosets.getPhotos` for pages of a named container
/// - `flickr.photos.getNotInSet` for pages of the unfiled pseudo-container
///
/// The connector is stateless; pagination is driven entirely by the caller.
pub struct FlickrConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    api_key: String,

    /// NSID of the account being migrated
    user_id: String,

    /// Which media kinds listings should include
    media: MediaFilter,

    api_base: String,
}

impl FlickrConnector {
    /// Create a new Flickr connector
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
        media: MediaFilter,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            user_id: user_id.into(),
            media,
            api_base: FLICKR_API_BASE.to_string(),
        }
    }

    /// Override the API endpoint (used by tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Build a REST method URL with the common parameters
    fn method_url(&self, method: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&api_key={}&user_id={}&format=json&nojsoncallback=1",
            self.api_base,
            method,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.user_id)
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }
        url
    }

    /// Execute a REST call and parse the response body.
    ///
    /// A 200 with `stat != "ok"` in the envelope is a protocol error, not a
    /// transport one.
    async fn call<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let request =
            HttpRequest::new(HttpMethod::Get, &url).timeout(Duration::from_secs(30));

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(FlickrError::ApiError {
                status_code: response.status,
                message: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let status: ResponseStatus = serde_json::from_slice(&response.body)
            .map_err(|e| FlickrError::ParseError(format!("Missing status envelope: {}", e)))?;

        if !status.is_ok() {
            return Err(FlickrError::ProtocolError {
                code: status.code.unwrap_or(-1),
                message: status.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        serde_json::from_slice(&response.body).map_err(|e| FlickrError::ParseError(e.to_string()))
    }

    /// Convert a listing entry into a migratable item.
    ///
    /// Entries without an original-size URL cannot be transferred; they are
    /// logged and dropped from the page.
    fn convert_entry(&self, entry: PhotoEntry) -> Option<SourceItem> {
        let kind = match entry.media.as_deref() {
            Some("video") => MediaKind::Video,
            _ => MediaKind::Photo,
        };

        let Some(download_url) = entry.url_o else {
            warn!(item_id = %entry.id, "Entry has no original-size URL, skipping");
            return None;
        };

        let extension = entry
            .originalformat
            .unwrap_or_else(|| kind.default_extension().to_string());

        Some(SourceItem {
            filename: format!("flickr_{}.{}", entry.id, extension),
            id: entry.id,
            kind,
            title: entry.title,
            download_url,
        })
    }

    fn page_params<'a>(&'a self, page_str: &'a str, per_page_str: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("media", self.media.as_str()),
            ("extras", PAGE_EXTRAS),
            ("page", page_str),
            ("per_page", per_page_str),
        ]
    }
}

#[async_trait]
impl SourceInventory for FlickrConnector {
    #[instrument(skip(self))]
    async fn list_containers(&self) -> TransportResult<Vec<SourceContainer>> {
        info!("Listing photosets");

        let url = self.method_url("flickr.photosets.getList", &[]);
        let response: PhotosetsListResponse = self.call(url).await?;

        let containers: Vec<SourceContainer> = response
            .photosets
            .photoset
            .into_iter()
            .map(|set| SourceContainer {
                id: ContainerId::Named(set.id),
                title: set.title.content,
                photos: set.photos,
                videos: set.videos,
            })
            .collect();

        info!(count = containers.len(), "Listed photosets");
        Ok(containers)
    }

    #[instrument(skip(self), fields(container = %id, page = page))]
    async fn fetch_page(&self, id: &ContainerId, page: u32) -> TransportResult<ContainerPage> {
        debug!("Fetching listing page");

        let page_str = page.to_string();
        let per_page_str = PER_PAGE.to_string();

        match id {
            ContainerId::Named(set_id) => {
                let mut params = self.page_params(&page_str, &per_page_str);
                params.push(("photoset_id", set_id));
                let url = self.method_url("flickr.photosets.getPhotos", &params);

                let response: PhotosetPhotosResponse = self.call(url).await?;
                let envelope = response.photoset;

                Ok(ContainerPage {
                    items: envelope
                        .photo
                        .into_iter()
                        .filter_map(|e| self.convert_entry(e))
                        .collect(),
                    page: envelope.page,
                    total_pages: envelope.pages,
                    total_items: envelope.total,
                    title: envelope.title,
                })
            }
            ContainerId::Unfiled => {
                let params = self.page_params(&page_str, &per_page_str);
                let url = self.method_url("flickr.photos.getNotInSet", &params);

                let response: NotInSetResponse = self.call(url).await?;
                let envelope = response.photos;

                Ok(ContainerPage {
                    items: envelope
                        .photo
                        .into_iter()
                        .filter_map(|e| self.convert_entry(e))
                        .collect(),
                    page: envelope.page,
                    total_pages: envelope.pages,
                    total_items: envelope.total,
                    title: UNFILED_CONTAINER_TITLE.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrate_traits::http::HttpResponse;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> TransportResult<HttpResponse>;
            async fn pipe(&self, source_url: String, request: HttpRequest) -> TransportResult<HttpResponse>;
        }
    }

    fn json_response(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec().into(),
        }
    }

    fn connector(http_client: MockHttpClient) -> FlickrConnector {
        FlickrConnector::new(
            Arc::new(http_client),
            "api-key",
            "12345678@N00",
            MediaFilter::All,
        )
    }

    #[tokio::test]
    async fn test_list_containers() {
        let mut http_client = MockHttpClient::new();
        http_client
            .expect_execute()
            .times(1)
            .withf(|req| {
                req.url.contains("method=flickr.photosets.getList")
                    && req.url.contains("api_key=api-key")
                    && req.url.contains("nojsoncallback=1")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"photosets":{"photoset":[
                        {"id":"42","photos":2,"videos":1,"title":{"_content":"Holiday 2014"}}
                    ]},"stat":"ok"}"#,
                ))
            });

        let containers = connector(http_client).list_containers().await.unwrap();

        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].id, ContainerId::Named("42".to_string()));
        assert_eq!(containers[0].title, "Holiday 2014");
        assert_eq!(containers[0].photos, 2);
        assert_eq!(containers[0].videos, 1);
    }

    #[tokio::test]
    async fn test_fetch_page_named_container() {
        let mut http_client = MockHttpClient::new();
        http_client
            .expect_execute()
            .times(1)
            .withf(|req| {
                req.url.contains("method=flickr.photosets.getPhotos")
                    && req.url.contains("photoset_id=42")
                    && req.url.contains("per_page=500")
                    && req.url.contains("page=1")
                    && req.url.contains("extras=url_o%2Cmedia%2Coriginal_format")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"photoset":{
                        "id":"42","title":"Holiday 2014",
                        "photo":[
                            {"id":"p1","title":"Sunset","media":"photo",
                             "url_o":"https://live.staticflickr.com/p1_o.jpg",
                             "originalformat":"jpg"},
                            {"id":"v1","title":"Surf","media":"video",
                             "url_o":"https://live.staticflickr.com/v1_o.mov"}
                        ],
                        "page":1,"pages":1,"total":"2"
                    },"stat":"ok"}"#,
                ))
            });

        let page = connector(http_client)
            .fetch_page(&ContainerId::Named("42".to_string()), 1)
            .await
            .unwrap();

        assert_eq!(page.title, "Holiday 2014");
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 2);

        let photo = &page.items[0];
        assert_eq!(photo.kind, MediaKind::Photo);
        assert_eq!(photo.filename, "flickr_p1.jpg");

        // Video without an original format falls back to mp4
        let video = &page.items[1];
        assert_eq!(video.kind, MediaKind::Video);
        assert_eq!(video.filename, "flickr_v1.mp4");
    }

    #[tokio::test]
    async fn test_fetch_page_unfiled() {
        let mut http_client = MockHttpClient::new();
        http_client
            .expect_execute()
            .times(1)
            .withf(|req| {
                req.url.contains("method=flickr.photos.getNotInSet")
                    && req.url.contains("page=2")
            })
            .returning(|_| {
                Ok(json_response(
                    r#"{"photos":{
                        "photo":[{"id":"p9","title":"","media":"photo",
                                  "url_o":"https://live.staticflickr.com/p9_o.jpg"}],
                        "page":2,"pages":3,"total":"1201"
                    },"stat":"ok"}"#,
                ))
            });

        let page = connector(http_client)
            .fetch_page(&ContainerId::Unfiled, 2)
            .await
            .unwrap();

        assert_eq!(page.title, UNFILED_CONTAINER_TITLE);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_items, 1201);
        assert_eq!(page.items[0].filename, "flickr_p9.jpg");
    }

    #[tokio::test]
    async fn test_entry_without_original_url_is_skipped() {
        let mut http_client = MockHttpClient::new();
        http_client.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                r#"{"photoset":{
                    "id":"42","title":"Holiday 2014",
                    "photo":[{"id":"p1","title":"Locked down","media":"photo"}],
                    "page":1,"pages":1,"total":"1"
                },"stat":"ok"}"#,
            ))
        });

        let page = connector(http_client)
            .fetch_page(&ContainerId::Named("42".to_string()), 1)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn test_protocol_failure_is_an_error() {
        let mut http_client = MockHttpClient::new();
        http_client.expect_execute().times(1).returning(|_| {
            Ok(json_response(
                r#"{"stat":"fail","code":1,"message":"Photoset not found"}"#,
            ))
        });

        let result = connector(http_client)
            .fetch_page(&ContainerId::Named("missing".to_string()), 1)
            .await;

        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Photoset not found"));
    }

    #[tokio::test]
    async fn test_http_failure_is_an_error() {
        let mut http_client = MockHttpClient::new();
        http_client.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 503,
                headers: HashMap::new(),
                body: "unavailable".as_bytes().to_vec().into(),
            })
        });

        let result = connector(http_client).list_containers().await;
        assert!(result.is_err());
    }
}
