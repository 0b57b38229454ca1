//! Shared data model for the migration pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default title for the synthetic unfiled container.
///
/// Sources label their unfiled pool with this name and configuration may
/// override it; a title persisted in the progress record wins over the one
/// a page envelope reports.
pub const UNFILED_CONTAINER_TITLE: &str = "Not in a set";

/// Identifies a source container (album).
///
/// `Unfiled` is the synthetic container for items that belong to no album
/// on the source service. It is never returned by a container listing; the
/// orchestrator enumerates it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerId {
    /// A real source album, identified by its service-assigned id
    Named(String),
    /// Items not filed into any album
    Unfiled,
}

impl ContainerId {
    /// File name under which this container's progress record is stored
    pub fn ledger_file_name(&self) -> String {
        match self {
            ContainerId::Named(id) => format!("{}.json", id),
            ContainerId::Unfiled => "unfiled.json".to_string(),
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Named(id) => write!(f, "{}", id),
            ContainerId::Unfiled => write!(f, "unfiled"),
        }
    }
}

/// A container as reported by the source listing, with expected item counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContainer {
    pub id: ContainerId,
    pub title: String,
    /// Number of photos the source reports for this container
    pub photos: u64,
    /// Number of videos the source reports for this container
    pub videos: u64,
}

/// Media kind of a source item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }

    /// File extension used when the source does not report one
    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Photo => "jpg",
            MediaKind::Video => "mp4",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which media kinds a source listing should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    Photos,
    Videos,
    #[default]
    All,
}

impl MediaFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFilter::Photos => "photos",
            MediaFilter::Videos => "videos",
            MediaFilter::All => "all",
        }
    }

    pub fn matches(&self, kind: MediaKind) -> bool {
        match self {
            MediaFilter::Photos => kind == MediaKind::Photo,
            MediaFilter::Videos => kind == MediaKind::Video,
            MediaFilter::All => true,
        }
    }
}

impl fmt::Display for MediaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single migratable item, as resolved from one page of a source listing.
///
/// The download URL points at the original-size bytes; `filename` is the
/// name the destination should store the upload under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    pub id: String,
    pub kind: MediaKind,
    /// Source title, used as the destination description
    pub title: String,
    pub download_url: String,
    pub filename: String,
}

/// One page of a container listing.
#[derive(Debug, Clone)]
pub struct ContainerPage {
    pub items: Vec<SourceItem>,
    /// 1-based page number of this page
    pub page: u32,
    pub total_pages: u32,
    /// Total items in the container as reported by this page's envelope
    pub total_items: u64,
    /// Container title as reported by this page's envelope
    pub title: String,
}

/// Opaque token returned by a byte upload, redeemed during registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadToken(String);

impl UploadToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// One item of a batch registration call.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub description: String,
    pub upload_token: UploadToken,
}

/// Per-item result of a batch registration call.
///
/// A batch response is always a list of independent outcomes; an `ok`
/// outcome carries the destination media id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub ok: bool,
    pub media_id: Option<String>,
    pub error: Option<String>,
}
