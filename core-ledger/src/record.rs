//! Per-container progress record.

use migrate_traits::model::{ContainerId, MediaKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Durable migration state for one source container.
///
/// One record maps to one JSON file in the ledger directory. The record only
/// ever grows: completed ids are never removed and the destination id, once
/// set, is never cleared. Expected counts are the exception; the source is
/// live and its counts may drift between runs, so they track the freshest
/// value the source reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerRecord {
    pub container_id: ContainerId,
    /// Container title, resolved lazily from the source
    pub title: Option<String>,
    /// Destination container id; set at most once
    pub destination_id: Option<String>,
    /// Photos the source expects this container to hold
    pub expected_photos: Option<u64>,
    /// Videos the source expects this container to hold
    pub expected_videos: Option<u64>,
    /// Ids of items fully migrated (uploaded and registered)
    pub completed_ids: BTreeSet<String>,
    pub completed_photos: u64,
    pub completed_videos: u64,
}

impl ContainerRecord {
    /// Create an empty record for a container
    pub fn new(container_id: ContainerId) -> Self {
        Self {
            container_id,
            title: None,
            destination_id: None,
            expected_photos: None,
            expected_videos: None,
            completed_ids: BTreeSet::new(),
            completed_photos: 0,
            completed_videos: 0,
        }
    }

    /// Whether `item_id` has already been migrated
    pub fn is_done(&self, item_id: &str) -> bool {
        self.completed_ids.contains(item_id)
    }

    /// Record an item as migrated, bumping the per-kind counter.
    ///
    /// Returns `false` without touching any counter when the item was
    /// already recorded, so replays can never double-count.
    pub fn mark_done(&mut self, item_id: &str, kind: MediaKind) -> bool {
        if !self.completed_ids.insert(item_id.to_string()) {
            return false;
        }
        match kind {
            MediaKind::Photo => self.completed_photos += 1,
            MediaKind::Video => self.completed_videos += 1,
        }
        true
    }

    /// Set the title if not already known
    pub fn set_title(&mut self, title: &str) {
        if self.title.is_none() && !title.is_empty() {
            self.title = Some(title.to_string());
        }
    }

    /// Set the destination container id.
    ///
    /// Returns `false` if one is already recorded; the existing id wins.
    pub fn set_destination_id(&mut self, id: &str) -> bool {
        if self.destination_id.is_some() {
            return false;
        }
        self.destination_id = Some(id.to_string());
        true
    }

    /// Overwrite expected counts from a container listing
    pub fn set_expected(&mut self, photos: u64, videos: u64) {
        self.expected_photos = Some(photos);
        self.expected_videos = Some(videos);
    }

    /// Reconcile expected counts against a page envelope's combined total.
    ///
    /// The envelope reports one number for all media kinds, so drift is
    /// attributed to photos and any known video count is preserved.
    pub fn reconcile_expected_total(&mut self, total_items: u64) {
        if self.expected_total() == Some(total_items) {
            return;
        }
        let videos = self.expected_videos.unwrap_or(0);
        self.expected_photos = Some(total_items.saturating_sub(videos));
        self.expected_videos = Some(videos.min(total_items));
    }

    /// Combined expected count, `None` until the source has reported one
    pub fn expected_total(&self) -> Option<u64> {
        match (self.expected_photos, self.expected_videos) {
            (Some(p), Some(v)) => Some(p + v),
            _ => None,
        }
    }

    pub fn completed_total(&self) -> u64 {
        self.completed_photos + self.completed_videos
    }

    /// Whether every expected item has been migrated.
    ///
    /// Always `false` while expected counts are unknown, so a container is
    /// never skipped before the source has been asked about it.
    pub fn is_complete(&self) -> bool {
        match self.expected_total() {
            Some(expected) => self.completed_total() >= expected,
            None => false,
        }
    }
}
