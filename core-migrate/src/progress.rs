//! Run-level progress reporting.

use serde::Serialize;
use std::fmt;

/// Where a container currently sits in its migration lifecycle.
///
/// Used as a structured log field so a run's output can be grouped by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPhase {
    Pending,
    Listing,
    CreatingDestination,
    Transferring,
    Registering,
    Done,
}

impl ContainerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Listing => "listing",
            Self::CreatingDestination => "creating_destination",
            Self::Transferring => "transferring",
            Self::Registering => "registering",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ContainerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of a single migration run.
///
/// Counts are disjoint: a container lands in exactly one of `completed`,
/// `skipped` or `failed` buckets, and an item in exactly one of `migrated`,
/// `skipped` or `failed`. Skipped means already done on a previous run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub containers_visited: u64,
    pub containers_completed: u64,
    pub containers_skipped: u64,
    pub containers_failed: u64,
    pub items_migrated: u64,
    pub items_failed: u64,
    pub items_skipped: u64,
}

impl MigrationReport {
    /// True when nothing failed during the run
    pub fn is_clean(&self) -> bool {
        self.containers_failed == 0 && self.items_failed == 0
    }
}
