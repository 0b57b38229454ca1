//! # Progress Ledger
//!
//! Durable, crash-safe migration progress tracking.
//!
//! ## Overview
//!
//! Every source container gets one progress record holding the set of
//! migrated item ids, per-kind counters, and the destination container id.
//! Records are persisted after every state change, so a crash at any point
//! resumes without re-uploading a single item.
//!
//! - **Record** (`record`): the `ContainerRecord` data model and its
//!   monotonic update rules
//! - **Store** (`store`): the `ProgressStore` seam and the file-backed
//!   implementation with atomic writes

pub mod error;
pub mod record;
pub mod store;

pub use error::{LedgerError, Result};
pub use record::ContainerRecord;
pub use store::{FileProgressStore, ProgressStore};
