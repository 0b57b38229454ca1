//! # Flickr Provider
//!
//! Implements `SourceInventory` for the Flickr REST API.
//!
//! ## Overview
//!
//! This module provides:
//! - Photoset listing with expected photo and video counts
//! - Paged item listing for photosets and for the unfiled pseudo-container
//! - Original-size download URL and filename resolution per item
//! - Media kind tagging (photo/video) at the API boundary

pub mod connector;
pub mod error;
pub mod types;

pub use connector::FlickrConnector;
pub use error::{FlickrError, Result};
