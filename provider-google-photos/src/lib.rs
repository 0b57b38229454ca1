//! # Google Photos Provider
//!
//! Implements `TransferClient` and `RegistrationClient` for the Google
//! Photos Library API.
//!
//! ## Overview
//!
//! This module provides:
//! - Streaming byte uploads to the `/uploads` endpoint (raw protocol)
//! - Album creation
//! - Batch registration of upload tokens with per-item outcome parsing
//! - Automatic access token refresh before every API call

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GooglePhotosConnector;
pub use error::{GooglePhotosError, Result};
