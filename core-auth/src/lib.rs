//! # Authentication
//!
//! Token management for the destination service.
//!
//! ## Overview
//!
//! This crate keeps an existing OAuth 2.0 grant alive:
//! - `OAuthTokens`: access/refresh token pair with expiry tracking
//! - `CredentialProvider`: the seam connectors use to obtain a valid token
//! - `RefreshingCredentialProvider`: refreshes near-expiry tokens and
//!   persists them to a JSON token file
//! - `StaticCredentialProvider`: fixed token for tests and pre-issued grants
//!
//! Interactive sign-in flows are out of scope; the initial grant is created
//! elsewhere and handed to this crate as a token file or token set.

pub mod error;
pub mod provider;
pub mod types;

pub use error::{AuthError, Result};
pub use provider::{CredentialProvider, RefreshingCredentialProvider, StaticCredentialProvider};
pub use types::OAuthTokens;
