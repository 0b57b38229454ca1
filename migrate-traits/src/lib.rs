//! # Migration Traits
//!
//! Shared abstractions for the media migration pipeline.
//!
//! ## Overview
//!
//! This crate defines the seams between the orchestrator and the concrete
//! service connectors:
//! - **HTTP** (`http`): transport abstraction with retry policy and a
//!   streaming pipe primitive
//! - **Source** (`source`): `SourceInventory` for enumerating albums and
//!   paging through their items
//! - **Destination** (`destination`): `TransferClient` for byte uploads and
//!   `RegistrationClient` for committing uploads into containers
//! - **Model** (`model`): container ids, items, pages, and registration
//!   outcomes shared by every crate

pub mod destination;
pub mod error;
pub mod http;
pub mod model;
pub mod source;

pub use destination::{RegistrationClient, TransferClient};
pub use error::{Result, TransportError};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use model::{
    ContainerId, ContainerPage, MediaFilter, MediaKind, RegistrationOutcome, RegistrationRequest,
    SourceContainer, SourceItem, UploadToken, UNFILED_CONTAINER_TITLE,
};
pub use source::SourceInventory;
