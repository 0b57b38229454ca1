//! # Migration HTTP Client
//!
//! Reqwest-backed implementation of the `HttpClient` abstraction.
//!
//! ## Overview
//!
//! This crate provides:
//! - HTTP execution with automatic retry and exponential backoff
//! - The streaming GET-to-POST pipe used for byte transfer between services
//! - Connection pooling and TLS via rustls

pub mod client;

pub use client::ReqwestHttpClient;
