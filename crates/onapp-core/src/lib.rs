//! # onapp-core
//!
//! Core types and utilities for working with the OnApp control-plane API.
//!
//! This crate provides the shared error type, configuration, envelope handling
//! and the HTTP service client used by the per-resource client crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Serde-loadable configuration for OnApp clients
//! - [`de`] - Deserialization helpers for `null`-heavy responses
//! - [`client`] - HTTP service client, builder and path helpers
//! - [`envelope`] - Wrapping and unwrapping of single-key resource envelopes
//! - [`query`] - Query parameter builder, list and delete options
//! - [`validate`] - Client-side argument checks run before any network call

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod de;
pub mod envelope;
pub mod error;
pub mod query;
pub mod validate;

// Re-export commonly used types
pub use client::{ServiceClient, ServiceClientBuilder};
pub use error::{Error, Result};
pub use query::{DeleteOptions, ListOptions};
