//! Instance package client and data models for the OnApp control plane.
//!
//! Instance packages are fixed CPU / memory / disk / bandwidth bundles that
//! virtual machines can be built from.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::InstancePackagesClient;
pub use models::{InstancePackage, InstancePackageCreateRequest, InstancePackageEditRequest};

/// Convenient result alias that reuses the shared OnApp error type.
pub type Result<T> = onapp_core::Result<T>;
