//! CloudBoot compute resource client and data models for the OnApp control
//! plane.
//!
//! Compute resources (hypervisors) are created against a discovered CloudBoot
//! asset, addressed by the asset's MAC address; use
//! [`ComputeResourcesClient::available_assets`] to find candidates.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::ComputeResourcesClient;
pub use models::{
    Asset, ComputeResource, ComputeResourceCreateRequest, ComputeResourceEditRequest, Storage,
    StorageCustomPci, StorageDisk, StorageNic,
};

/// Convenient result alias that reuses the shared OnApp error type.
pub type Result<T> = onapp_core::Result<T>;
