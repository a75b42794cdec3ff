//! User account client and data models for the OnApp control plane.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::UsersClient;
pub use models::{
    AdditionalField, Infoboxes, IpAddress, Permission, Role, User, UserCreateRequest,
    UserEditRequest,
};

/// Convenient result alias that reuses the shared OnApp error type.
pub type Result<T> = onapp_core::Result<T>;
