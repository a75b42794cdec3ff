//! Transaction client and data models for the OnApp control plane.
//!
//! Transactions are the server-side background jobs that carry out
//! state-changing requests. This crate reads them; it never creates or
//! mutates them.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::TransactionsClient;
pub use models::{Transaction, TransactionFilter, TransactionStatus};

/// Convenient result alias that reuses the shared OnApp error type.
pub type Result<T> = onapp_core::Result<T>;
