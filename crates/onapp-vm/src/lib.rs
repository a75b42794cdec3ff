//! Virtual machine lifecycle actions for the OnApp control plane.
//!
//! Each action is posted to the VM and then paired with the most recent
//! matching background transaction. See [`VirtualMachineActionsClient`] for
//! the guarantees (and the lack of them) this pairing offers.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{VirtualMachineActions, VirtualMachineActionsClient};
pub use models::{ActionRequest, VmAction};
pub use onapp_transactions::Transaction;

/// Convenient result alias that reuses the shared OnApp error type.
pub type Result<T> = onapp_core::Result<T>;
