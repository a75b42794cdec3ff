//! Asynchronous virtual machine actions client.

use crate::models::{VmAction, VIRTUAL_MACHINE_OBJECT_TYPE};
use crate::Result;
use async_trait::async_trait;
use onapp_core::client::API_FORMAT;
use onapp_core::validate::ensure_id;
use onapp_core::{Error, ServiceClient};
use onapp_transactions::{Transaction, TransactionFilter, TransactionsClient};
use reqwest::Method;
use tracing::{info, warn};
use url::Url;

const VIRTUAL_MACHINES_BASE_PATH: &str = "virtual_machines";

fn action_path(vm_id: i64, action: VmAction) -> String {
    format!(
        "{VIRTUAL_MACHINES_BASE_PATH}/{vm_id}/{}{API_FORMAT}",
        action.path()
    )
}

/// Lifecycle actions on a virtual machine.
///
/// Every method returns the most recent transaction recorded for the VM with
/// the action's label, or `None` when the first page of transactions holds no
/// match. Failures surface as:
///
/// - [`Error::InvalidArgument`] for `vm_id < 1`, before any request;
/// - a transport or API error when the action itself was refused, which is
///   safe to retry;
/// - [`Error::LookupFailed`] when the action was accepted but the transaction
///   lookup failed. Retrying risks applying the action twice.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VirtualMachineActions: Send + Sync {
    /// Perform `action` on the VM and look up its transaction.
    async fn perform(&self, vm_id: i64, action: VmAction) -> Result<Option<Transaction>>;

    /// Shut a VM down gracefully.
    async fn shutdown(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Shutdown).await
    }

    /// Stop a VM forcefully.
    async fn stop(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Stop).await
    }

    /// Start a VM.
    async fn startup(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Startup).await
    }

    /// Unlock a VM.
    async fn unlock(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Unlock).await
    }

    /// Reboot a VM.
    async fn reboot(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Reboot).await
    }

    /// Suspend a VM.
    async fn suspend(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Suspend).await
    }

    /// Resume a suspended VM.
    async fn unsuspend(&self, vm_id: i64) -> Result<Option<Transaction>> {
        self.perform(vm_id, VmAction::Unsuspend).await
    }
}

/// Asynchronous client for VM lifecycle actions.
///
/// The action endpoint answers before the server has a job id, so the
/// transaction returned is only the newest one matching the VM and action
/// label at lookup time. Concurrent actions of the same kind against the same
/// VM can observe each other's transactions.
#[derive(Debug, Clone)]
pub struct VirtualMachineActionsClient {
    inner: ServiceClient,
    transactions: TransactionsClient,
}

impl VirtualMachineActionsClient {
    /// Construct a client directly from the base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::from_service(ServiceClient::new(base_url)?))
    }

    /// Construct a client over an existing transport handle.
    #[must_use]
    pub fn from_service(inner: ServiceClient) -> Self {
        Self {
            transactions: TransactionsClient::from_service(inner.clone()),
            inner,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }
}

#[async_trait]
impl VirtualMachineActions for VirtualMachineActionsClient {
    async fn perform(&self, vm_id: i64, action: VmAction) -> Result<Option<Transaction>> {
        ensure_id("vm_id", vm_id)?;

        let path = action_path(vm_id, action);
        let request = action.request();
        self.inner
            .send_status(Method::POST, &path, Some(&request), &[])
            .await?;

        info!(vm_id, %action, "virtual machine action accepted");

        let filter =
            TransactionFilter::for_object(VIRTUAL_MACHINE_OBJECT_TYPE, vm_id, action.transaction_label());
        self.transactions
            .latest_matching(&filter, self.inner.transaction_page_size())
            .await
            .map_err(|err| {
                warn!(vm_id, %action, error = %err, "transaction lookup failed");
                Error::LookupFailed(Box::new(err))
            })
    }
}
