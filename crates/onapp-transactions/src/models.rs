//! Transaction models.

use chrono::{DateTime, Utc};
use onapp_core::query::QueryParams;
use serde::{Deserialize, Serialize};

/// Envelope key for transaction records.
pub const TRANSACTION_ENVELOPE: &str = "transaction";

/// Lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Queued, not started.
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Complete,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// True once the transaction will not change state again.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Complete | Self::Failed | Self::Cancelled)
    }
}

/// Representation of a transaction as returned by OnApp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Transaction id.
    pub id: i64,
    /// Action label, e.g. `reboot_virtual_server`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Id of the object the transaction acts upon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_object_id: Option<i64>,
    /// Type of the object the transaction acts upon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_object_type: Option<String>,
    /// Id of the parent object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    /// Type of the parent object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    /// Current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Chain id linking dependent transactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<i64>,
    /// Transaction this one waits for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_transaction_id: Option<i64>,
    /// Server-side identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Operating system process id of the worker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    /// Queue priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    /// Whether the transaction can still be cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_cancel: Option<bool>,
    /// Whether the transaction was scheduled for later.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<bool>,
    /// Id of the user that triggered it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Free-form parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Worker log output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_output: Option<String>,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Returns the status, treating a missing one as unknown.
    #[must_use]
    pub fn status(&self) -> TransactionStatus {
        self.status.unwrap_or(TransactionStatus::Unknown)
    }
}

/// Selects the transactions belonging to one object and action.
///
/// Unset fields match anything. The same filter is sent as query parameters
/// and re-applied to the returned page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Action label.
    pub action: Option<String>,
    /// Associated object id.
    pub associated_object_id: Option<i64>,
    /// Associated object type, e.g. `VirtualMachine`.
    pub associated_object_type: Option<String>,
    /// Parent object id.
    pub parent_id: Option<i64>,
    /// Parent object type, e.g. `InstancePackage`.
    pub parent_type: Option<String>,
}

impl TransactionFilter {
    /// Filter on the object a transaction acts upon and its action label.
    #[must_use]
    pub fn for_object(
        object_type: impl Into<String>,
        object_id: i64,
        action: impl Into<String>,
    ) -> Self {
        Self {
            action: Some(action.into()),
            associated_object_id: Some(object_id),
            associated_object_type: Some(object_type.into()),
            ..Self::default()
        }
    }

    /// Filter on a transaction's parent object.
    #[must_use]
    pub fn for_parent(parent_type: impl Into<String>, parent_id: i64) -> Self {
        Self {
            parent_id: Some(parent_id),
            parent_type: Some(parent_type.into()),
            ..Self::default()
        }
    }

    /// True if every set field equals the transaction's value.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        fn check<T: PartialEq>(expected: Option<&T>, actual: Option<&T>) -> bool {
            expected.map_or(true, |expected| actual == Some(expected))
        }

        check(self.action.as_ref(), transaction.action.as_ref())
            && check(
                self.associated_object_id.as_ref(),
                transaction.associated_object_id.as_ref(),
            )
            && check(
                self.associated_object_type.as_ref(),
                transaction.associated_object_type.as_ref(),
            )
            && check(self.parent_id.as_ref(), transaction.parent_id.as_ref())
            && check(self.parent_type.as_ref(), transaction.parent_type.as_ref())
    }

    /// Convert the filter into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("action", self.action.as_deref());
        params.push_opt("associated_object_id", self.associated_object_id);
        params.push_opt("associated_object_type", self.associated_object_type.as_deref());
        params.push_opt("parent_id", self.parent_id);
        params.push_opt("parent_type", self.parent_type.as_deref());
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transaction(value: serde_json::Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn status_falls_back_to_unknown() {
        let t = transaction(json!({"id": 1, "status": "delayed"}));
        assert_eq!(t.status(), TransactionStatus::Unknown);
        let t = transaction(json!({"id": 1}));
        assert_eq!(t.status(), TransactionStatus::Unknown);
        let t = transaction(json!({"id": 1, "status": "complete"}));
        assert!(t.status().is_finished());
    }

    #[test]
    fn filter_matches_only_set_fields() {
        let t = transaction(json!({
            "id": 5,
            "action": "reboot_virtual_server",
            "associated_object_id": 42,
            "associated_object_type": "VirtualMachine"
        }));

        assert!(TransactionFilter::default().matches(&t));
        assert!(TransactionFilter::for_object("VirtualMachine", 42, "reboot_virtual_server").matches(&t));
        assert!(!TransactionFilter::for_object("VirtualMachine", 43, "reboot_virtual_server").matches(&t));
        assert!(!TransactionFilter::for_object("VirtualMachine", 42, "stop_virtual_server").matches(&t));
        assert!(!TransactionFilter::for_parent("InstancePackage", 42).matches(&t));
    }

    #[test]
    fn filter_pairs() {
        let pairs = TransactionFilter::for_object("VirtualMachine", 7, "startup_virtual_server")
            .to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("action", "startup_virtual_server".to_string()),
                ("associated_object_id", "7".to_string()),
                ("associated_object_type", "VirtualMachine".to_string()),
            ]
        );
    }
}
