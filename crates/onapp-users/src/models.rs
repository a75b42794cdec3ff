//! User account models.
//!
//! Nested role and permission lists use the same one-key envelopes as
//! top-level collections; [`User::roles`] and [`Role::permissions`] unwrap
//! them for convenience.

use chrono::{DateTime, Utc};
use onapp_core::de::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Envelope key for user records.
pub const USER_ENVELOPE: &str = "user";

/// Dashboard hint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Infoboxes {
    /// Whether infoboxes are shown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_infoboxes: bool,
    /// Identifiers of dismissed infoboxes.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub hidden_infoboxes: Vec<String>,
}

/// A single permission granted by a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// Permission id.
    pub id: i64,
    /// Permission identifier, e.g. `virtual_machines.create`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `{"permission": {...}}` wrapper used inside [`Role`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionEnvelope {
    /// Wrapped permission.
    pub permission: Permission,
}

/// A role assigned to a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Role id.
    pub id: i64,
    /// Role identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Built-in role.
    #[serde(default, deserialize_with = "null_as_default")]
    pub system: bool,
    /// Number of users holding the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_count: Option<u64>,
    /// Enveloped permissions.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "permissions",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub permission_envelopes: Vec<PermissionEnvelope>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Permissions granted by the role.
    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permission_envelopes.iter().map(|e| &e.permission)
    }
}

/// `{"role": {...}}` wrapper used inside [`User`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleEnvelope {
    /// Wrapped role.
    pub role: Role,
}

/// Custom field value attached to a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AdditionalField {
    /// Field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Field value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// IP address allocated to a user's resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpAddress {
    /// Address id.
    pub id: i64,
    /// The address itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Netmask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    /// Gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    /// Broadcast address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<String>,
    /// Network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_address: Option<String>,
    /// Pool the address belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_range_id: Option<i64>,
    /// Not assigned to any interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
}

/// A user account as returned by OnApp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// User id.
    pub id: i64,
    /// Login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Opaque identifier used in resource names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Account status, e.g. `active` or `suspended`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// UI locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Time zone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// UI theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_theme: Option<String>,
    /// Avatar; a URL string or an object depending on server version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<serde_json::Value>,
    /// Use Gravatar instead of an uploaded avatar.
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_gravatar: bool,
    /// A YubiKey is registered for two-factor login.
    #[serde(default, deserialize_with = "null_as_default")]
    pub registered_yubikey: bool,
    /// Account supplied by a federation partner.
    #[serde(default, deserialize_with = "null_as_default")]
    pub supplied: bool,
    /// Dashboard hints.
    #[serde(default, deserialize_with = "null_as_default")]
    pub infoboxes: Infoboxes,
    /// Billing plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_plan_id: Option<i64>,
    /// Bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<i64>,
    /// User group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_group_id: Option<i64>,
    /// Legacy group id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Firewall.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_id: Option<i64>,
    /// Image template group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_template_group_id: Option<i64>,
    /// CDN account status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_account_status: Option<String>,
    /// CDN status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_status: Option<String>,
    /// vCPUs in use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_cpus: Option<u64>,
    /// Memory in use (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_memory: Option<u64>,
    /// CPU shares in use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_cpu_shares: Option<u64>,
    /// Disk in use (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_disk_size: Option<u64>,
    /// Memory still available (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_available: Option<i64>,
    /// Disk still available (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_space_available: Option<i64>,
    /// Current monthly price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_price: Option<f64>,
    /// Total paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<f64>,
    /// Amount due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outstanding_amount: Option<f64>,
    /// Total billed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Discount from free allowances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_due_to_free: Option<f64>,
    /// Total billed after discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount_with_discount: Option<f64>,
    /// Enveloped roles.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "roles",
        skip_serializing_if = "Vec::is_empty",
    )]
    pub role_envelopes: Vec<RoleEnvelope>,
    /// Custom field values.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<AdditionalField>,
    /// Addresses allocated to the user's resources.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub used_ip_addresses: Vec<IpAddress>,
    /// Activation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    /// Last password change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime<Utc>>,
    /// Scheduled suspension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspend_at: Option<DateTime<Utc>>,
    /// Soft deletion time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Roles held by the user.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.role_envelopes.iter().map(|e| &e.role)
    }

    /// Whether any of the user's roles grants `identifier`.
    #[must_use]
    pub fn has_permission(&self, identifier: &str) -> bool {
        self.roles()
            .flat_map(Role::permissions)
            .any(|p| p.identifier.as_deref() == Some(identifier))
    }
}

/// Request payload for creating a user.
#[derive(Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserCreateRequest {
    /// Login name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Initial password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// User group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_group_id: Option<i64>,
    /// Billing plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_plan_id: Option<i64>,
    /// Roles to assign.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<i64>,
    /// Custom field values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<AdditionalField>,
}

/// Request payload for editing a user.
#[derive(Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserEditRequest {
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// UI locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Time zone name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// User group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_group_id: Option<i64>,
    /// Billing plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_plan_id: Option<i64>,
    /// Replacement role set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<i64>,
    /// Custom field values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_fields: Vec<AdditionalField>,
}

fn redacted(password: Option<&String>) -> Option<&'static str> {
    password.map(|_| "[REDACTED]")
}

impl fmt::Debug for UserCreateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreateRequest")
            .field("login", &self.login)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &redacted(self.password.as_ref()))
            .field("user_group_id", &self.user_group_id)
            .field("billing_plan_id", &self.billing_plan_id)
            .field("role_ids", &self.role_ids)
            .field("additional_fields", &self.additional_fields)
            .finish()
    }
}

impl fmt::Debug for UserEditRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEditRequest")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &redacted(self.password.as_ref()))
            .field("locale", &self.locale)
            .field("time_zone", &self.time_zone)
            .field("user_group_id", &self.user_group_id)
            .field("billing_plan_id", &self.billing_plan_id)
            .field("role_ids", &self.role_ids)
            .field("additional_fields", &self.additional_fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let request = UserCreateRequest {
            login: Some("jdoe".into()),
            password: Some("hunter2hunter2".into()),
            ..Default::default()
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("jdoe"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));

        let edit = UserEditRequest {
            password: Some("s3cret-pass".into()),
            ..Default::default()
        };
        assert!(!format!("{edit:?}").contains("s3cret"));
    }

    #[test]
    fn empty_request_serializes_to_empty_object() {
        let value = serde_json::to_value(UserEditRequest::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }
}
