//! Instance package models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope key for instance package records.
pub const INSTANCE_PACKAGE_ENVELOPE: &str = "instance_package";

/// Object type OnApp records on transactions that belong to a package.
pub const INSTANCE_PACKAGE_OBJECT_TYPE: &str = "InstancePackage";

/// Representation of an instance package as returned by OnApp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstancePackage {
    /// Package id.
    pub id: i64,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// vCPU count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// Memory (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Disk size (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<u64>,
    /// Monthly bandwidth (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
    /// Billing plans offering the package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_plan_ids: Option<Vec<i64>>,
    /// Buckets offering the package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets_ids: Option<Vec<i64>>,
    /// Linked OpenStack flavor id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openstack_id: Option<i64>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating an instance package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InstancePackageCreateRequest {
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// vCPU count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// Memory (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Disk size (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<u64>,
    /// Monthly bandwidth (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
}

/// Request payload for editing an instance package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InstancePackageEditRequest {
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// vCPU count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// Memory (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Disk size (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<u64>,
    /// Monthly bandwidth (GiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
}
