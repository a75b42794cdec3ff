//! Compute resource models.

use chrono::{DateTime, Utc};
use onapp_core::de::null_as_default;
use serde::{Deserialize, Serialize};

/// Envelope key for compute resource records.
pub const HYPERVISOR_ENVELOPE: &str = "hypervisor";

/// Envelope key for CloudBoot asset records.
pub const ASSET_ENVELOPE: &str = "asset";

/// A compute resource (hypervisor) as returned by OnApp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComputeResource {
    /// Compute resource id.
    pub id: i64,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Management IP address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// MAC address of the boot interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Virtualization type, e.g. `kvm` or `xen`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_type: Option<String>,
    /// Owning compute zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_group_id: Option<i64>,
    /// Server role, e.g. `virtual` or `baremetal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
    /// Guest OS segregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segregation_os_type: Option<String>,
    /// CloudBoot image OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_boot_os: Option<String>,
    /// Accepting new VMs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Reachable by the control plane.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
    /// Backup server role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    /// Statistics collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_stats: Option<bool>,
    /// Failover disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_failover: Option<bool>,
    /// Physical cores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u32>,
    /// Logical CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    /// Total memory (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_memory: Option<u64>,
    /// Free memory (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_memory: Option<u64>,
    /// Custom boot configuration script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A CloudBoot asset: a PXE-booted server not yet registered as a compute
/// resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Asset {
    /// MAC address of the boot interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Address leased to the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// Disk offered to integrated storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StorageDisk {
    /// SCSI id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scsi: Option<String>,
    /// Whether the disk is used.
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
}

/// Network interface offered to integrated storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StorageNic {
    /// MAC address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Interface role.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<i32>,
}

/// PCI device passed through to integrated storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StorageCustomPci {
    /// PCI address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pci: Option<String>,
    /// Whether the device is passed through.
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: bool,
}

/// Integrated storage layout for a CloudBoot compute resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Storage {
    /// Local disks.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<StorageDisk>,
    /// Storage network interfaces.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub nics: Vec<StorageNic>,
    /// Passed-through PCI devices.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub custom_pcis: Vec<StorageCustomPci>,
}

/// Request payload for creating a CloudBoot compute resource.
///
/// `mac` selects the asset to register and is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ComputeResourceCreateRequest {
    /// MAC address of the asset being registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// PXE address pool entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pxe_ip_address_id: Option<i64>,
    /// Virtualization type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_type: Option<String>,
    /// Compute zone to join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_group_id: Option<i64>,
    /// Guest OS segregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segregation_os_type: Option<String>,
    /// Server role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
    /// Register as a backup server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    /// Backup network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_ip_address: Option<String>,
    /// Accept new VMs once online.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Statistics collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_stats: Option<bool>,
    /// Failover disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_failover: Option<bool>,
    /// Wipe local disks on first boot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_disks: Option<bool>,
    /// Pass local disks through to integrated storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passthrough_disks: Option<bool>,
    /// Integrated storage layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
    /// Memory reserved per storage controller (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_controller_memory_size: Option<u64>,
    /// Static integrated storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_integrated_storage: Option<bool>,
    /// Disks handled by each storage controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disks_per_storage_controller: Option<u32>,
    /// CloudBoot image OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_boot_os: Option<String>,
    /// Custom boot configuration script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<String>,
    /// Default gateway for the management network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_gateway: Option<String>,
    /// Management VLAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<String>,
}

/// Request payload for editing a CloudBoot compute resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ComputeResourceEditRequest {
    /// Statistics collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collect_stats: Option<bool>,
    /// Failover disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_failover: Option<bool>,
    /// Pass local disks through to integrated storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passthrough_disks: Option<bool>,
    /// Integrated storage layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Storage>,
    /// Memory reserved per storage controller (MiB).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_controller_memory_size: Option<u64>,
    /// Static integrated storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_integrated_storage: Option<bool>,
    /// Disks handled by each storage controller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disks_per_storage_controller: Option<u32>,
    /// Integrated storage disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrated_storage_disabled: Option<bool>,
    /// Custom boot configuration script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<String>,
    /// Append the compute zone's custom config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_hypervisor_group_custom_config: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn storage_omits_empty_lists() {
        let storage = Storage {
            disks: vec![StorageDisk {
                scsi: Some("0:0:0:0".into()),
                selected: true,
            }],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&storage).unwrap(),
            json!({"disks": [{"scsi": "0:0:0:0", "selected": true}]})
        );
    }

    #[test]
    fn null_storage_fields_decode_as_unset() {
        let storage: Storage = serde_json::from_value(json!({
            "disks": [{"scsi": "0:0:0:1", "selected": null}],
            "nics": null,
            "custom_pcis": [{"pci": "0000:03:00.0", "selected": null}]
        }))
        .unwrap();
        assert!(!storage.disks[0].selected);
        assert!(storage.nics.is_empty());
        assert!(!storage.custom_pcis[0].selected);

        let storage: Storage =
            serde_json::from_value(json!({"disks": null, "custom_pcis": null})).unwrap();
        assert_eq!(storage, Storage::default());
    }

    #[test]
    fn nic_type_is_renamed() {
        let nic: StorageNic = serde_json::from_value(json!({"mac": "aa:bb", "type": 2})).unwrap();
        assert_eq!(nic.kind, Some(2));
    }
}
