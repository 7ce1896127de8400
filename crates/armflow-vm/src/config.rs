//! VM deployment configuration
//!
//! [`VmConfig`] is the aggregate the option accumulator fills in and the
//! assembler reads. Every dependent resource is addressed through a
//! [`ResourceRef`], resolved to a concrete name only at build time.

use armflow_core::{
    derived_name, sanitize_storage_name, AllocationMethod, DataDisk, DiskType, ImageDefinition,
    OsDisk, PrivateIpAllocation, Priority, ResourceRef, Result, VmSize,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default VM size when none is chosen
pub const DEFAULT_SIZE: &str = VmSize::STANDARD_A2_V2;

/// Default OS disk size in GB
pub const DEFAULT_OS_DISK_SIZE_GB: u32 = 30;

/// Default data disk materialized when the pending list is left untouched
pub const DEFAULT_DATA_DISK_SIZE_GB: u32 = 1024;

/// Default virtual-network address space
pub const DEFAULT_ADDRESS_SPACE: &str = "10.0.0.0/16";

/// Default subnet prefix inside the address space
pub const DEFAULT_SUBNET_PREFIX: &str = "10.0.0.0/24";

/// An SSH public key provisioned for the admin user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    /// Destination path on the VM (e.g. `/home/admin/.ssh/authorized_keys`)
    pub path: String,

    /// Public key material
    pub public_key: String,
}

/// Boot diagnostics: platform-managed, or backed by a storage account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootDiagnostics {
    AzureManaged,
    Storage(ResourceRef),
}

/// A user-added IP configuration beyond the VM's implicit one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpConfig {
    /// Target subnet; defaults to the VM's own subnet when unset
    pub subnet_name: Option<String>,

    /// Public IP bound to this configuration, if any
    pub public_ip: Option<ResourceRef>,

    /// Load-balancer backend pools joined by this configuration
    pub backend_pools: Vec<ResourceRef>,

    pub private_ip_allocation: Option<PrivateIpAllocation>,
}

impl IpConfig {
    pub fn with_subnet(subnet_name: impl Into<String>) -> Self {
        Self {
            subnet_name: Some(subnet_name.into()),
            ..Default::default()
        }
    }
}

/// Managed identity assigned to the VM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedIdentity {
    pub system_assigned: bool,
    pub user_assigned: Vec<String>,
}

/// Complete configuration of a VM deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmConfig {
    /// VM identity name; all derived names hang off it
    pub name: String,

    pub availability_zone: Option<String>,

    pub boot_diagnostics: Option<BootDiagnostics>,

    pub priority: Option<Priority>,

    pub admin_username: Option<String>,

    /// Deployment-parameter name carrying the admin password
    pub password_parameter: Option<String>,

    pub size: VmSize,

    pub os_disk: OsDisk,

    /// Pending data disks. `Some([])` (the default) materializes one
    /// conventional disk at build time; `None` means explicitly no disks.
    pub data_disks: Option<Vec<DataDisk>>,

    /// Inline bootstrap script
    pub custom_script: Option<String>,

    /// Auxiliary file URIs for the bootstrap script
    pub custom_script_files: Vec<String>,

    /// DNS label for the public IP
    pub domain_name_label: Option<String>,

    /// Cloud-init style custom data
    pub custom_data: Option<String>,

    pub disable_password_authentication: Option<bool>,

    pub ssh_keys: Vec<SshKey>,

    /// Azure AD SSH login extension
    pub aad_ssh_login: bool,

    pub vnet: ResourceRef,

    pub address_prefix: String,

    pub subnet: ResourceRef,

    pub subnet_prefix: String,

    /// `None` disables the public IP entirely
    pub public_ip: Option<ResourceRef>,

    pub public_ip_allocation: Option<AllocationMethod>,

    pub accelerated_networking: Option<bool>,

    pub ip_forwarding: Option<bool>,

    /// IP configurations beyond the VM's implicit one
    pub ip_configs: Vec<IpConfig>,

    pub private_ip_allocation: Option<PrivateIpAllocation>,

    /// Backend pools joined by the implicit IP configuration
    pub backend_pools: Vec<ResourceRef>,

    pub identity: ManagedIdentity,

    pub network_security_group: Option<ResourceRef>,

    pub tags: BTreeMap<String, String>,
}

impl VmConfig {
    /// Default configuration for a named VM: default size and image, empty
    /// tag map, pending data disks, automatic public IP.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            availability_zone: None,
            boot_diagnostics: None,
            priority: None,
            admin_username: None,
            password_parameter: None,
            size: VmSize::new(DEFAULT_SIZE),
            os_disk: OsDisk::FromImage {
                image: ImageDefinition::ubuntu_2204_lts(),
                size_gb: DEFAULT_OS_DISK_SIZE_GB,
                disk_type: DiskType::StandardSsdLrs,
            },
            data_disks: Some(Vec::new()),
            custom_script: None,
            custom_script_files: Vec::new(),
            domain_name_label: None,
            custom_data: None,
            disable_password_authentication: None,
            ssh_keys: Vec::new(),
            aad_ssh_login: false,
            vnet: ResourceRef::Derived,
            address_prefix: DEFAULT_ADDRESS_SPACE.to_string(),
            subnet: ResourceRef::Derived,
            subnet_prefix: DEFAULT_SUBNET_PREFIX.to_string(),
            public_ip: Some(ResourceRef::Derived),
            public_ip_allocation: None,
            accelerated_networking: None,
            ip_forwarding: None,
            ip_configs: Vec::new(),
            private_ip_allocation: None,
            backend_pools: Vec::new(),
            identity: ManagedIdentity::default(),
            network_security_group: None,
            tags: BTreeMap::new(),
        }
    }

    /// Canonical name of the VM's own network interface
    pub fn nic_name(&self) -> String {
        derived_name(&self.name, "nic")
    }

    /// Resolved virtual-network name
    pub fn vnet_name(&self) -> String {
        self.vnet.resolve(&derived_name(&self.name, "vnet"))
    }

    /// Resolved name of the VM's own subnet
    pub fn subnet_name(&self) -> String {
        self.subnet.resolve(&derived_name(&self.name, "subnet"))
    }

    /// Resolved public IP name, when a public IP is configured
    pub fn public_ip_name(&self) -> Option<String> {
        self.public_ip
            .as_ref()
            .map(|r| r.resolve(&derived_name(&self.name, "ip")))
    }

    /// Resolved diagnostics storage-account name, sanitized for storage
    /// naming rules
    pub fn diagnostics_storage_name(&self) -> Result<Option<String>> {
        match &self.boot_diagnostics {
            Some(BootDiagnostics::Storage(r)) => {
                let derived = sanitize_storage_name(&derived_name(&self.name, "storage"))?;
                Ok(Some(r.resolve(&derived)))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = VmConfig::new("web1");
        assert_eq!(cfg.size.as_str(), DEFAULT_SIZE);
        assert_eq!(cfg.data_disks, Some(Vec::new()));
        assert_eq!(cfg.public_ip, Some(ResourceRef::Derived));
        assert!(cfg.tags.is_empty());
    }

    #[test]
    fn test_derived_names() {
        let cfg = VmConfig::new("web1");
        assert_eq!(cfg.nic_name(), "web1-nic");
        assert_eq!(cfg.vnet_name(), "web1-vnet");
        assert_eq!(cfg.subnet_name(), "web1-subnet");
        assert_eq!(cfg.public_ip_name().unwrap(), "web1-ip");
    }

    #[test]
    fn test_linked_vnet_resolves_to_external_id() {
        let mut cfg = VmConfig::new("web1");
        cfg.vnet = ResourceRef::external("shared-vnet");
        assert_eq!(cfg.vnet_name(), "shared-vnet");
    }

    #[test]
    fn test_storage_name_sanitized() {
        let mut cfg = VmConfig::new("Web-1");
        cfg.boot_diagnostics = Some(BootDiagnostics::Storage(ResourceRef::Derived));
        assert_eq!(
            cfg.diagnostics_storage_name().unwrap().unwrap(),
            "web1storage"
        );
    }
}
