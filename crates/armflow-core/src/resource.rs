//! Resource descriptions emitted by a build pass
//!
//! A build produces an ordered `Vec<Resource>` that the deployment engine
//! turns into infrastructure. Dependencies between resources are expressed
//! through name references in `depends_on`, not through list position.

use crate::disks::{DataDisk, OsDisk};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// When a spot instance is evicted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    Deallocate,
    Delete,
}

/// Scheduling priority of a virtual machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Regular,
    Spot {
        eviction_policy: EvictionPolicy,
        /// Maximum price in USD per hour; -1.0 pays up to the regular rate
        max_price: f64,
    },
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Regular => write!(f, "regular"),
            Priority::Spot { .. } => write!(f, "spot"),
        }
    }
}

/// Allocation method for a public IP address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    Dynamic,
    Static,
}

impl Default for AllocationMethod {
    fn default() -> Self {
        AllocationMethod::Dynamic
    }
}

/// Private IP assignment for an IP configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivateIpAllocation {
    Dynamic,
    Static(String),
}

impl Default for PrivateIpAllocation {
    fn default() -> Self {
        PrivateIpAllocation::Dynamic
    }
}

/// One IP configuration attached to a network interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpConfiguration {
    pub name: String,

    /// Set on the VM's implicit configuration when any extra configurations
    /// were added; a lone configuration carries no flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    pub subnet_name: String,

    /// Name of the public IP bound to this configuration, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_name: Option<String>,

    pub private_ip_allocation: PrivateIpAllocation,

    /// Load-balancer backend pool names this configuration joins
    pub backend_pools: Vec<String>,
}

/// Network interface description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,

    /// Only present when the deployment has more than one interface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,

    pub virtual_network: String,

    pub ip_configurations: Vec<IpConfiguration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerated_networking: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_forwarding: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<String>,

    pub depends_on: Vec<String>,

    pub tags: BTreeMap<String, String>,
}

/// A subnet inside a managed virtual network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub name: String,
    pub prefix: String,
}

/// Virtual network description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualNetwork {
    pub name: String,
    pub address_prefixes: Vec<String>,
    pub subnets: Vec<Subnet>,
    pub tags: BTreeMap<String, String>,
}

/// Public IP address description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIpAddress {
    pub name: String,

    pub allocation_method: AllocationMethod,

    /// DNS label prefix for the address, if requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name_label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    pub tags: BTreeMap<String, String>,
}

/// Storage account description (boot diagnostics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageAccount {
    pub name: String,
    pub sku: String,
    pub tags: BTreeMap<String, String>,
}

/// VM extension description (custom script, AAD SSH login)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,

    /// Name of the virtual machine the extension attaches to
    pub virtual_machine: String,

    pub publisher: String,

    pub extension_type: String,

    pub type_handler_version: String,

    pub auto_upgrade_minor_version: bool,

    /// Extension-specific settings, shaped per extension type
    pub settings: serde_json::Value,

    pub depends_on: Vec<String>,

    pub tags: BTreeMap<String, String>,
}

/// Virtual machine description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub name: String,

    pub size: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    pub admin_username: String,

    /// Deployment-parameter name carrying the admin password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_parameter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_password_authentication: Option<bool>,

    /// (path, public key) pairs provisioned for the admin user
    pub ssh_keys: Vec<(String, String)>,

    pub os_disk: OsDisk,

    pub data_disks: Vec<DataDisk>,

    /// Interface names in fan-out order; the first is the primary
    pub network_interfaces: Vec<String>,

    pub system_identity: bool,

    pub user_identities: Vec<String>,

    pub boot_diagnostics: bool,

    /// Storage account backing boot diagnostics; absent for platform-managed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics_storage: Option<String>,

    pub depends_on: Vec<String>,

    pub tags: BTreeMap<String, String>,
}

/// The heterogeneous resource descriptions a build emits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource_type", rename_all = "kebab-case")]
pub enum Resource {
    VirtualMachine(VirtualMachine),
    NetworkInterface(NetworkInterface),
    VirtualNetwork(VirtualNetwork),
    PublicIpAddress(PublicIpAddress),
    StorageAccount(StorageAccount),
    Extension(Extension),
}

impl Resource {
    /// Stable type tag, usable as a lookup key by the deployment engine
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::VirtualMachine(_) => "virtual-machine",
            Resource::NetworkInterface(_) => "network-interface",
            Resource::VirtualNetwork(_) => "virtual-network",
            Resource::PublicIpAddress(_) => "public-ip-address",
            Resource::StorageAccount(_) => "storage-account",
            Resource::Extension(_) => "extension",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Resource::VirtualMachine(r) => &r.name,
            Resource::NetworkInterface(r) => &r.name,
            Resource::VirtualNetwork(r) => &r.name,
            Resource::PublicIpAddress(r) => &r.name,
            Resource::StorageAccount(r) => &r.name,
            Resource::Extension(r) => &r.name,
        }
    }

    /// Full resource key (type:name)
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource_type(), self.name())
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key() {
        let vnet = Resource::VirtualNetwork(VirtualNetwork {
            name: "web1-vnet".to_string(),
            address_prefixes: vec!["10.0.0.0/16".to_string()],
            subnets: vec![Subnet {
                name: "web1-subnet".to_string(),
                prefix: "10.0.0.0/24".to_string(),
            }],
            tags: BTreeMap::new(),
        });
        assert_eq!(vnet.key(), "virtual-network:web1-vnet");
    }

    #[test]
    fn test_single_nic_serializes_without_primary() {
        let nic = NetworkInterface {
            name: "web1-nic".to_string(),
            primary: None,
            virtual_network: "web1-vnet".to_string(),
            ip_configurations: Vec::new(),
            accelerated_networking: None,
            ip_forwarding: None,
            network_security_group: None,
            depends_on: Vec::new(),
            tags: BTreeMap::new(),
        };
        let json = serde_json::to_value(&nic).unwrap();
        assert!(json.get("primary").is_none());
    }
}
