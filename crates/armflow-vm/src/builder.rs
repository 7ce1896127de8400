//! Fluent option accumulator for VM deployments
//!
//! Each setter takes the builder by value and returns it with exactly the
//! targeted field changed. Setters that can conflict with earlier options
//! (`priority`, `spot_instance`) return `Result<Self>` instead of silently
//! overwriting.

use crate::config::{BootDiagnostics, IpConfig, SshKey, VmConfig};
use armflow_core::{
    AllocationMethod, BuildError, DataDisk, DiskType, EvictionPolicy, ImageDefinition, Os, OsDisk,
    PrivateIpAllocation, Priority, ResourceRef, Result, VmSize,
};

/// Builder for a VM deployment
#[derive(Debug, Clone)]
pub struct VmBuilder {
    pub(crate) config: VmConfig,
}

impl VmBuilder {
    /// Start from the default configuration for a named VM
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: VmConfig::new(name),
        }
    }

    /// The accumulated configuration, without building
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.config.availability_zone = Some(zone.into());
        self
    }

    /// Enable platform-managed boot diagnostics
    pub fn diagnostics_support(mut self) -> Self {
        self.config.boot_diagnostics = Some(BootDiagnostics::AzureManaged);
        self
    }

    /// Enable boot diagnostics backed by a storage account created with this
    /// deployment (derived name)
    pub fn diagnostics_support_managed(mut self) -> Self {
        self.config.boot_diagnostics = Some(BootDiagnostics::Storage(ResourceRef::Derived));
        self
    }

    /// Enable boot diagnostics backed by an existing storage account
    pub fn diagnostics_support_external(mut self, storage_account: impl Into<String>) -> Self {
        self.config.boot_diagnostics = Some(BootDiagnostics::Storage(ResourceRef::external(
            storage_account,
        )));
        self
    }

    /// Set the scheduling priority. Fails if a priority was already chosen,
    /// directly or through [`VmBuilder::spot_instance`].
    pub fn priority(mut self, priority: Priority) -> Result<Self> {
        if let Some(existing) = &self.config.priority {
            return Err(BuildError::already_set("priority", existing.to_string()));
        }
        self.config.priority = Some(priority);
        Ok(self)
    }

    /// Shorthand for a spot instance with the given eviction policy and
    /// maximum hourly price. Fails if a priority was already chosen.
    pub fn spot_instance(self, eviction_policy: EvictionPolicy, max_price: f64) -> Result<Self> {
        self.priority(Priority::Spot {
            eviction_policy,
            max_price,
        })
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.admin_username = Some(username.into());
        self
    }

    /// Name of the deployment parameter that carries the admin password
    pub fn password_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.config.password_parameter = Some(parameter.into());
        self
    }

    pub fn vm_size(mut self, size: impl Into<VmSize>) -> Self {
        self.config.size = size.into();
        self
    }

    /// Provision the OS disk from a marketplace image, keeping any size and
    /// tier chosen via [`VmBuilder::os_disk`]
    pub fn operating_system(mut self, image: ImageDefinition) -> Self {
        self.config.os_disk = match self.config.os_disk {
            OsDisk::FromImage {
                size_gb, disk_type, ..
            } => OsDisk::FromImage {
                image,
                size_gb,
                disk_type,
            },
            OsDisk::Attach { .. } => OsDisk::FromImage {
                image,
                size_gb: crate::config::DEFAULT_OS_DISK_SIZE_GB,
                disk_type: DiskType::StandardSsdLrs,
            },
        };
        self
    }

    /// Size and tier of the image-provisioned OS disk
    pub fn os_disk(mut self, size_gb: u32, disk_type: DiskType) -> Self {
        self.config.os_disk = match self.config.os_disk {
            OsDisk::FromImage { image, .. } => OsDisk::FromImage {
                image,
                size_gb,
                disk_type,
            },
            attach @ OsDisk::Attach { .. } => attach,
        };
        self
    }

    /// Attach an existing disk as the OS disk; its size and tier are fixed
    /// by the disk itself
    pub fn attach_os_disk(mut self, os: Os, disk_name: impl Into<String>, managed: bool) -> Self {
        self.config.os_disk = OsDisk::Attach {
            name: disk_name.into(),
            managed,
            os,
        };
        self
    }

    pub fn add_disk(mut self, size_gb: u32, disk_type: DiskType) -> Self {
        self.config
            .data_disks
            .get_or_insert_with(Vec::new)
            .push(DataDisk::new(size_gb, disk_type));
        self
    }

    /// Explicitly deploy without data disks; the build-time default disk is
    /// suppressed
    pub fn no_data_disks(mut self) -> Self {
        self.config.data_disks = None;
        self
    }

    pub fn custom_script(mut self, script: impl Into<String>) -> Self {
        self.config.custom_script = Some(script.into());
        self
    }

    pub fn custom_script_files(mut self, uris: Vec<String>) -> Self {
        self.config.custom_script_files = uris;
        self
    }

    /// DNS label for the public IP
    pub fn domain_name_prefix(mut self, label: impl Into<String>) -> Self {
        self.config.domain_name_label = Some(label.into());
        self
    }

    pub fn custom_data(mut self, data: impl Into<String>) -> Self {
        self.config.custom_data = Some(data.into());
        self
    }

    pub fn disable_password_authentication(mut self, disabled: bool) -> Self {
        self.config.disable_password_authentication = Some(disabled);
        self
    }

    pub fn add_ssh_key(mut self, path: impl Into<String>, public_key: impl Into<String>) -> Self {
        self.config.ssh_keys.push(SshKey {
            path: path.into(),
            public_key: public_key.into(),
        });
        self
    }

    /// Append a batch of (path, public key) pairs for the admin user
    pub fn add_authorized_keys(mut self, keys: Vec<(String, String)>) -> Self {
        for (path, public_key) in keys {
            self.config.ssh_keys.push(SshKey { path, public_key });
        }
        self
    }

    /// Enable Azure AD SSH login (Linux image + system identity required at
    /// build time)
    pub fn aad_ssh_login(mut self, enabled: bool) -> Self {
        self.config.aad_ssh_login = enabled;
        self
    }

    /// Create the virtual network with this deployment under the given name
    pub fn vnet(mut self, name: impl Into<String>) -> Self {
        self.config.vnet = ResourceRef::named(name);
        self
    }

    /// Use an existing virtual network; none is created here
    pub fn link_to_vnet(mut self, name: impl Into<String>) -> Self {
        self.config.vnet = ResourceRef::external(name);
        self
    }

    pub fn address_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.address_prefix = prefix.into();
        self
    }

    pub fn subnet(mut self, name: impl Into<String>) -> Self {
        self.config.subnet = ResourceRef::named(name);
        self
    }

    pub fn link_to_subnet(mut self, name: impl Into<String>) -> Self {
        self.config.subnet = ResourceRef::external(name);
        self
    }

    pub fn subnet_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.subnet_prefix = prefix.into();
        self
    }

    /// Create the public IP under the given name instead of the derived one
    pub fn public_ip(mut self, name: impl Into<String>) -> Self {
        self.config.public_ip = Some(ResourceRef::named(name));
        self
    }

    /// Bind an existing public IP; none is created here
    pub fn link_to_public_ip(mut self, name: impl Into<String>) -> Self {
        self.config.public_ip = Some(ResourceRef::external(name));
        self
    }

    /// Deploy without any public IP
    pub fn no_public_ip(mut self) -> Self {
        self.config.public_ip = None;
        self
    }

    pub fn public_ip_allocation(mut self, method: AllocationMethod) -> Self {
        self.config.public_ip_allocation = Some(method);
        self
    }

    /// Requires a capable size; checked at build time
    pub fn accelerated_networking(mut self, enabled: bool) -> Self {
        self.config.accelerated_networking = Some(enabled);
        self
    }

    pub fn ip_forwarding(mut self, enabled: bool) -> Self {
        self.config.ip_forwarding = Some(enabled);
        self
    }

    pub fn add_ip_configuration(mut self, ip_config: IpConfig) -> Self {
        self.config.ip_configs.push(ip_config);
        self
    }

    pub fn add_ip_configurations(mut self, ip_configs: Vec<IpConfig>) -> Self {
        self.config.ip_configs.extend(ip_configs);
        self
    }

    pub fn private_ip_allocation(mut self, allocation: PrivateIpAllocation) -> Self {
        self.config.private_ip_allocation = Some(allocation);
        self
    }

    /// Join a load-balancer backend pool defined in this deployment
    pub fn add_backend_pool(mut self, name: impl Into<String>) -> Self {
        self.config.backend_pools.push(ResourceRef::named(name));
        self
    }

    /// Join an existing load-balancer backend pool
    pub fn link_to_backend_pool(mut self, name: impl Into<String>) -> Self {
        self.config.backend_pools.push(ResourceRef::external(name));
        self
    }

    pub fn system_identity(mut self) -> Self {
        self.config.identity.system_assigned = true;
        self
    }

    pub fn add_user_identity(mut self, identity: impl Into<String>) -> Self {
        self.config.identity.user_assigned.push(identity.into());
        self
    }

    pub fn network_security_group(mut self, name: impl Into<String>) -> Self {
        self.config.network_security_group = Some(ResourceRef::named(name));
        self
    }

    pub fn link_to_network_security_group(mut self, name: impl Into<String>) -> Self {
        self.config.network_security_group = Some(ResourceRef::external(name));
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.tags.insert(key.into(), value.into());
        self
    }

    pub fn tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in tags {
            self.config.tags.insert(key.into(), value.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_touch_only_their_field() {
        let builder = VmBuilder::new("web1").username("admin").vm_size("Standard_D2s_v5");
        let cfg = builder.config();
        assert_eq!(cfg.admin_username.as_deref(), Some("admin"));
        assert_eq!(cfg.size.as_str(), "Standard_D2s_v5");
        // untouched fields keep their defaults
        assert_eq!(cfg.public_ip, Some(ResourceRef::Derived));
        assert_eq!(cfg.address_prefix, crate::config::DEFAULT_ADDRESS_SPACE);
    }

    #[test]
    fn test_priority_then_spot_fails() {
        let err = VmBuilder::new("web1")
            .priority(Priority::Regular)
            .unwrap()
            .spot_instance(EvictionPolicy::Deallocate, -1.0)
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::already_set("priority", "regular")
        );
    }

    #[test]
    fn test_spot_then_priority_fails() {
        let err = VmBuilder::new("web1")
            .spot_instance(EvictionPolicy::Delete, 0.5)
            .unwrap()
            .priority(Priority::Regular)
            .unwrap_err();
        assert_eq!(err, BuildError::already_set("priority", "spot"));
    }

    #[test]
    fn test_os_disk_keeps_image() {
        let builder = VmBuilder::new("web1").os_disk(64, DiskType::PremiumLrs);
        match &builder.config().os_disk {
            OsDisk::FromImage {
                image,
                size_gb,
                disk_type,
            } => {
                assert_eq!(image, &ImageDefinition::ubuntu_2204_lts());
                assert_eq!(*size_gb, 64);
                assert_eq!(*disk_type, DiskType::PremiumLrs);
            }
            other => panic!("unexpected os disk: {:?}", other),
        }
    }

    #[test]
    fn test_no_data_disks_clears_pending_list() {
        let builder = VmBuilder::new("web1").no_data_disks();
        assert_eq!(builder.config().data_disks, None);
    }
}
