//! Resource-list assembly
//!
//! The terminal step of a builder: cross-field validation followed by
//! emission of the ordered resource list. Any validation failure aborts the
//! whole build; no partial list is ever returned.

use crate::builder::VmBuilder;
use crate::config::{BootDiagnostics, VmConfig, DEFAULT_DATA_DISK_SIZE_GB};
use armflow_core::{
    derived_name, AllocationMethod, BuildError, DataDisk, DiskType, Extension, Os, OsDisk,
    PublicIpAddress, Resource, Result, StorageAccount, Subnet, VirtualMachine, VirtualNetwork,
};
use serde_json::json;

impl VmBuilder {
    /// Validate the accumulated configuration and emit the ordered resource
    /// list: VM, network interfaces, virtual network, public IPs (the VM's
    /// own first), storage account, custom-script extension, AAD SSH
    /// extension. Conditional members are omitted when their preconditions
    /// do not hold.
    pub fn build(self) -> Result<Vec<Resource>> {
        let config = self.config;
        validate(&config)?;

        let admin_username = config
            .admin_username
            .clone()
            .ok_or_else(|| BuildError::missing_field(&config.name, "username"))?;

        let nics = crate::fanout::fan_out(&config);
        let nic_names: Vec<String> = nics.iter().map(|n| n.name.clone()).collect();
        let diagnostics_storage = config.diagnostics_storage_name()?;

        let mut resources = Vec::new();

        resources.push(Resource::VirtualMachine(VirtualMachine {
            name: config.name.clone(),
            size: config.size.as_str().to_string(),
            availability_zone: config.availability_zone.clone(),
            priority: config.priority.clone(),
            admin_username,
            password_parameter: config.password_parameter.clone(),
            custom_data: config.custom_data.clone(),
            disable_password_authentication: config.disable_password_authentication,
            ssh_keys: config
                .ssh_keys
                .iter()
                .map(|k| (k.path.clone(), k.public_key.clone()))
                .collect(),
            os_disk: config.os_disk.clone(),
            data_disks: materialized_data_disks(&config),
            network_interfaces: nic_names.clone(),
            system_identity: config.identity.system_assigned,
            user_identities: config.identity.user_assigned.clone(),
            boot_diagnostics: config.boot_diagnostics.is_some(),
            diagnostics_storage: diagnostics_storage.clone(),
            depends_on: nic_names,
            tags: config.tags.clone(),
        }));

        for nic in nics {
            resources.push(Resource::NetworkInterface(nic));
        }

        if config.vnet.is_managed() {
            let subnets = if config.subnet.is_managed() {
                vec![Subnet {
                    name: config.subnet_name(),
                    prefix: config.subnet_prefix.clone(),
                }]
            } else {
                Vec::new()
            };
            resources.push(Resource::VirtualNetwork(VirtualNetwork {
                name: config.vnet_name(),
                address_prefixes: vec![config.address_prefix.clone()],
                subnets,
                tags: config.tags.clone(),
            }));
        }

        if let Some(public_ip) = &config.public_ip {
            if public_ip.is_managed() {
                resources.push(Resource::PublicIpAddress(PublicIpAddress {
                    name: config
                        .public_ip_name()
                        .unwrap_or_else(|| config.name.clone()),
                    allocation_method: config.public_ip_allocation.unwrap_or_default(),
                    domain_name_label: config.domain_name_label.clone(),
                    availability_zone: config.availability_zone.clone(),
                    tags: config.tags.clone(),
                }));
            }
        }

        // Managed public IPs on added configurations are produced here too,
        // under the same names the fan-out wired into the interfaces.
        for (i, extra) in config.ip_configs.iter().enumerate() {
            if let Some(public_ip) = &extra.public_ip {
                if public_ip.is_managed() {
                    let derived = derived_name(&config.name, &format!("ip-{}", i + 1));
                    resources.push(Resource::PublicIpAddress(PublicIpAddress {
                        name: public_ip.resolve(&derived),
                        allocation_method: AllocationMethod::default(),
                        domain_name_label: None,
                        availability_zone: config.availability_zone.clone(),
                        tags: config.tags.clone(),
                    }));
                }
            }
        }

        if let Some(BootDiagnostics::Storage(storage)) = &config.boot_diagnostics {
            if storage.is_managed() {
                if let Some(name) = diagnostics_storage {
                    resources.push(Resource::StorageAccount(StorageAccount {
                        name,
                        sku: "Standard_LRS".to_string(),
                        tags: config.tags.clone(),
                    }));
                }
            }
        }

        if let Some(script) = &config.custom_script {
            resources.push(Resource::Extension(custom_script_extension(&config, script)));
        }

        if config.aad_ssh_login {
            resources.push(Resource::Extension(aad_ssh_extension(&config)));
        }

        for resource in &resources {
            tracing::debug!(resource = %resource.key(), "emitting resource");
        }

        Ok(resources)
    }
}

/// Cross-field invariants checked before any resource is emitted
fn validate(config: &VmConfig) -> Result<()> {
    if config.admin_username.is_none() {
        return Err(BuildError::missing_field(&config.name, "username"));
    }

    if config.disable_password_authentication == Some(true) && config.ssh_keys.is_empty() {
        return Err(BuildError::missing_companion(
            "disable_password_authentication",
            "at least one SSH key",
        ));
    }

    if !config.custom_script_files.is_empty() && config.custom_script.is_none() {
        return Err(BuildError::missing_companion(
            format!(
                "custom_script_files [{}]",
                config.custom_script_files.join(", ")
            ),
            "an accompanying custom_script",
        ));
    }

    if config.aad_ssh_login {
        match &config.os_disk {
            OsDisk::Attach { .. } => {
                return Err(BuildError::missing_companion(
                    "aad_ssh_login",
                    "an image-provisioned OS disk",
                ));
            }
            OsDisk::FromImage { image, .. } if image.os == Os::Windows => {
                return Err(BuildError::missing_companion(
                    "aad_ssh_login",
                    "a Linux image",
                ));
            }
            OsDisk::FromImage { .. } => {}
        }
        if !config.identity.system_assigned {
            return Err(BuildError::missing_companion(
                "aad_ssh_login",
                "a system-assigned identity",
            ));
        }
    }

    if config.os_disk.disk_type() == Some(DiskType::UltraSsdLrs) {
        return Err(BuildError::unsupported(
            DiskType::UltraSsdLrs.as_str(),
            "OS disks",
        ));
    }

    if config.accelerated_networking == Some(true)
        && !config.size.supports_accelerated_networking()
    {
        return Err(BuildError::unsupported(
            config.size.as_str(),
            "accelerated networking",
        ));
    }

    Ok(())
}

/// An untouched pending list materializes one conventional default disk; an
/// explicit `no_data_disks` stays empty.
fn materialized_data_disks(config: &VmConfig) -> Vec<DataDisk> {
    match &config.data_disks {
        Some(disks) if disks.is_empty() => vec![DataDisk::new(
            DEFAULT_DATA_DISK_SIZE_GB,
            DiskType::StandardLrs,
        )],
        Some(disks) => disks.clone(),
        None => Vec::new(),
    }
}

fn custom_script_extension(config: &VmConfig, script: &str) -> Extension {
    let (publisher, extension_type, version) = match config.os_disk.os() {
        Os::Linux => ("Microsoft.Azure.Extensions", "CustomScript", "2.1"),
        Os::Windows => ("Microsoft.Compute", "CustomScriptExtension", "1.10"),
    };
    Extension {
        name: format!("{}-custom-script", config.name),
        virtual_machine: config.name.clone(),
        publisher: publisher.to_string(),
        extension_type: extension_type.to_string(),
        type_handler_version: version.to_string(),
        auto_upgrade_minor_version: true,
        settings: json!({
            "commandToExecute": script,
            "fileUris": config.custom_script_files.clone(),
        }),
        depends_on: vec![config.name.clone()],
        tags: config.tags.clone(),
    }
}

fn aad_ssh_extension(config: &VmConfig) -> Extension {
    Extension {
        name: format!("{}-aad-ssh-login", config.name),
        virtual_machine: config.name.clone(),
        publisher: "Microsoft.Azure.ActiveDirectory".to_string(),
        extension_type: "AADSSHLoginForLinux".to_string(),
        type_handler_version: "1.0".to_string(),
        auto_upgrade_minor_version: true,
        settings: json!({}),
        depends_on: vec![config.name.clone()],
        tags: config.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armflow_core::ImageDefinition;

    #[test]
    fn test_default_data_disk_materialized() {
        let config = VmConfig::new("web1");
        let disks = materialized_data_disks(&config);
        assert_eq!(
            disks,
            [DataDisk::new(DEFAULT_DATA_DISK_SIZE_GB, DiskType::StandardLrs)]
        );
    }

    #[test]
    fn test_no_data_disks_stays_empty() {
        let mut config = VmConfig::new("web1");
        config.data_disks = None;
        assert!(materialized_data_disks(&config).is_empty());
    }

    #[test]
    fn test_windows_script_extension_shape() {
        let mut config = VmConfig::new("win1");
        config.os_disk = OsDisk::FromImage {
            image: ImageDefinition::windows_server_2022(),
            size_gb: 128,
            disk_type: DiskType::PremiumLrs,
        };
        let ext = custom_script_extension(&config, "install.ps1");
        assert_eq!(ext.publisher, "Microsoft.Compute");
        assert_eq!(ext.extension_type, "CustomScriptExtension");
        assert_eq!(ext.depends_on, ["win1"]);
    }
}
