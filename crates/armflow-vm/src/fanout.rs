//! IP-configuration fan-out
//!
//! Expands the VM's single logical network identity into one network
//! interface per distinct subnet. Grouping keeps first-occurrence order so
//! identical input always yields an identical interface list.

use crate::config::VmConfig;
use armflow_core::{derived_name, IpConfiguration, NetworkInterface, ResourceRef};

/// One IP configuration paired with the references it resolved from
struct ResolvedConfig {
    entry: IpConfiguration,
    /// Managed public IP this configuration depends on, if any
    managed_public_ip: Option<String>,
}

fn resolve_pools(pools: &[ResourceRef], owner: &str) -> Vec<String> {
    let derived = derived_name(owner, "pool");
    pools.iter().map(|r| r.resolve(&derived)).collect()
}

/// Expand the VM's implicit IP configuration plus any user-added ones into
/// network interfaces, one per distinct subnet.
pub fn fan_out(config: &VmConfig) -> Vec<NetworkInterface> {
    let own_subnet = config.subnet_name();
    let nic_name = config.nic_name();
    let vnet_name = config.vnet_name();

    // The implicit configuration is marked primary only when the user added
    // extra configurations; a lone configuration carries no explicit flag.
    let implicit_primary = if config.ip_configs.is_empty() {
        None
    } else {
        Some(true)
    };

    let mut resolved = vec![ResolvedConfig {
        entry: IpConfiguration {
            name: "ipconfig1".to_string(),
            primary: implicit_primary,
            subnet_name: own_subnet.clone(),
            public_ip_name: config.public_ip_name(),
            private_ip_allocation: config.private_ip_allocation.clone().unwrap_or_default(),
            backend_pools: resolve_pools(&config.backend_pools, &config.name),
        },
        managed_public_ip: match (&config.public_ip, config.public_ip_name()) {
            (Some(r), Some(name)) if r.is_managed() => Some(name),
            _ => None,
        },
    }];

    for (i, extra) in config.ip_configs.iter().enumerate() {
        // Unset subnets default to the VM's own subnet.
        let subnet = extra
            .subnet_name
            .clone()
            .unwrap_or_else(|| own_subnet.clone());
        let ip_fallback = derived_name(&config.name, &format!("ip-{}", i + 1));
        let public_ip_name = extra.public_ip.as_ref().map(|r| r.resolve(&ip_fallback));
        let managed_public_ip = match (&extra.public_ip, &public_ip_name) {
            (Some(r), Some(name)) if r.is_managed() => Some(name.clone()),
            _ => None,
        };
        resolved.push(ResolvedConfig {
            entry: IpConfiguration {
                name: format!("ipconfig{}", i + 2),
                primary: None,
                subnet_name: subnet,
                public_ip_name,
                private_ip_allocation: extra.private_ip_allocation.clone().unwrap_or_default(),
                backend_pools: resolve_pools(&extra.backend_pools, &config.name),
            },
            managed_public_ip,
        });
    }

    // Group by subnet, keeping the order each subnet was first seen.
    let mut groups: Vec<(String, Vec<ResolvedConfig>)> = Vec::new();
    for rc in resolved {
        let subnet = rc.entry.subnet_name.clone();
        match groups.iter_mut().find(|(s, _)| *s == subnet) {
            Some((_, members)) => members.push(rc),
            None => groups.push((subnet, vec![rc])),
        }
    }

    let multiple = groups.len() > 1;
    let nsg = config
        .network_security_group
        .as_ref()
        .map(|r| r.resolve(&derived_name(&config.name, "nsg")));

    groups
        .into_iter()
        .map(|(subnet, members)| {
            let is_own_subnet = subnet == own_subnet;
            let mut depends_on = Vec::new();
            if config.vnet.is_managed() {
                depends_on.push(vnet_name.clone());
            }
            let mut ip_configurations = Vec::with_capacity(members.len());
            for member in members {
                if let Some(ip) = member.managed_public_ip {
                    depends_on.push(ip);
                }
                ip_configurations.push(member.entry);
            }
            tracing::debug!(
                subnet = %subnet,
                primary = is_own_subnet,
                configs = ip_configurations.len(),
                "fan-out interface group"
            );
            NetworkInterface {
                name: if is_own_subnet {
                    nic_name.clone()
                } else {
                    format!("{}-{}", nic_name, subnet)
                },
                primary: if multiple { Some(is_own_subnet) } else { None },
                virtual_network: vnet_name.clone(),
                ip_configurations,
                // Both flags only apply to the VM's own interface.
                accelerated_networking: if is_own_subnet {
                    config.accelerated_networking
                } else {
                    None
                },
                ip_forwarding: if is_own_subnet {
                    config.ip_forwarding
                } else {
                    None
                },
                network_security_group: nsg.clone(),
                depends_on,
                tags: config.tags.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IpConfig;

    #[test]
    fn test_single_subnet_single_unmarked_nic() {
        let config = VmConfig::new("web1");
        let nics = fan_out(&config);
        assert_eq!(nics.len(), 1);
        assert_eq!(nics[0].name, "web1-nic");
        assert_eq!(nics[0].primary, None);
        assert_eq!(nics[0].ip_configurations.len(), 1);
        assert_eq!(nics[0].ip_configurations[0].primary, None);
        assert_eq!(nics[0].ip_configurations[0].subnet_name, "web1-subnet");
    }

    #[test]
    fn test_added_config_same_subnet_stays_one_nic() {
        let mut config = VmConfig::new("web1");
        config.ip_configs.push(IpConfig::default());
        let nics = fan_out(&config);
        assert_eq!(nics.len(), 1);
        // one interface, so no NIC-level primary flag
        assert_eq!(nics[0].primary, None);
        // but the implicit configuration is marked among the two configs
        assert_eq!(nics[0].ip_configurations.len(), 2);
        assert_eq!(nics[0].ip_configurations[0].primary, Some(true));
        assert_eq!(nics[0].ip_configurations[1].primary, None);
    }

    #[test]
    fn test_distinct_subnets_fan_out_with_primary() {
        let mut config = VmConfig::new("web1");
        config.accelerated_networking = Some(true);
        config.ip_forwarding = Some(true);
        config.ip_configs.push(IpConfig::with_subnet("sub2"));
        let nics = fan_out(&config);
        assert_eq!(nics.len(), 2);

        assert_eq!(nics[0].name, "web1-nic");
        assert_eq!(nics[0].primary, Some(true));
        assert_eq!(nics[0].accelerated_networking, Some(true));
        assert_eq!(nics[0].ip_forwarding, Some(true));

        assert_eq!(nics[1].name, "web1-nic-sub2");
        assert_eq!(nics[1].primary, Some(false));
        assert_eq!(nics[1].accelerated_networking, None);
        assert_eq!(nics[1].ip_forwarding, None);
    }

    #[test]
    fn test_grouping_follows_first_occurrence_order() {
        let mut config = VmConfig::new("web1");
        config.ip_configs.push(IpConfig::with_subnet("sub3"));
        config.ip_configs.push(IpConfig::with_subnet("sub2"));
        config.ip_configs.push(IpConfig::with_subnet("sub3"));
        let nics = fan_out(&config);
        let names: Vec<&str> = nics.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["web1-nic", "web1-nic-sub3", "web1-nic-sub2"]);
        // the duplicate sub3 config landed in the existing group
        assert_eq!(nics[1].ip_configurations.len(), 2);
    }

    #[test]
    fn test_nic_depends_on_managed_vnet_and_ip() {
        let config = VmConfig::new("web1");
        let nics = fan_out(&config);
        assert_eq!(nics[0].depends_on, ["web1-vnet", "web1-ip"]);
    }

    #[test]
    fn test_linked_resources_do_not_appear_in_depends_on() {
        let mut config = VmConfig::new("web1");
        config.vnet = armflow_core::ResourceRef::external("shared-vnet");
        config.public_ip = Some(armflow_core::ResourceRef::external("known-ip"));
        let nics = fan_out(&config);
        assert!(nics[0].depends_on.is_empty());
        assert_eq!(
            nics[0].ip_configurations[0].public_ip_name.as_deref(),
            Some("known-ip")
        );
    }
}
