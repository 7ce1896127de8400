//! armflow VM deployment builder
//!
//! Assembles a virtual-machine deployment description (the VM, its network
//! interfaces, virtual network, subnet, public IP, diagnostics storage,
//! bootstrap script, and optional AAD SSH login extension) from a fluent set
//! of options, then emits the fixed-order resource list the deployment
//! engine consumes.
//!
//! # Example
//!
//! ```
//! use armflow_vm::VmBuilder;
//!
//! let resources = VmBuilder::new("web1")
//!     .username("admin")
//!     .build()
//!     .unwrap();
//!
//! let keys: Vec<String> = resources.iter().map(|r| r.key()).collect();
//! assert_eq!(
//!     keys,
//!     [
//!         "virtual-machine:web1",
//!         "network-interface:web1-nic",
//!         "virtual-network:web1-vnet",
//!         "public-ip-address:web1-ip",
//!     ]
//! );
//! ```
//!
//! A build is a pure function from configuration to resource list: no I/O,
//! no shared state, safe to run concurrently for independent configurations.

pub mod build;
pub mod builder;
pub mod config;
pub mod fanout;

// Re-exports
pub use builder::VmBuilder;
pub use config::{
    BootDiagnostics, IpConfig, ManagedIdentity, SshKey, VmConfig, DEFAULT_ADDRESS_SPACE,
    DEFAULT_DATA_DISK_SIZE_GB, DEFAULT_OS_DISK_SIZE_GB, DEFAULT_SIZE, DEFAULT_SUBNET_PREFIX,
};
pub use fanout::fan_out;

pub use armflow_core::{
    AllocationMethod, BuildError, DataDisk, DiskType, EvictionPolicy, ImageDefinition, Os, OsDisk,
    PrivateIpAllocation, Priority, Resource, ResourceRef, Result, VmSize,
};
