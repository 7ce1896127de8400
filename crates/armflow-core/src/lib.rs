//! armflow core resource model
//!
//! This crate provides the shared vocabulary of armflow deployments: the
//! resource descriptions a build emits, the managed/linked reference
//! abstraction, derived-name helpers, and the VM-size capability table.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 deployment engine                │
//! │            (consumes Vec<Resource>)              │
//! └─────────────────▲───────────────────────────────┘
//!                   │
//! ┌─────────────────┴───────────────────────────────┐
//! │                  armflow-vm                      │
//! │   builder → fan-out → ordered resource list      │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 armflow-core                     │
//! │   Resource / ResourceRef / names / sizes         │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod disks;
pub mod error;
pub mod names;
pub mod reference;
pub mod resource;
pub mod sizes;

// Re-exports
pub use disks::{DataDisk, DiskType, ImageDefinition, Os, OsDisk};
pub use error::{BuildError, Result};
pub use names::{derived_name, sanitize_storage_name};
pub use reference::ResourceRef;
pub use resource::{
    AllocationMethod, EvictionPolicy, Extension, IpConfiguration, NetworkInterface,
    PrivateIpAllocation, Priority, PublicIpAddress, Resource, StorageAccount, Subnet,
    VirtualMachine, VirtualNetwork,
};
pub use sizes::VmSize;
