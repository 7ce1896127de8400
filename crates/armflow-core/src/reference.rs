//! Sub-resource reference abstraction
//!
//! Every dependent resource of a deployment (virtual network, subnet, public
//! IP, NSG, storage account, disks, backend pools) is addressed through a
//! [`ResourceRef`]: either managed by this deployment with a derived name,
//! managed with a user-supplied name, or linked to a resource that already
//! exists outside the deployment.

use serde::{Deserialize, Serialize};

/// Reference to a dependent resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRef {
    /// Managed here; the name is derived from the owning resource
    Derived,

    /// Managed here with a user-supplied name
    Named(String),

    /// Linked to a pre-existing resource; never created by this deployment
    External(String),
}

impl ResourceRef {
    /// Resolve the reference to a concrete name.
    ///
    /// `derived` is the name the owner would assign if the reference is left
    /// at [`ResourceRef::Derived`]. Resolution is deterministic and performs
    /// no I/O.
    pub fn resolve(&self, derived: &str) -> String {
        match self {
            ResourceRef::Derived => derived.to_string(),
            ResourceRef::Named(name) => name.clone(),
            ResourceRef::External(id) => id.clone(),
        }
    }

    /// Whether the referenced resource is created by this deployment
    pub fn is_managed(&self) -> bool {
        !matches!(self, ResourceRef::External(_))
    }

    pub fn named(name: impl Into<String>) -> Self {
        ResourceRef::Named(name.into())
    }

    pub fn external(id: impl Into<String>) -> Self {
        ResourceRef::External(id.into())
    }
}

impl Default for ResourceRef {
    fn default() -> Self {
        ResourceRef::Derived
    }
}
