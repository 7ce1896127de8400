//! VM size identifiers and the capability table consulted at build time

use serde::{Deserialize, Serialize};

/// Size families with no accelerated-networking support.
///
/// Basic tier, the original A-series (including v2), and the one-vCPU
/// burstable B sizes lack the capability; anything else is assumed capable.
const NO_ACCELERATED_NETWORKING_PREFIXES: &[&str] = &["Basic_", "Standard_A"];

const NO_ACCELERATED_NETWORKING_SIZES: &[&str] =
    &["Standard_B1ls", "Standard_B1s", "Standard_B1ms", "Standard_B2s"];

/// A VM size identifier (e.g. "Standard_D2s_v5")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmSize(pub String);

impl VmSize {
    pub const STANDARD_A2_V2: &'static str = "Standard_A2_v2";
    pub const STANDARD_B2S: &'static str = "Standard_B2s";
    pub const STANDARD_B2MS: &'static str = "Standard_B2ms";
    pub const STANDARD_D2S_V5: &'static str = "Standard_D2s_v5";
    pub const STANDARD_D4S_V5: &'static str = "Standard_D4s_v5";
    pub const STANDARD_E4S_V5: &'static str = "Standard_E4s_v5";
    pub const STANDARD_F4S_V2: &'static str = "Standard_F4s_v2";

    pub fn new(size: impl Into<String>) -> Self {
        Self(size.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the size supports accelerated networking
    pub fn supports_accelerated_networking(&self) -> bool {
        if NO_ACCELERATED_NETWORKING_SIZES.contains(&self.0.as_str()) {
            return false;
        }
        !NO_ACCELERATED_NETWORKING_PREFIXES
            .iter()
            .any(|prefix| self.0.starts_with(prefix))
    }
}

impl std::fmt::Display for VmSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VmSize {
    fn from(size: &str) -> Self {
        Self(size.to_string())
    }
}
