//! Disk and OS image vocabulary shared by configuration and emitted resources

use serde::{Deserialize, Serialize};

/// Managed disk storage tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskType {
    #[serde(rename = "Standard_LRS")]
    StandardLrs,
    #[serde(rename = "StandardSSD_LRS")]
    StandardSsdLrs,
    #[serde(rename = "Premium_LRS")]
    PremiumLrs,
    #[serde(rename = "UltraSSD_LRS")]
    UltraSsdLrs,
}

impl DiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiskType::StandardLrs => "Standard_LRS",
            DiskType::StandardSsdLrs => "StandardSSD_LRS",
            DiskType::PremiumLrs => "Premium_LRS",
            DiskType::UltraSsdLrs => "UltraSSD_LRS",
        }
    }
}

impl std::fmt::Display for DiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system family of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Os {
    Linux,
    Windows,
}

/// Marketplace image descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefinition {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub os: Os,
}

impl ImageDefinition {
    pub fn new(
        os: Os,
        publisher: impl Into<String>,
        offer: impl Into<String>,
        sku: impl Into<String>,
    ) -> Self {
        Self {
            publisher: publisher.into(),
            offer: offer.into(),
            sku: sku.into(),
            os,
        }
    }

    /// Ubuntu Server 22.04 LTS (gen2)
    pub fn ubuntu_2204_lts() -> Self {
        Self::new(
            Os::Linux,
            "Canonical",
            "0001-com-ubuntu-server-jammy",
            "22_04-lts-gen2",
        )
    }

    /// Ubuntu Server 20.04 LTS
    pub fn ubuntu_2004_lts() -> Self {
        Self::new(Os::Linux, "Canonical", "0001-com-ubuntu-server-focal", "20_04-lts")
    }

    /// Windows Server 2022 Datacenter
    pub fn windows_server_2022() -> Self {
        Self::new(
            Os::Windows,
            "MicrosoftWindowsServer",
            "WindowsServer",
            "2022-datacenter-azure-edition",
        )
    }
}

/// OS disk of a virtual machine: provisioned from an image, or an existing
/// disk attached as-is (size and tier fixed by the disk)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsDisk {
    FromImage {
        image: ImageDefinition,
        size_gb: u32,
        disk_type: DiskType,
    },
    Attach {
        name: String,
        /// Whether the disk is managed by this deployment or external
        managed: bool,
        os: Os,
    },
}

impl OsDisk {
    pub fn os(&self) -> Os {
        match self {
            OsDisk::FromImage { image, .. } => image.os,
            OsDisk::Attach { os, .. } => *os,
        }
    }

    pub fn disk_type(&self) -> Option<DiskType> {
        match self {
            OsDisk::FromImage { disk_type, .. } => Some(*disk_type),
            OsDisk::Attach { .. } => None,
        }
    }
}

/// Data disk attached to a virtual machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDisk {
    pub size_gb: u32,
    pub disk_type: DiskType,
}

impl DataDisk {
    pub fn new(size_gb: u32, disk_type: DiskType) -> Self {
        Self { size_gb, disk_type }
    }
}
