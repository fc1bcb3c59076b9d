//! Optional YAML configuration extending the built-in allowlists.
//!
//! ```yaml
//! supported_devices:
//!   - vendor_id: 0x256c
//!     product_id: 0x0064
//! firmware:
//!   - id: GM001_T207_210524
//!     name: Gaomon M7
//!     family: primary
//! ```
//!
//! A list that is present replaces the built-in one; an absent list keeps it.

use std::path::Path;

use hid_uclogic_protocol::{FirmwareInfo, ReportFamily, firmware_info, is_supported_device};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbId {
    pub vendor_id: u16,
    pub product_id: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareEntry {
    pub id: String,
    pub name: String,
    #[serde(default = "default_family")]
    pub family: ReportFamily,
}

impl From<&FirmwareInfo> for FirmwareEntry {
    fn from(info: &FirmwareInfo) -> Self {
        Self {
            id: info.id.to_owned(),
            name: info.name.to_owned(),
            family: info.family,
        }
    }
}

fn default_family() -> ReportFamily {
    ReportFamily::Primary
}

/// `None` lists defer to the allowlists compiled into the protocol crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_devices: Option<Vec<UsbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<Vec<FirmwareEntry>>,
}

impl Config {
    /// Load `path`, or the built-in defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        debug!(
            "Loaded config from {}: devices {}, firmware {}",
            path.display(),
            describe(config.supported_devices.as_deref()),
            describe(config.firmware.as_deref())
        );
        Ok(config)
    }

    pub fn is_supported_device(&self, vendor_id: u16, product_id: u16) -> bool {
        match &self.supported_devices {
            Some(ids) => ids
                .iter()
                .any(|id| id.vendor_id == vendor_id && id.product_id == product_id),
            None => is_supported_device(vendor_id, product_id),
        }
    }

    pub fn firmware(&self, id: &str) -> Option<FirmwareEntry> {
        match &self.firmware {
            Some(entries) => entries.iter().find(|entry| entry.id == id).cloned(),
            None => firmware_info(id).map(FirmwareEntry::from),
        }
    }
}

fn describe<T>(list: Option<&[T]>) -> String {
    match list {
        Some(list) => format!("{} configured", list.len()),
        None => "built-in".to_owned(),
    }
}
