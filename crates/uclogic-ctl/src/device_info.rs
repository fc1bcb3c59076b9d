//! Device-info files, as written by the tablet mode switcher.
//!
//! One `KEY="value"` pair per line. Lines without `=` are ignored, values
//! must be double quoted. Recognised keys:
//!
//! - `HUION_FIRMWARE_ID`: firmware id string
//! - `HUION_MAGIC_BYTES`: the capability string, hex encoded
//! - `HUION_PAD_MODE`: present only on v1 (legacy pad mode) devices

use std::path::Path;
use std::str::FromStr;

use hid_uclogic_protocol::{CapabilityBuffer, DeviceProperties};
use serde::Serialize;
use tracing::debug;

use crate::error::CliError;

pub const KEY_FIRMWARE_ID: &str = "HUION_FIRMWARE_ID";
pub const KEY_MAGIC_BYTES: &str = "HUION_MAGIC_BYTES";
pub const KEY_PAD_MODE: &str = "HUION_PAD_MODE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub firmware_id: Option<String>,
    pub magic_bytes: Option<String>,
    pub pad_mode: Option<String>,
}

impl DeviceInfo {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let info = text.parse()?;
        debug!("Loaded device info from {}: {:?}", path.display(), info);
        Ok(info)
    }

    /// Properties as the classifier expects them.
    ///
    /// A missing capability string becomes an empty buffer, which the
    /// classifier rejects as malformed once it gets that far.
    pub fn to_properties(&self) -> Result<DeviceProperties, CliError> {
        let capabilities = match &self.magic_bytes {
            Some(hex) => CapabilityBuffer::from_hex_str(hex).map_err(|_| {
                CliError::InvalidDeviceInfo(format!(
                    "{KEY_MAGIC_BYTES} is {} characters, longer than the capability buffer",
                    hex.len()
                ))
            })?,
            None => CapabilityBuffer::default(),
        };

        Ok(DeviceProperties {
            firmware_id: self.firmware_id.clone(),
            legacy_pad_mode: self.pad_mode.is_some(),
            capabilities,
        })
    }
}

impl FromStr for DeviceInfo {
    type Err = CliError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut info = Self::default();

        for (number, line) in text.lines().enumerate() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value
                .trim_end()
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .ok_or_else(|| {
                    CliError::InvalidDeviceInfo(format!(
                        "line {}: incorrectly quoted value for {key}",
                        number + 1
                    ))
                })?
                .to_owned();

            match key.trim() {
                KEY_FIRMWARE_ID => info.firmware_id = Some(value),
                KEY_MAGIC_BYTES => info.magic_bytes = Some(value),
                KEY_PAD_MODE => info.pad_mode = Some(value),
                other => debug!("Ignoring device info key {}", other),
            }
        }

        Ok(info)
    }
}
