//! Command implementations for uclogic-ctl

pub mod check;
pub mod descriptor;
pub mod info;
pub mod replay;

use std::path::PathBuf;

use clap::Args;
use hid_uclogic_protocol::{DeviceProperties, ReportFamily};
use tracing::warn;

use crate::config::Config;
use crate::device_info::DeviceInfo;
use crate::error::CliError;

/// Arguments shared by every command that reads a device.
#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Device-info file written by the mode switcher
    #[arg(long, value_name = "FILE")]
    pub device_info: PathBuf,

    /// Continue with firmware or devices missing from the allowlist
    #[arg(long)]
    pub force: bool,
}

/// A device-info file resolved against the configured allowlist.
#[derive(Debug, Clone)]
pub struct LoadedDevice {
    pub props: DeviceProperties,
    pub family: ReportFamily,
    /// Display name from the allowlist, if the firmware is listed.
    pub name: Option<String>,
}

impl DeviceArgs {
    pub fn load(&self, config: &Config) -> Result<LoadedDevice, CliError> {
        let info = DeviceInfo::load(&self.device_info)?;
        let props = info.to_properties()?;

        let (family, name) = match props.firmware_id.as_deref() {
            // Left for the classifier to report.
            None | Some("") => (ReportFamily::Primary, None),
            Some(id) => match config.firmware(id) {
                Some(entry) => (entry.family, Some(entry.name)),
                None if self.force => {
                    warn!("Unknown firmware {}, continuing as primary family", id);
                    (ReportFamily::Primary, None)
                }
                None => {
                    return Err(CliError::Unsupported(format!(
                        "firmware {id} is not in the allowlist (use --force to override)"
                    )));
                }
            },
        };

        Ok(LoadedDevice {
            props,
            family,
            name,
        })
    }
}

/// Parse a USB id given as hex, with or without a `0x` prefix.
pub fn parse_usb_id(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid USB id {s:?}: {e}"))
}
