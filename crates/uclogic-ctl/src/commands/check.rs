//! `check`: verify a device against the allowlist before attaching

use anyhow::Result;
use hid_uclogic_protocol::UclogicError;
use serde::Serialize;
use tracing::warn;

use crate::commands::DeviceArgs;
use crate::config::{Config, UsbId};
use crate::device_info::DeviceInfo;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub firmware_id: String,
    pub firmware_supported: bool,
    pub usb_id: Option<UsbId>,
    pub device_supported: Option<bool>,
    pub forced: bool,
}

pub fn execute(args: &DeviceArgs, usb_id: Option<UsbId>, config: &Config, json: bool) -> Result<()> {
    let info = DeviceInfo::load(&args.device_info)?;
    let report = check(&info, usb_id, config, args.force)?;
    output::print_check(&report, json);
    Ok(())
}

/// Check firmware and USB id. v1 devices are refused even with `force`.
pub fn check(
    info: &DeviceInfo,
    usb_id: Option<UsbId>,
    config: &Config,
    force: bool,
) -> Result<CheckReport, CliError> {
    let firmware_id = match info.firmware_id.as_deref() {
        None | Some("") => return Err(UclogicError::MissingFirmwareId.into()),
        Some(id) => id.to_owned(),
    };
    if info.pad_mode.is_some() {
        return Err(UclogicError::Unsupported.into());
    }

    let firmware_supported = config.firmware(&firmware_id).is_some();
    let device_supported = usb_id.map(|id| config.is_supported_device(id.vendor_id, id.product_id));

    let mut problems = Vec::new();
    if !firmware_supported {
        problems.push(format!("firmware {firmware_id} is not in the allowlist"));
    }
    if let (Some(id), Some(false)) = (usb_id, device_supported) {
        problems.push(format!(
            "USB device {:04x}:{:04x} is not in the allowlist",
            id.vendor_id, id.product_id
        ));
    }

    let forced = !problems.is_empty();
    if forced {
        if !force {
            return Err(CliError::Unsupported(problems.join(", ")));
        }
        warn!("Continuing despite: {}", problems.join(", "));
    }

    Ok(CheckReport {
        firmware_id,
        firmware_supported,
        usb_id,
        device_supported,
        forced,
    })
}
