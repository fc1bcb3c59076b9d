//! `descriptor`: print the replacement report descriptor

use std::path::Path;

use anyhow::Result;
use hid_uclogic_protocol::{AttachmentMode, DeviceAttachment, VENDOR_INTERFACE_SIGNATURE};
use tracing::debug;

use crate::commands::DeviceArgs;
use crate::config::Config;
use crate::dump;
use crate::error::CliError;
use crate::output;

pub fn execute(
    args: &DeviceArgs,
    rdesc: Option<&Path>,
    config: &Config,
    json: bool,
) -> Result<()> {
    let device = args.load(config)?;
    let original = match rdesc {
        Some(path) => load_rdesc(path)?,
        None => VENDOR_INTERFACE_SIGNATURE.to_vec(),
    };

    let attachment = DeviceAttachment::attach(&device.props, &original, device.family)
        .map_err(CliError::from)?;
    let mode = match attachment.mode() {
        AttachmentMode::Normalize => "normalize",
        AttachmentMode::Disabled => "disabled",
    };

    let line = dump::format_descriptor(attachment.replacement_descriptor());
    output::print_descriptor(&line, mode, json);
    Ok(())
}

/// Read an interface's original descriptor: a binary sysfs
/// `report_descriptor` or an `R:` line from hid-decode.
fn load_rdesc(path: &Path) -> Result<Vec<u8>, CliError> {
    let bytes = std::fs::read(path)?;
    if !bytes.starts_with(b"R:") {
        debug!("Read {} byte binary descriptor", bytes.len());
        return Ok(bytes);
    }

    let text = String::from_utf8_lossy(&bytes);
    let line = text.lines().next().unwrap_or_default();
    dump::parse_descriptor_line(line)
}
