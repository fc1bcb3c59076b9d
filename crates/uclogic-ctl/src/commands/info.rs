//! `info`: classify a device and print its capabilities

use anyhow::Result;
use hid_uclogic_protocol::{
    ButtonLayout, DeviceCapabilities, ReportFamily, VENDOR_INTERFACE_SIGNATURE, classify,
    synthesize,
};
use serde::Serialize;

use crate::commands::DeviceArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, Serialize)]
pub struct InfoReport {
    pub firmware_id: String,
    pub name: Option<String>,
    pub family: ReportFamily,
    pub capabilities: DeviceCapabilities,
    pub physical_max_x_um: u32,
    pub physical_max_y_um: u32,
    pub layout: ButtonLayout,
    pub descriptor_len: usize,
}

pub fn execute(args: &DeviceArgs, config: &Config, json: bool) -> Result<()> {
    let report = build_report(args, config)?;
    output::print_info(&report, json);
    Ok(())
}

fn build_report(args: &DeviceArgs, config: &Config) -> Result<InfoReport, CliError> {
    let device = args.load(config)?;
    let classification = classify(&device.props, &VENDOR_INTERFACE_SIGNATURE)?;
    let Some(&capabilities) = classification.capabilities() else {
        return Err(CliError::Unsupported(
            "vendor interface was not selected for normalization".to_owned(),
        ));
    };
    let descriptor = synthesize(&capabilities);

    Ok(InfoReport {
        firmware_id: device.props.firmware_id.clone().unwrap_or_default(),
        name: device.name,
        family: device.family,
        capabilities,
        physical_max_x_um: capabilities.physical_max_x(),
        physical_max_y_um: capabilities.physical_max_y(),
        layout: descriptor.layout(),
        descriptor_len: descriptor.len(),
    })
}
