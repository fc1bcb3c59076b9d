//! Device IDs for UC-Logic v2 tablets
//!
//! Several rebranded tablets share one VID/PID pair; the firmware id reported
//! after switching the device into vendor mode is what tells them apart.

use crate::report::ReportFamily;

/// Huion (and OEM partners) USB Vendor ID.
pub const HUION_VENDOR_ID: u16 = 0x256C;

/// Product ID shared by the Gaomon M6, Gaomon M7 and Huion HC16.
pub const PRODUCT_ID_TABLET3: u16 = 0x0064;

/// `(vendor_id, product_id)` pairs known to carry v2 firmware.
pub static SUPPORTED_DEVICES: &[(u16, u16)] = &[(HUION_VENDOR_ID, PRODUCT_ID_TABLET3)];

/// A firmware build known to speak the v2 protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub family: ReportFamily,
}

/// Firmware builds that have been checked against recordings.
pub static SUPPORTED_FIRMWARE: &[FirmwareInfo] = &[
    FirmwareInfo {
        id: "GM001_T207_210524",
        name: "Gaomon M7",
        family: ReportFamily::Primary,
    },
    FirmwareInfo {
        id: "HUION_T18C_211220",
        name: "Huion HC16",
        family: ReportFamily::Primary,
    },
];

pub fn is_supported_device(vendor_id: u16, product_id: u16) -> bool {
    SUPPORTED_DEVICES.contains(&(vendor_id, product_id))
}

/// Look up a firmware id in [`SUPPORTED_FIRMWARE`].
pub fn firmware_info(id: &str) -> Option<&'static FirmwareInfo> {
    SUPPORTED_FIRMWARE.iter().find(|info| info.id == id)
}
