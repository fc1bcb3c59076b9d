//! HID protocol normalization for UC-Logic v2 graphics tablets.
//!
//! Huion and Gaomon tablets built on the UC-Logic v2 firmware expose a single
//! vendor-defined interface (usage page `0xFF00`) that generic input stacks
//! cannot interpret. This crate turns such a device into a standard digitizer:
//!
//! - **`capabilities`**: decodes the hex-encoded capability string the
//!   firmware reports once it has been switched into vendor mode.
//! - **`template`** / **`descriptor`**: synthesizes a standard report
//!   descriptor for those capabilities from two compile-time templates.
//! - **`classify`**: decides once per interface whether to normalize it,
//!   disable it (the compatibility interfaces duplicate input), or reject it.
//! - **`report`** / **`rewrite`**: rewrites each 12-byte vendor report into
//!   the layout the synthesized descriptor advertises, deriving a relative
//!   wheel from the absolute touch strip.
//! - **`attachment`**: ties the above together for one attached device.
//!
//! ## Protocol Notes
//!
//! | Report | Vendor byte 1 | Normalized id | Contents |
//! |--------|---------------|---------------|----------|
//! | Stylus | flags | `0x08` | 24-bit X/Y, 16-bit pressure, tilt |
//! | Pad | `0xE0` | `0x03` | 64-bit button bitmap |
//! | Touch strip | `0xF0` | `0xF0` | relative wheel (+1/-1) |
//! | Dial | `0xF1` | `0xF0` | two relative dials |
//!
//! The crate is I/O-free. Report rewriting performs no heap allocation and
//! has a fixed cost per report.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod attachment;
pub mod capabilities;
pub mod classify;
pub mod descriptor;
pub mod ids;
pub mod report;
pub mod rewrite;
pub mod template;

pub use attachment::{AttachmentMode, DeviceAttachment, EventAction, ReportType};
pub use capabilities::{
    CAPABILITY_BUFFER_LEN, CapabilityBuffer, DeviceCapabilities, MIN_CAPABILITY_LEN,
    parse_capabilities,
};
pub use classify::{Classification, DeviceProperties, VENDOR_INTERFACE_SIGNATURE, classify};
pub use descriptor::{
    ButtonLayout, ButtonSplit, COMPACT_BUTTON_LIMIT, COMPACT_LEN, COMPACT_TEMPLATE,
    DISABLED_DESCRIPTOR, EXTENDED_LEN, EXTENDED_TEMPLATE, MAX_SUPPORTED_BUTTONS,
    SynthesizedDescriptor, TOTAL_BUTTON_BITS, synthesize,
};
pub use ids::{
    FirmwareInfo, HUION_VENDOR_ID, PRODUCT_ID_TABLET3, SUPPORTED_DEVICES, SUPPORTED_FIRMWARE,
    firmware_info, is_supported_device,
};
pub use report::{
    NormalizedReport, REPORT_SIZE, ReportFamily, StylusFlags, StylusSample, VendorReport,
    discriminants, normalized_layout, report_ids, vendor_layout,
};
pub use rewrite::{Dropped, ReportRewriter, RewriteState, TOUCH_WRAP_THRESHOLD};
pub use template::{
    CompiledTemplate, FIELD_COUNT, FieldName, FieldSlot, FieldWidth, PLACEHOLDER,
    TemplateInstance, TemplateItem, template_len,
};

use thiserror::Error;

/// Errors detected while classifying a device.
///
/// All of them are terminal for the interface: the host is expected to leave
/// it untouched rather than retry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UclogicError {
    #[error("Malformed capability string")]
    MalformedCapabilityString,

    #[error("Capability string too short for v2: {len} bytes, need at least {min}")]
    CapabilityStringTooShort { len: u8, min: u8 },

    #[error("Too many buttons: have {count}, max {max}")]
    TooManyButtons { count: u8, max: u8 },

    #[error("Unsupported v1 protocol device")]
    Unsupported,

    #[error("No firmware id found, device switching missing or failed")]
    MissingFirmwareId,

    #[error("Report descriptor too short: {0} bytes")]
    DescriptorTooShort(usize),
}

/// Convenience result alias for UC-Logic operations.
pub type UclogicResult<T> = Result<T, UclogicError>;
