//! One-time classification of an attached interface.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::{CapabilityBuffer, DeviceCapabilities, parse_capabilities};
use crate::descriptor::MAX_SUPPORTED_BUTTONS;
use crate::{UclogicError, UclogicResult};

/// First three descriptor bytes of the vendor interface:
/// `Usage Page (Vendor Defined 0xFF00)`.
pub const VENDOR_INTERFACE_SIGNATURE: [u8; 3] = [0x06, 0x00, 0xFF];

/// Inputs supplied by whatever switched the device into vendor mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceProperties {
    /// `None` (or empty) if the switch failed or never ran.
    pub firmware_id: Option<String>,
    /// Set for v1 devices, which report pad buttons the old way.
    pub legacy_pad_mode: bool,
    pub capabilities: CapabilityBuffer,
}

/// What to do with an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "capabilities", rename_all = "lowercase")]
pub enum Classification {
    /// Vendor interface: replace the descriptor and rewrite every report.
    Normalize(DeviceCapabilities),
    /// Compatibility interface duplicating the vendor one: make it inert.
    Disable,
}

impl Classification {
    pub fn capabilities(&self) -> Option<&DeviceCapabilities> {
        match self {
            Self::Normalize(caps) => Some(caps),
            Self::Disable => None,
        }
    }
}

/// Decide how to treat an interface given its original descriptor.
///
/// # Errors
///
/// In order of precedence: [`UclogicError::MissingFirmwareId`],
/// [`UclogicError::Unsupported`], any capability string error,
/// [`UclogicError::TooManyButtons`], [`UclogicError::DescriptorTooShort`].
pub fn classify(props: &DeviceProperties, rdesc: &[u8]) -> UclogicResult<Classification> {
    let firmware_id = match props.firmware_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            warn!("No firmware id found, device switching missing or failed");
            return Err(UclogicError::MissingFirmwareId);
        }
    };

    if props.legacy_pad_mode {
        warn!("Firmware {} uses the v1 protocol, leaving device alone", firmware_id);
        return Err(UclogicError::Unsupported);
    }

    let caps = parse_capabilities(&props.capabilities).inspect_err(|e| {
        warn!("Rejecting firmware {}: {}", firmware_id, e);
    })?;

    if caps.button_count > MAX_SUPPORTED_BUTTONS {
        warn!(
            "Firmware {} reports {} buttons, at most {} are supported",
            firmware_id, caps.button_count, MAX_SUPPORTED_BUTTONS
        );
        return Err(UclogicError::TooManyButtons {
            count: caps.button_count,
            max: MAX_SUPPORTED_BUTTONS,
        });
    }

    let Some(signature) = rdesc.get(..VENDOR_INTERFACE_SIGNATURE.len()) else {
        warn!("Report descriptor too short ({} bytes)", rdesc.len());
        return Err(UclogicError::DescriptorTooShort(rdesc.len()));
    };

    info!("Found UC-Logic v2 tablet {}: {}", firmware_id, caps);

    if signature == VENDOR_INTERFACE_SIGNATURE {
        debug!("Vendor interface signature matched, normalizing");
        Ok(Classification::Normalize(caps))
    } else {
        debug!(
            "Descriptor starts with {:02x?}, disabling duplicate interface",
            signature
        );
        Ok(Classification::Disable)
    }
}
