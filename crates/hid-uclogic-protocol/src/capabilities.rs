//! Capability string parsing.
//!
//! Once switched into vendor mode the firmware reports its capabilities as a
//! string of hex digit pairs. The first pair is the significant length `L`:
//! the first `2L` characters must be hex digits, and the rest of the fixed
//! 64-byte buffer the host delivers the string in must be zero.
//!
//! v2 layout (byte offsets over the decoded pairs):
//!
//! | Offset | Width | Field |
//! |--------|-------|-------|
//! | 0 | 1 | significant length |
//! | 2 | 3 | logical max X (LE) |
//! | 5 | 3 | logical max Y (LE) |
//! | 8 | 2 | logical max pressure (LE) |
//! | 10 | 2 | resolution (LE) |
//! | 13 | 1 | button count |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{UclogicError, UclogicResult};

/// Capacity of the buffer the capability string is delivered in.
pub const CAPABILITY_BUFFER_LEN: usize = 64;

/// Shortest significant length that carries the v2 layout.
pub const MIN_CAPABILITY_LEN: u8 = 18;

mod offsets {
    pub const LOGICAL_MAX_X: usize = 2;
    pub const LOGICAL_MAX_Y: usize = 5;
    pub const LOGICAL_MAX_PRESSURE: usize = 8;
    pub const RESOLUTION: usize = 10;
    pub const BUTTON_COUNT: usize = 13;
}

/// The capability string as delivered by the host: ASCII, zero padded.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CapabilityBuffer([u8; CAPABILITY_BUFFER_LEN]);

impl CapabilityBuffer {
    pub const fn new(raw: [u8; CAPABILITY_BUFFER_LEN]) -> Self {
        Self(raw)
    }

    /// Copy `text` into a zero-padded buffer.
    ///
    /// Content is not validated here; [`parse_capabilities`] does that.
    ///
    /// # Errors
    ///
    /// [`UclogicError::MalformedCapabilityString`] if `text` does not fit.
    pub fn from_hex_str(text: &str) -> UclogicResult<Self> {
        let bytes = text.as_bytes();
        let mut raw = [0u8; CAPABILITY_BUFFER_LEN];
        raw.get_mut(..bytes.len())
            .ok_or(UclogicError::MalformedCapabilityString)?
            .copy_from_slice(bytes);
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; CAPABILITY_BUFFER_LEN] {
        &self.0
    }

    /// Decode the hex pair at byte `index`. Non-hex digits decode as zero.
    fn byte_at(&self, index: usize) -> u8 {
        let hi = self.0.get(index * 2).copied().map_or(0, hex_value);
        let lo = self.0.get(index * 2 + 1).copied().map_or(0, hex_value);
        (hi << 4) | lo
    }
}

impl Default for CapabilityBuffer {
    fn default() -> Self {
        Self([0; CAPABILITY_BUFFER_LEN])
    }
}

impl fmt::Debug for CapabilityBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        let text = self.0.get(..end).unwrap_or_default();
        f.debug_tuple("CapabilityBuffer")
            .field(&String::from_utf8_lossy(text))
            .finish()
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Capabilities of one tablet, as reported by its firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    /// 24-bit range.
    pub logical_max_x: u32,
    /// 24-bit range.
    pub logical_max_y: u32,
    pub logical_max_pressure: u16,
    pub resolution_units_per_mm: u16,
    pub button_count: u8,
}

impl DeviceCapabilities {
    /// Physical X extent in micrometres, zero when the resolution is unknown.
    pub fn physical_max_x(&self) -> u32 {
        physical_extent(self.logical_max_x, self.resolution_units_per_mm)
    }

    /// Physical Y extent in micrometres, zero when the resolution is unknown.
    pub fn physical_max_y(&self) -> u32 {
        physical_extent(self.logical_max_y, self.resolution_units_per_mm)
    }
}

/// 32-bit wrapping arithmetic, as the host side of the firmware computes it.
fn physical_extent(logical_max: u32, resolution: u16) -> u32 {
    match u32::from(resolution) {
        0 => 0,
        res => logical_max.wrapping_mul(1000) / res,
    }
}

impl fmt::Display for DeviceCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x_um, y_um) = (self.physical_max_x(), self.physical_max_y());
        write!(
            f,
            "Device with {} buttons, max pen pressure {}, logical size ({}, {}), resolution {}, physical size in mm ({}.{:03}, {}.{:03})",
            self.button_count,
            self.logical_max_pressure,
            self.logical_max_x,
            self.logical_max_y,
            self.resolution_units_per_mm,
            x_um / 1000,
            x_um % 1000,
            y_um / 1000,
            y_um % 1000,
        )
    }
}

/// Validate the buffer and return the significant length prefix.
///
/// Every byte of the buffer is visited exactly once whatever the content.
fn significant_len(buf: &CapabilityBuffer) -> UclogicResult<u8> {
    let raw = buf.as_bytes();
    if !raw[0].is_ascii_hexdigit() || !raw[1].is_ascii_hexdigit() {
        return Err(UclogicError::MalformedCapabilityString);
    }

    let len = buf.byte_at(0);
    let hex_chars = usize::from(len) * 2;
    let valid = raw.iter().enumerate().fold(true, |valid, (i, &c)| {
        let ok = if i < hex_chars {
            c.is_ascii_hexdigit()
        } else {
            c == 0
        };
        valid & ok
    });

    if valid {
        Ok(len)
    } else {
        Err(UclogicError::MalformedCapabilityString)
    }
}

/// Decode a v2 capability string.
///
/// # Errors
///
/// - [`UclogicError::MalformedCapabilityString`] if a significant character
///   is not a hex digit or the tail is not zero.
/// - [`UclogicError::CapabilityStringTooShort`] if the length prefix is
///   below [`MIN_CAPABILITY_LEN`].
pub fn parse_capabilities(buf: &CapabilityBuffer) -> UclogicResult<DeviceCapabilities> {
    let len = significant_len(buf)?;
    if len < MIN_CAPABILITY_LEN {
        return Err(UclogicError::CapabilityStringTooShort {
            len,
            min: MIN_CAPABILITY_LEN,
        });
    }

    let m = |i: usize| u32::from(buf.byte_at(i));
    let le24 = |start: usize| m(start) | (m(start + 1) << 8) | (m(start + 2) << 16);
    let le16 =
        |start: usize| u16::from(buf.byte_at(start)) | (u16::from(buf.byte_at(start + 1)) << 8);

    Ok(DeviceCapabilities {
        logical_max_x: le24(offsets::LOGICAL_MAX_X),
        logical_max_y: le24(offsets::LOGICAL_MAX_Y),
        logical_max_pressure: le16(offsets::LOGICAL_MAX_PRESSURE),
        resolution_units_per_mm: le16(offsets::RESOLUTION),
        button_count: buf.byte_at(offsets::BUTTON_COUNT),
    })
}
