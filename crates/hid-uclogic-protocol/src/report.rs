//! Vendor and normalized input reports.
//!
//! Both directions are 12 bytes. Fields are read and written at explicit
//! byte offsets; see [`vendor_layout`] and [`normalized_layout`].

use serde::{Deserialize, Serialize};

/// Size of every vendor and normalized input report.
pub const REPORT_SIZE: usize = 12;

/// Report ids.
pub mod report_ids {
    /// The only id the vendor interface emits.
    pub const VENDOR: u8 = 0x08;
    pub const STYLUS: u8 = 0x08;
    pub const PAD: u8 = 0x03;
    pub const DIAL: u8 = 0xF0;
}

/// Byte 1 of a primary-family vendor report. Anything else is stylus flags.
pub mod discriminants {
    pub const PAD: u8 = 0xE0;
    pub const TOUCH: u8 = 0xF0;
    pub const DIAL: u8 = 0xF1;
}

/// Byte offsets in vendor reports.
pub mod vendor_layout {
    pub const REPORT_ID: usize = 0;
    pub const DISCRIMINANT: usize = 1;

    pub const STYLUS_FLAGS: usize = 1;
    pub const STYLUS_X_LOW: usize = 2;
    pub const STYLUS_Y_LOW: usize = 4;
    pub const STYLUS_PRESSURE: usize = 6;
    pub const STYLUS_X_HIGH: usize = 8;
    pub const STYLUS_Y_HIGH: usize = 9;
    pub const STYLUS_X_TILT: usize = 10;
    pub const STYLUS_Y_TILT: usize = 11;

    pub const PAD_BUTTONS: usize = 4;
    pub const PAD_BUTTONS_LEN: usize = 8;

    pub const TOUCH_POSITION: usize = 5;

    pub const DIAL_INDEX: usize = 3;
    pub const DIAL_DIRECTION: usize = 5;
    pub const DIAL_CW_BIT: u8 = 0x01;
    pub const DIAL_CCW_BIT: u8 = 0x02;
}

/// Byte offsets in normalized reports.
pub mod normalized_layout {
    pub const REPORT_ID: usize = 0;

    pub const STYLUS_FLAGS: usize = 1;
    pub const STYLUS_X: usize = 2;
    pub const STYLUS_Y: usize = 5;
    pub const STYLUS_PRESSURE: usize = 8;
    pub const STYLUS_X_TILT: usize = 10;
    pub const STYLUS_Y_TILT: usize = 11;

    /// Fake barrel switch byte of the pad and dial reports, always zero.
    pub const FAKE_BUTTONS: usize = 1;
    pub const FAKE_X: usize = 2;
    pub const FAKE_Y: usize = 3;

    pub const PAD_BUTTONS: usize = 4;
    pub const PAD_BUTTONS_LEN: usize = 8;

    pub const DIAL_DELTA_1: usize = 5;
    pub const DIAL_DELTA_2: usize = 6;
}

const _: () = {
    use normalized_layout as n;
    use vendor_layout as v;

    assert!(v::STYLUS_Y_TILT + 1 == REPORT_SIZE);
    assert!(v::PAD_BUTTONS + v::PAD_BUTTONS_LEN == REPORT_SIZE);
    assert!(v::TOUCH_POSITION < REPORT_SIZE);
    assert!(v::DIAL_DIRECTION < REPORT_SIZE);

    assert!(n::STYLUS_X + 3 == n::STYLUS_Y);
    assert!(n::STYLUS_Y + 3 == n::STYLUS_PRESSURE);
    assert!(n::STYLUS_PRESSURE + 2 == n::STYLUS_X_TILT);
    assert!(n::STYLUS_Y_TILT + 1 == REPORT_SIZE);
    assert!(n::PAD_BUTTONS + n::PAD_BUTTONS_LEN == REPORT_SIZE);
    assert!(n::DIAL_DELTA_2 < REPORT_SIZE);
};

/// Whether a firmware sub-types its reports with a discriminant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFamily {
    /// Stylus, pad, touch strip and dial.
    Primary,
    /// Stylus and pad only.
    Secondary,
}

impl ReportFamily {
    pub fn has_touch_and_dial(self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// Stylus switch and proximity bits. Unnamed bits are carried through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StylusFlags(pub u8);

impl StylusFlags {
    pub const TIP_SWITCH: u8 = 0x01;
    pub const BARREL_SWITCH: u8 = 0x02;
    pub const SECONDARY_BARREL_SWITCH: u8 = 0x04;
    pub const IN_RANGE: u8 = 0x80;

    pub fn tip_switch(self) -> bool {
        self.0 & Self::TIP_SWITCH != 0
    }

    pub fn barrel_switch(self) -> bool {
        self.0 & Self::BARREL_SWITCH != 0
    }

    pub fn secondary_barrel_switch(self) -> bool {
        self.0 & Self::SECONDARY_BARREL_SWITCH != 0
    }

    pub fn in_range(self) -> bool {
        self.0 & Self::IN_RANGE != 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

/// Stylus values shared by the vendor and normalized layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StylusSample {
    pub flags: StylusFlags,
    /// 24-bit.
    pub x: u32,
    /// 24-bit.
    pub y: u32,
    pub pressure: u16,
    pub x_tilt: i8,
    pub y_tilt: i8,
}

/// A decoded vendor report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorReport {
    Stylus(StylusSample),
    Pad { buttons: [u8; 8] },
    Touch { position: u8 },
    Dial { index: u8, clockwise: bool, counter_clockwise: bool },
}

fn le16(raw: &[u8; REPORT_SIZE], offset: usize) -> u16 {
    let lo = raw.get(offset).copied().unwrap_or(0);
    let hi = raw.get(offset + 1).copied().unwrap_or(0);
    u16::from_le_bytes([lo, hi])
}

fn byte(raw: &[u8; REPORT_SIZE], offset: usize) -> u8 {
    raw.get(offset).copied().unwrap_or(0)
}

impl VendorReport {
    /// Decode a vendor report. Returns `None` for any report id other than
    /// [`report_ids::VENDOR`]; no other byte is read in that case.
    pub fn decode(raw: &[u8; REPORT_SIZE], family: ReportFamily) -> Option<Self> {
        use vendor_layout as v;

        if byte(raw, v::REPORT_ID) != report_ids::VENDOR {
            return None;
        }

        let discriminant = byte(raw, v::DISCRIMINANT);
        let report = match discriminant {
            discriminants::PAD => {
                let mut buttons = [0u8; v::PAD_BUTTONS_LEN];
                if let Some(src) = raw.get(v::PAD_BUTTONS..v::PAD_BUTTONS + v::PAD_BUTTONS_LEN) {
                    buttons.copy_from_slice(src);
                }
                Self::Pad { buttons }
            }
            discriminants::TOUCH if family.has_touch_and_dial() => Self::Touch {
                position: byte(raw, v::TOUCH_POSITION),
            },
            discriminants::DIAL if family.has_touch_and_dial() => {
                let direction = byte(raw, v::DIAL_DIRECTION);
                Self::Dial {
                    index: byte(raw, v::DIAL_INDEX),
                    clockwise: direction & v::DIAL_CW_BIT != 0,
                    counter_clockwise: direction & v::DIAL_CCW_BIT != 0,
                }
            }
            _ => Self::Stylus(StylusSample {
                flags: StylusFlags(byte(raw, v::STYLUS_FLAGS)),
                x: u32::from(le16(raw, v::STYLUS_X_LOW))
                    | (u32::from(byte(raw, v::STYLUS_X_HIGH)) << 16),
                y: u32::from(le16(raw, v::STYLUS_Y_LOW))
                    | (u32::from(byte(raw, v::STYLUS_Y_HIGH)) << 16),
                pressure: le16(raw, v::STYLUS_PRESSURE),
                x_tilt: i8::from_le_bytes([byte(raw, v::STYLUS_X_TILT)]),
                y_tilt: i8::from_le_bytes([byte(raw, v::STYLUS_Y_TILT)]),
            }),
        };
        Some(report)
    }
}

/// A report in the layout the synthesized descriptor advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedReport {
    Stylus(StylusSample),
    Pad { buttons: [u8; 8] },
    /// `delta_1` is the Wheel usage, `delta_2` the Dial usage.
    Dial { delta_1: i8, delta_2: i8 },
}

impl NormalizedReport {
    pub fn report_id(&self) -> u8 {
        match self {
            Self::Stylus(_) => report_ids::STYLUS,
            Self::Pad { .. } => report_ids::PAD,
            Self::Dial { .. } => report_ids::DIAL,
        }
    }

    /// Encode into `out`, zeroing it first. Returns the report length.
    pub fn encode_into(&self, out: &mut [u8; REPORT_SIZE]) -> usize {
        use normalized_layout as n;

        out.fill(0);
        out[n::REPORT_ID] = self.report_id();

        match self {
            Self::Stylus(sample) => {
                out[n::STYLUS_FLAGS] = sample.flags.bits();
                put_le24(out, n::STYLUS_X, sample.x);
                put_le24(out, n::STYLUS_Y, sample.y);
                let [lo, hi] = sample.pressure.to_le_bytes();
                out[n::STYLUS_PRESSURE] = lo;
                out[n::STYLUS_PRESSURE + 1] = hi;
                out[n::STYLUS_X_TILT] = sample.x_tilt.to_le_bytes()[0];
                out[n::STYLUS_Y_TILT] = sample.y_tilt.to_le_bytes()[0];
            }
            Self::Pad { buttons } => {
                if let Some(dst) = out.get_mut(n::PAD_BUTTONS..n::PAD_BUTTONS + n::PAD_BUTTONS_LEN) {
                    dst.copy_from_slice(buttons);
                }
            }
            Self::Dial { delta_1, delta_2 } => {
                out[n::DIAL_DELTA_1] = delta_1.to_le_bytes()[0];
                out[n::DIAL_DELTA_2] = delta_2.to_le_bytes()[0];
            }
        }

        REPORT_SIZE
    }

    pub fn to_bytes(&self) -> [u8; REPORT_SIZE] {
        let mut out = [0u8; REPORT_SIZE];
        self.encode_into(&mut out);
        out
    }
}

fn put_le24(out: &mut [u8; REPORT_SIZE], offset: usize, value: u32) {
    let [b0, b1, b2, _] = value.to_le_bytes();
    if let Some(dst) = out.get_mut(offset..offset + 3) {
        dst.copy_from_slice(&[b0, b1, b2]);
    }
}
