//! Replacement report descriptors.
//!
//! Both templates advertise the same three application collections
//! (stylus, pad, dial) and differ only in how the pad buttons are grouped.

use crate::capabilities::DeviceCapabilities;
use crate::report::report_ids;
use crate::template::{
    CompiledTemplate, FieldName, FieldWidth, TemplateInstance, TemplateItem, template_len,
};

/// Buttons that fit the single usage range of the compact layout.
pub const COMPACT_BUTTON_LIMIT: u8 = 10;

/// Largest button count the two usage ranges can describe.
pub const MAX_SUPPORTED_BUTTONS: u8 = 25;

/// Width of the pad report's button bitmap.
pub const TOTAL_BUTTON_BITS: u8 = 64;

// Stylus: flags byte, 24-bit X/Y, 16-bit pressure, two tilt bytes.
static STYLUS_COLLECTION: &[TemplateItem] = &[
    TemplateItem::Bytes(&[
        0x05, 0x0d, // Usage Page (Digitizers)
        0x09, 0x01, // Usage (Digitizer)
        0xa1, 0x01, // Collection (Application)
        0x85, report_ids::STYLUS, // Report ID
        0x09, 0x20, // Usage (Stylus)
        0xa1, 0x00, // Collection (Physical)
        0x15, 0x00, // Logical Minimum (0)
        0x25, 0x01, // Logical Maximum (1)
        0x75, 0x01, // Report Size (1)
        0x09, 0x42, // Usage (Tip Switch)
        0x09, 0x44, // Usage (Barrel Switch)
        0x09, 0x5a, // Usage (Secondary Barrel Switch)
        0x95, 0x03, // Report Count (3)
        0x81, 0x02, // Input (Data,Var,Abs)
        0x95, 0x04, // Report Count (4)
        0x81, 0x01, // Input (Cnst)
        0x09, 0x32, // Usage (In Range)
        0x95, 0x01, // Report Count (1)
        0x81, 0x02, // Input (Data,Var,Abs)
        0x75, 0x18, // Report Size (24)
        0x95, 0x01, // Report Count (1)
        0xa4, // Push
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x65, 0x11, // Unit (SI Linear: cm)
        0x55, 0x0c, // Unit Exponent (-4), micrometres
        0x17, 0x00, 0x00, 0x00, 0x00, // Logical Minimum (0)
        0x27, // Logical Maximum
    ]),
    TemplateItem::Field(FieldName::LogicalMaxX, FieldWidth::U32),
    TemplateItem::Bytes(&[
        0x37, 0x00, 0x00, 0x00, 0x00, // Physical Minimum (0)
        0x47, // Physical Maximum
    ]),
    TemplateItem::Field(FieldName::PhysicalMaxX, FieldWidth::U32),
    TemplateItem::Bytes(&[
        0x09, 0x30, // Usage (X)
        0x81, 0x02, // Input (Data,Var,Abs)
        0x17, 0x00, 0x00, 0x00, 0x00, // Logical Minimum (0)
        0x27, // Logical Maximum
    ]),
    TemplateItem::Field(FieldName::LogicalMaxY, FieldWidth::U32),
    TemplateItem::Bytes(&[
        0x37, 0x00, 0x00, 0x00, 0x00, // Physical Minimum (0)
        0x47, // Physical Maximum
    ]),
    TemplateItem::Field(FieldName::PhysicalMaxY, FieldWidth::U32),
    TemplateItem::Bytes(&[
        0x09, 0x31, // Usage (Y)
        0x81, 0x02, // Input (Data,Var,Abs)
        0xb4, // Pop
        0x16, 0x00, 0x00, // Logical Minimum (0)
        0x26, // Logical Maximum
    ]),
    TemplateItem::Field(FieldName::LogicalMaxPressure, FieldWidth::U16),
    TemplateItem::Bytes(&[
        0x09, 0x30, // Usage (Tip Pressure)
        0x75, 0x10, // Report Size (16)
        0x95, 0x01, // Report Count (1)
        0x81, 0x02, // Input (Data,Var,Abs)
        0x75, 0x08, // Report Size (8)
        0x95, 0x02, // Report Count (2)
        0xa4, // Push
        0x65, 0x14, // Unit (English Rotation: deg)
        0x55, 0x00, // Unit Exponent (0)
        0x15, 0xc4, // Logical Minimum (-60)
        0x35, 0xc4, // Physical Minimum (-60)
        0x25, 0x3c, // Logical Maximum (60)
        0x45, 0x3c, // Physical Maximum (60)
        0x09, 0x3d, // Usage (X Tilt)
        0x09, 0x3e, // Usage (Y Tilt)
        0x81, 0x02, // Input (Data,Var,Abs)
        0xb4, // Pop
        0xc0, // End Collection
        0xc0, // End Collection
    ]),
];

// Pad header: a fake barrel switch and X/Y so consumers treat the pad as
// part of a tablet, then the first button range.
static PAD_HEADER: &[TemplateItem] = &[
    TemplateItem::Bytes(&[
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x07, // Usage (Keypad)
        0xa1, 0x01, // Collection (Application)
        0x85, report_ids::PAD, // Report ID
        0x15, 0x00, // Logical Minimum (0)
        0x25, 0x01, // Logical Maximum (1)
        0x05, 0x0d, // Usage Page (Digitizers)
        0x09, 0x39, // Usage (Tablet Function Keys)
        0xa1, 0x00, // Collection (Physical)
        0x09, 0x44, // Usage (Barrel Switch)
        0x95, 0x01, // Report Count (1)
        0x75, 0x01, // Report Size (1)
        0x81, 0x02, // Input (Data,Var,Abs)
        0x95, 0x07, // Report Count (7)
        0x81, 0x01, // Input (Cnst)
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x30, // Usage (X)
        0x09, 0x31, // Usage (Y)
        0x95, 0x02, // Report Count (2)
        0x75, 0x08, // Report Size (8)
        0x81, 0x02, // Input (Data,Var,Abs)
        0xc0, // End Collection
        0x05, 0x09, // Usage Page (Button)
        0x19, 0x01, // Usage Minimum (1)
        0x29, // Usage Maximum
    ]),
    TemplateItem::Field(FieldName::PrimaryButtonUsageMax, FieldWidth::U8),
    TemplateItem::Bytes(&[
        0x95, // Report Count
    ]),
    TemplateItem::Field(FieldName::PrimaryButtonCount, FieldWidth::U8),
    TemplateItem::Bytes(&[
        0x75, 0x01, // Report Size (1)
        0x81, 0x02, // Input (Data,Var,Abs)
    ]),
];

static PAD_SECONDARY_BUTTONS: &[TemplateItem] = &[
    TemplateItem::Bytes(&[
        0x05, 0x01, // Usage Page (Generic Desktop)
        0x09, 0x05, // Usage (Gamepad)
        0x05, 0x09, // Usage Page (Button)
        0x19, 0x01, // Usage Minimum (1)
        0x29, // Usage Maximum
    ]),
    TemplateItem::Field(FieldName::SecondaryButtonUsageMax, FieldWidth::U8),
    TemplateItem::Bytes(&[
        0x95, // Report Count
    ]),
    TemplateItem::Field(FieldName::SecondaryButtonCount, FieldWidth::U8),
    TemplateItem::Bytes(&[
        0x81, 0x02, // Input (Data,Var,Abs)
    ]),
];

static PAD_TRAILER: &[TemplateItem] = &[
    TemplateItem::Bytes(&[
        0x95, // Report Count
    ]),
    TemplateItem::Field(FieldName::PaddingButtonCount, FieldWidth::U8),
    TemplateItem::Bytes(&[
        0x81, 0x01, // Input (Cnst)
        0xc0, // End Collection
    ]),
];

// Dial: same fake header as the pad, a padding byte, then Wheel (touch strip
// and first dial) and Dial (second dial) as signed relative bytes.
static DIAL_COLLECTION: &[TemplateItem] = &[TemplateItem::Bytes(&[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x07, // Usage (Keypad)
    0xa1, 0x01, // Collection (Application)
    0x85, report_ids::DIAL, // Report ID
    0x05, 0x0d, // Usage Page (Digitizers)
    0x09, 0x39, // Usage (Tablet Function Keys)
    0xa1, 0x00, // Collection (Physical)
    0x09, 0x44, // Usage (Barrel Switch)
    0x15, 0x00, // Logical Minimum (0)
    0x25, 0x01, // Logical Maximum (1)
    0x75, 0x01, // Report Size (1)
    0x95, 0x01, // Report Count (1)
    0x81, 0x02, // Input (Data,Var,Abs)
    0x95, 0x07, // Report Count (7)
    0x81, 0x01, // Input (Cnst)
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x30, // Usage (X)
    0x09, 0x31, // Usage (Y)
    0x75, 0x08, // Report Size (8)
    0x95, 0x02, // Report Count (2)
    0x81, 0x02, // Input (Data,Var,Abs)
    0x95, 0x01, // Report Count (1)
    0x81, 0x01, // Input (Cnst)
    0x09, 0x38, // Usage (Wheel)
    0x15, 0xff, // Logical Minimum (-1)
    0x25, 0x01, // Logical Maximum (1)
    0x95, 0x01, // Report Count (1)
    0x81, 0x06, // Input (Data,Var,Rel)
    0x09, 0x37, // Usage (Dial)
    0x81, 0x06, // Input (Data,Var,Rel)
    0x95, 0x05, // Report Count (5)
    0x81, 0x01, // Input (Cnst)
    0xc0, // End Collection
    0xc0, // End Collection
])];

static COMPACT_ITEMS: &[TemplateItem] = &[
    TemplateItem::Section(STYLUS_COLLECTION),
    TemplateItem::Section(PAD_HEADER),
    TemplateItem::Section(PAD_TRAILER),
    TemplateItem::Section(DIAL_COLLECTION),
];

static EXTENDED_ITEMS: &[TemplateItem] = &[
    TemplateItem::Section(STYLUS_COLLECTION),
    TemplateItem::Section(PAD_HEADER),
    TemplateItem::Section(PAD_SECONDARY_BUTTONS),
    TemplateItem::Section(PAD_TRAILER),
    TemplateItem::Section(DIAL_COLLECTION),
];

pub const COMPACT_LEN: usize = template_len(COMPACT_ITEMS);
pub const EXTENDED_LEN: usize = template_len(EXTENDED_ITEMS);

/// All buttons in one usage range.
pub static COMPACT_TEMPLATE: CompiledTemplate<COMPACT_LEN> =
    CompiledTemplate::compile(COMPACT_ITEMS);

/// First [`COMPACT_BUTTON_LIMIT`] buttons in one range, the rest under a
/// Gamepad usage.
pub static EXTENDED_TEMPLATE: CompiledTemplate<EXTENDED_LEN> =
    CompiledTemplate::compile(EXTENDED_ITEMS);

/// Substituted on interfaces that duplicate the vendor one: a single 64-byte
/// constant input report on a vendor page, so nothing is bound.
pub const DISABLED_DESCRIPTOR: [u8; 14] = [
    0x06, 0xff, 0xff, // Usage Page (Vendor Defined 0xFFFF)
    0x09, 0x01, // Usage (0x01)
    0xa1, 0x01, // Collection (Application)
    0x95, 0x40, // Report Count (64)
    0x75, 0x08, // Report Size (8)
    0x81, 0x01, // Input (Cnst)
    0xc0, // End Collection
];

/// Which template a device needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonLayout {
    Compact,
    Extended,
}

impl ButtonLayout {
    pub fn for_button_count(button_count: u8) -> Self {
        if button_count <= COMPACT_BUTTON_LIMIT {
            Self::Compact
        } else {
            Self::Extended
        }
    }
}

/// How the pad bitmap is divided between the usage ranges and padding.
///
/// `primary + secondary + padding` is always [`TOTAL_BUTTON_BITS`] for
/// counts up to [`MAX_SUPPORTED_BUTTONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonSplit {
    pub primary: u8,
    pub secondary: u8,
    pub padding: u8,
}

impl ButtonSplit {
    pub fn for_button_count(button_count: u8) -> Self {
        let count = button_count.min(MAX_SUPPORTED_BUTTONS);
        let (primary, secondary) = match ButtonLayout::for_button_count(count) {
            ButtonLayout::Compact => (count, 0),
            ButtonLayout::Extended => (COMPACT_BUTTON_LIMIT, count - COMPACT_BUTTON_LIMIT),
        };
        Self {
            primary,
            secondary,
            padding: TOTAL_BUTTON_BITS - count,
        }
    }

    pub fn total(&self) -> u8 {
        self.primary + self.secondary + self.padding
    }
}

/// A finished replacement descriptor for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesizedDescriptor {
    Compact([u8; COMPACT_LEN]),
    Extended([u8; EXTENDED_LEN]),
}

impl SynthesizedDescriptor {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Compact(bytes) => bytes.as_slice(),
            Self::Extended(bytes) => bytes.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn layout(&self) -> ButtonLayout {
        match self {
            Self::Compact(_) => ButtonLayout::Compact,
            Self::Extended(_) => ButtonLayout::Extended,
        }
    }

    /// Read back a patched field, for diagnostics and tests.
    pub fn field(&self, field: FieldName) -> Option<u32> {
        let slot = match self {
            Self::Compact(_) => COMPACT_TEMPLATE.slot(field),
            Self::Extended(_) => EXTENDED_TEMPLATE.slot(field),
        }?;
        let raw = self
            .as_bytes()
            .get(slot.offset..slot.offset + slot.width.bytes())?;
        let mut le = [0u8; 4];
        le.get_mut(..raw.len())?.copy_from_slice(raw);
        Some(u32::from_le_bytes(le))
    }
}

/// Build the replacement descriptor for `caps`.
///
/// Button counts above [`MAX_SUPPORTED_BUTTONS`] are rejected during
/// classification; here they are clamped so the bitmap stays 64 bits wide.
pub fn synthesize(caps: &DeviceCapabilities) -> SynthesizedDescriptor {
    let split = ButtonSplit::for_button_count(caps.button_count);

    match ButtonLayout::for_button_count(caps.button_count) {
        ButtonLayout::Compact => {
            let mut inst = COMPACT_TEMPLATE.instantiate();
            fill_common(&mut inst, caps, split);
            SynthesizedDescriptor::Compact(inst.into_bytes())
        }
        ButtonLayout::Extended => {
            let mut inst = EXTENDED_TEMPLATE.instantiate();
            fill_common(&mut inst, caps, split);
            inst.set(FieldName::SecondaryButtonUsageMax, u32::from(split.secondary))
                .set(FieldName::SecondaryButtonCount, u32::from(split.secondary));
            SynthesizedDescriptor::Extended(inst.into_bytes())
        }
    }
}

fn fill_common<const N: usize>(
    inst: &mut TemplateInstance<'_, N>,
    caps: &DeviceCapabilities,
    split: ButtonSplit,
) {
    inst.set(FieldName::LogicalMaxX, caps.logical_max_x)
        .set(FieldName::PhysicalMaxX, caps.physical_max_x())
        .set(FieldName::LogicalMaxY, caps.logical_max_y)
        .set(FieldName::PhysicalMaxY, caps.physical_max_y())
        .set(FieldName::LogicalMaxPressure, u32::from(caps.logical_max_pressure))
        .set(FieldName::PrimaryButtonUsageMax, u32::from(split.primary))
        .set(FieldName::PrimaryButtonCount, u32::from(split.primary))
        .set(FieldName::PaddingButtonCount, u32::from(split.padding));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::PLACEHOLDER;

    fn caps(button_count: u8) -> DeviceCapabilities {
        DeviceCapabilities {
            logical_max_x: 50800,
            logical_max_y: 31750,
            logical_max_pressure: 8191,
            resolution_units_per_mm: 200,
            button_count,
        }
    }

    #[test]
    fn test_template_lengths() {
        assert_eq!(EXTENDED_LEN, COMPACT_LEN + 14);
        assert_eq!(COMPACT_TEMPLATE.len(), COMPACT_LEN);
        assert!(EXTENDED_TEMPLATE.has_field(FieldName::SecondaryButtonCount));
        assert!(!COMPACT_TEMPLATE.has_field(FieldName::SecondaryButtonCount));
    }

    #[test]
    fn test_every_extended_field_present() {
        for field in FieldName::ALL {
            assert!(EXTENDED_TEMPLATE.has_field(field), "{field:?} missing");
        }
    }

    #[test]
    fn test_layout_choice() {
        assert_eq!(ButtonLayout::for_button_count(0), ButtonLayout::Compact);
        assert_eq!(ButtonLayout::for_button_count(10), ButtonLayout::Compact);
        assert_eq!(ButtonLayout::for_button_count(11), ButtonLayout::Extended);
        assert_eq!(synthesize(&caps(10)).layout(), ButtonLayout::Compact);
        assert_eq!(synthesize(&caps(11)).layout(), ButtonLayout::Extended);
    }

    #[test]
    fn test_button_split() {
        assert_eq!(
            ButtonSplit::for_button_count(8),
            ButtonSplit {
                primary: 8,
                secondary: 0,
                padding: 56
            }
        );
        assert_eq!(
            ButtonSplit::for_button_count(13),
            ButtonSplit {
                primary: 10,
                secondary: 3,
                padding: 51
            }
        );
        assert_eq!(ButtonSplit::for_button_count(25).total(), TOTAL_BUTTON_BITS);
    }

    #[test]
    fn test_compact_fields() {
        let desc = synthesize(&caps(8));
        assert_eq!(desc.field(FieldName::LogicalMaxX), Some(50800));
        assert_eq!(desc.field(FieldName::PhysicalMaxX), Some(254_000));
        assert_eq!(desc.field(FieldName::LogicalMaxY), Some(31750));
        assert_eq!(desc.field(FieldName::PhysicalMaxY), Some(158_750));
        assert_eq!(desc.field(FieldName::LogicalMaxPressure), Some(8191));
        assert_eq!(desc.field(FieldName::PrimaryButtonUsageMax), Some(8));
        assert_eq!(desc.field(FieldName::PrimaryButtonCount), Some(8));
        assert_eq!(desc.field(FieldName::PaddingButtonCount), Some(56));
        assert_eq!(desc.field(FieldName::SecondaryButtonCount), None);
    }

    #[test]
    fn test_extended_fields() {
        let desc = synthesize(&caps(13));
        assert_eq!(desc.field(FieldName::PrimaryButtonCount), Some(10));
        assert_eq!(desc.field(FieldName::SecondaryButtonUsageMax), Some(3));
        assert_eq!(desc.field(FieldName::SecondaryButtonCount), Some(3));
        assert_eq!(desc.field(FieldName::PaddingButtonCount), Some(51));
    }

    #[test]
    fn test_stylus_header_bytes() {
        let desc = synthesize(&caps(8));
        assert_eq!(
            desc.as_bytes().get(..8),
            Some(&[0x05, 0x0d, 0x09, 0x01, 0xa1, 0x01, 0x85, 0x08][..])
        );
    }

    #[test]
    fn test_no_placeholder_left_in_slots() {
        let desc = synthesize(&caps(0));
        for field in FieldName::ALL {
            if let Some(slot) = COMPACT_TEMPLATE.slot(field) {
                let bytes = desc.as_bytes().get(slot.offset..slot.offset + slot.width.bytes());
                assert!(
                    bytes.is_some_and(|b| b.iter().any(|&x| x != PLACEHOLDER)),
                    "{field:?} still holds placeholder bytes"
                );
            }
        }
    }

    #[test]
    fn test_disabled_descriptor_shape() {
        assert_eq!(DISABLED_DESCRIPTOR.first(), Some(&0x06));
        assert_eq!(DISABLED_DESCRIPTOR.last(), Some(&0xc0));
    }
}
