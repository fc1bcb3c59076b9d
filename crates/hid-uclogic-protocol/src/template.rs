//! Declarative report descriptor templates.
//!
//! A template is an ordered list of literal byte runs and named integer
//! fields. [`CompiledTemplate::compile`] lays the list out once, in a const
//! context, producing the blueprint bytes together with the offset and width
//! of every field. Per-device descriptors are produced by copying the
//! blueprint and patching the fields, so offsets are never recomputed.

/// Byte written into field slots of an uninstantiated blueprint.
pub const PLACEHOLDER: u8 = 0xFF;

/// Number of distinct [`FieldName`]s.
pub const FIELD_COUNT: usize = 10;

/// Little-endian width of a template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    U8,
    U16,
    U32,
}

impl FieldWidth {
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }
}

/// Named slots patched per device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    LogicalMaxX,
    PhysicalMaxX,
    LogicalMaxY,
    PhysicalMaxY,
    LogicalMaxPressure,
    PrimaryButtonUsageMax,
    PrimaryButtonCount,
    SecondaryButtonUsageMax,
    SecondaryButtonCount,
    PaddingButtonCount,
}

impl FieldName {
    pub const ALL: [FieldName; FIELD_COUNT] = [
        Self::LogicalMaxX,
        Self::PhysicalMaxX,
        Self::LogicalMaxY,
        Self::PhysicalMaxY,
        Self::LogicalMaxPressure,
        Self::PrimaryButtonUsageMax,
        Self::PrimaryButtonCount,
        Self::SecondaryButtonUsageMax,
        Self::SecondaryButtonCount,
        Self::PaddingButtonCount,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One entry of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateItem {
    /// Literal descriptor bytes.
    Bytes(&'static [u8]),
    /// A per-device value of the given width.
    Field(FieldName, FieldWidth),
    /// A nested list, laid out in place. Lets templates share collections.
    Section(&'static [TemplateItem]),
}

/// Position of a field inside a compiled template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub offset: usize,
    pub width: FieldWidth,
}

/// Total byte length of `items` once laid out.
pub const fn template_len(items: &[TemplateItem]) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < items.len() {
        len += match items[i] {
            TemplateItem::Bytes(bytes) => bytes.len(),
            TemplateItem::Field(_, width) => width.bytes(),
            TemplateItem::Section(section) => template_len(section),
        };
        i += 1;
    }
    len
}

/// A laid-out template: blueprint bytes plus the slot table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate<const N: usize> {
    bytes: [u8; N],
    slots: [Option<FieldSlot>; FIELD_COUNT],
}

impl<const N: usize> CompiledTemplate<N> {
    /// Lay out `items`. Meant to initialise a `static` or `const`, where a
    /// bad template stops the build.
    ///
    /// # Panics
    ///
    /// If `N` differs from [`template_len`] of `items`, or if a field is
    /// named more than once.
    pub const fn compile(items: &[TemplateItem]) -> Self {
        assert!(
            template_len(items) == N,
            "template length does not match its storage"
        );
        let mut template = Self {
            bytes: [PLACEHOLDER; N],
            slots: [None; FIELD_COUNT],
        };
        let end = template.lay_out(items, 0);
        assert!(end == N, "template layout did not fill its storage");
        template
    }

    const fn lay_out(&mut self, items: &[TemplateItem], mut cursor: usize) -> usize {
        let mut i = 0;
        while i < items.len() {
            match items[i] {
                TemplateItem::Bytes(bytes) => {
                    let mut j = 0;
                    while j < bytes.len() {
                        self.bytes[cursor] = bytes[j];
                        cursor += 1;
                        j += 1;
                    }
                }
                TemplateItem::Field(name, width) => {
                    assert!(
                        self.slots[name.index()].is_none(),
                        "template field appears more than once"
                    );
                    self.slots[name.index()] = Some(FieldSlot {
                        offset: cursor,
                        width,
                    });
                    // Blueprint already holds PLACEHOLDER here.
                    cursor += width.bytes();
                }
                TemplateItem::Section(section) => {
                    cursor = self.lay_out(section, cursor);
                }
            }
            i += 1;
        }
        cursor
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Blueprint bytes, with [`PLACEHOLDER`] in every field slot.
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn slot(&self, field: FieldName) -> Option<FieldSlot> {
        self.slots.get(field.index()).copied().flatten()
    }

    pub fn has_field(&self, field: FieldName) -> bool {
        self.slot(field).is_some()
    }

    /// Start a per-device copy of the blueprint.
    pub fn instantiate(&self) -> TemplateInstance<'_, N> {
        TemplateInstance {
            template: self,
            bytes: self.bytes,
            assigned: [false; FIELD_COUNT],
        }
    }
}

/// A blueprint copy being filled in for one device.
#[derive(Debug, Clone)]
pub struct TemplateInstance<'a, const N: usize> {
    template: &'a CompiledTemplate<N>,
    bytes: [u8; N],
    assigned: [bool; FIELD_COUNT],
}

impl<const N: usize> TemplateInstance<'_, N> {
    /// Write `value` into `field`, keeping only the low bytes the slot holds.
    /// Fields the template does not contain are ignored.
    pub fn set(&mut self, field: FieldName, value: u32) -> &mut Self {
        let Some(slot) = self.template.slot(field) else {
            return self;
        };
        let width = slot.width.bytes();
        let le = value.to_le_bytes();
        if let (Some(dst), Some(src)) = (
            self.bytes.get_mut(slot.offset..slot.offset + width),
            le.get(..width),
        ) {
            dst.copy_from_slice(src);
            if let Some(flag) = self.assigned.get_mut(field.index()) {
                *flag = true;
            }
        }
        self
    }

    pub fn has_field(&self, field: FieldName) -> bool {
        self.template.has_field(field)
    }

    /// Template fields that have not been written yet.
    pub fn unassigned(&self) -> impl Iterator<Item = FieldName> + '_ {
        FieldName::ALL.into_iter().filter(|field| {
            let assigned = self.assigned.get(field.index()).copied().unwrap_or(false);
            self.template.has_field(*field) && !assigned
        })
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    pub fn into_bytes(self) -> [u8; N] {
        self.bytes
    }
}
