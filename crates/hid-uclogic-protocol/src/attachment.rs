//! One attached interface, from descriptor fixup to detach.
//!
//! The host layer creates a [`DeviceAttachment`] when the interface is
//! probed, serves [`DeviceAttachment::replacement_descriptor`] in place of
//! the device's own, then passes every raw event through
//! [`DeviceAttachment::handle_event`]. Dropping the attachment is the detach.

use tracing::info;

use crate::capabilities::DeviceCapabilities;
use crate::classify::{Classification, DeviceProperties, classify};
use crate::descriptor::{DISABLED_DESCRIPTOR, SynthesizedDescriptor, synthesize};
use crate::report::{REPORT_SIZE, ReportFamily};
use crate::rewrite::{Dropped, ReportRewriter, RewriteState};
use crate::UclogicResult;

/// HID report direction, as the host tags each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Input,
    Output,
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentMode {
    Normalize,
    Disabled,
}

/// What the host should do with an event after [`DeviceAttachment::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// Forward the buffer as it was.
    Unchanged,
    /// The first `n` bytes were replaced; forward them.
    Rewritten(usize),
    /// Discard the event.
    Dropped(Dropped),
}

#[derive(Debug, Clone)]
enum Replacement {
    Synthesized {
        caps: DeviceCapabilities,
        descriptor: SynthesizedDescriptor,
    },
    Disabled,
}

/// Per-device state. Each attached interface owns its own.
#[derive(Debug, Clone)]
pub struct DeviceAttachment {
    replacement: Replacement,
    rewriter: ReportRewriter,
    state: RewriteState,
}

impl DeviceAttachment {
    /// Classify the interface and prepare its replacement descriptor.
    ///
    /// # Errors
    ///
    /// Any classification error; the host should leave the interface alone.
    pub fn attach(
        props: &DeviceProperties,
        rdesc: &[u8],
        family: ReportFamily,
    ) -> UclogicResult<Self> {
        let replacement = match classify(props, rdesc)? {
            Classification::Normalize(caps) => {
                let descriptor = synthesize(&caps);
                info!(
                    "Normalizing interface with {:?} button layout ({} byte descriptor)",
                    descriptor.layout(),
                    descriptor.len()
                );
                Replacement::Synthesized { caps, descriptor }
            }
            Classification::Disable => {
                info!("Disabling duplicate interface");
                Replacement::Disabled
            }
        };

        Ok(Self {
            replacement,
            rewriter: ReportRewriter::new(family),
            state: RewriteState::new(),
        })
    }

    pub fn mode(&self) -> AttachmentMode {
        match self.replacement {
            Replacement::Synthesized { .. } => AttachmentMode::Normalize,
            Replacement::Disabled => AttachmentMode::Disabled,
        }
    }

    pub fn replacement_descriptor(&self) -> &[u8] {
        match &self.replacement {
            Replacement::Synthesized { descriptor, .. } => descriptor.as_bytes(),
            Replacement::Disabled => &DISABLED_DESCRIPTOR,
        }
    }

    /// Capabilities of a normalized interface.
    pub fn capabilities(&self) -> Option<&DeviceCapabilities> {
        match &self.replacement {
            Replacement::Synthesized { caps, .. } => Some(caps),
            Replacement::Disabled => None,
        }
    }

    pub fn family(&self) -> ReportFamily {
        self.rewriter.family()
    }

    pub fn state(&self) -> &RewriteState {
        &self.state
    }

    /// Rewrite one raw event in place.
    ///
    /// Only input reports of at least [`REPORT_SIZE`] bytes on a normalized
    /// interface are touched. Bytes past the report are left as they were.
    pub fn handle_event(&mut self, report_type: ReportType, data: &mut [u8]) -> EventAction {
        if report_type != ReportType::Input || self.mode() == AttachmentMode::Disabled {
            return EventAction::Unchanged;
        }
        let Some(report) = data.first_chunk_mut::<REPORT_SIZE>() else {
            return EventAction::Unchanged;
        };

        let raw = *report;
        match self.rewriter.rewrite_into(&raw, &mut self.state, report) {
            Ok(()) => EventAction::Rewritten(REPORT_SIZE),
            Err(reason) => EventAction::Dropped(reason),
        }
    }
}
