//! Per-report rewrite of vendor reports into the normalized layout.
//!
//! Runs once per input report: no allocation, no logging, fixed cost.

use std::fmt;
use std::mem;

use crate::report::{NormalizedReport, REPORT_SIZE, ReportFamily, VendorReport};

/// Jumps of at least this many strip positions are read as a wrap-around.
pub const TOUCH_WRAP_THRESHOLD: u8 = 4;

/// Rewrite state for one attached device. Create one per device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteState {
    /// Last absolute touch strip position, 0 when the finger is lifted.
    pub last_touch_position: u8,
}

impl RewriteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn an absolute strip position into a one-step wheel movement.
    ///
    /// State is updated before the boundary check, so a lift (`0`) or the
    /// first touch after one yields `None` but still records `position`.
    pub fn touch_to_wheel(&mut self, position: u8) -> Option<i8> {
        let last = mem::replace(&mut self.last_touch_position, position);
        if position == 0 || last == 0 {
            return None;
        }

        // Small forward steps and large backward jumps both count as
        // decreasing. Kept as the firmware vendor's driver behaves.
        let small_step = position.abs_diff(last) < TOUCH_WRAP_THRESHOLD;
        let decreasing = (position > last) ^ small_step;
        Some(if decreasing { -1 } else { 1 })
    }
}

/// Why a report produced no normalized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropped {
    /// Leading byte was not the vendor report id.
    ForeignReportId(u8),
    /// Touch strip report without a previous position to compare against.
    TouchBoundary,
}

impl fmt::Display for Dropped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignReportId(id) => write!(f, "foreign report id 0x{id:02x}"),
            Self::TouchBoundary => f.write_str("touch strip boundary"),
        }
    }
}

/// Rewrites reports for one report family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRewriter {
    family: ReportFamily,
}

impl ReportRewriter {
    pub fn new(family: ReportFamily) -> Self {
        Self { family }
    }

    pub fn family(&self) -> ReportFamily {
        self.family
    }

    /// Rewrite one raw vendor report.
    ///
    /// # Errors
    ///
    /// [`Dropped`] when the report must not be forwarded.
    pub fn rewrite(
        &self,
        raw: &[u8; REPORT_SIZE],
        state: &mut RewriteState,
    ) -> Result<NormalizedReport, Dropped> {
        let Some(report) = VendorReport::decode(raw, self.family) else {
            return Err(Dropped::ForeignReportId(raw[0]));
        };

        match report {
            VendorReport::Stylus(sample) => Ok(NormalizedReport::Stylus(sample)),
            VendorReport::Pad { buttons } => Ok(NormalizedReport::Pad { buttons }),
            VendorReport::Touch { position } => state
                .touch_to_wheel(position)
                .map(|delta| NormalizedReport::Dial {
                    delta_1: delta,
                    delta_2: 0,
                })
                .ok_or(Dropped::TouchBoundary),
            VendorReport::Dial {
                index,
                clockwise,
                counter_clockwise,
            } => {
                let delta = i8::from(clockwise) - i8::from(counter_clockwise);
                let (delta_1, delta_2) = match index {
                    1 => (delta, 0),
                    2 => (0, delta),
                    _ => (0, 0),
                };
                Ok(NormalizedReport::Dial { delta_1, delta_2 })
            }
        }
    }

    /// Rewrite `raw` into `out`. On [`Dropped`], `out` is left untouched.
    ///
    /// # Errors
    ///
    /// [`Dropped`] when the report must not be forwarded.
    pub fn rewrite_into(
        &self,
        raw: &[u8; REPORT_SIZE],
        state: &mut RewriteState,
        out: &mut [u8; REPORT_SIZE],
    ) -> Result<(), Dropped> {
        let report = self.rewrite(raw, state)?;
        report.encode_into(out);
        Ok(())
    }
}
