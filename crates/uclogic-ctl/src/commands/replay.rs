//! `replay`: feed a hid-recorder capture through one attachment

use std::io::{self, Read};
use std::path::Path;

use anyhow::Result;
use hid_uclogic_protocol::{
    DeviceAttachment, EventAction, ReportType, VENDOR_INTERFACE_SIGNATURE,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::DeviceArgs;
use crate::config::Config;
use crate::dump;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ReplayEvent {
    Rewritten { timestamp: String, line: String },
    Unchanged { timestamp: String, line: String },
    Dropped { timestamp: String, reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub rewritten: usize,
    pub unchanged: usize,
    pub dropped: usize,
}

pub fn execute(args: &DeviceArgs, input: Option<&Path>, config: &Config, json: bool) -> Result<()> {
    let device = args.load(config)?;
    let mut attachment =
        DeviceAttachment::attach(&device.props, &VENDOR_INTERFACE_SIGNATURE, device.family)
            .map_err(CliError::from)?;

    let text = match input {
        Some(path) => std::fs::read_to_string(path).map_err(CliError::from)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(CliError::from)?;
            text
        }
    };

    let (events, summary) = replay(&mut attachment, &text)?;
    info!(
        "Replayed {} events: {} rewritten, {} unchanged, {} dropped",
        events.len(),
        summary.rewritten,
        summary.unchanged,
        summary.dropped
    );

    if json {
        output::print_replay_json(&events, &summary);
    } else {
        events.iter().for_each(output::print_replay_event);
    }
    Ok(())
}

/// Run every `E:` line of `text` through `attachment`, in order.
pub fn replay(
    attachment: &mut DeviceAttachment,
    text: &str,
) -> Result<(Vec<ReplayEvent>, ReplaySummary), CliError> {
    let mut events = Vec::new();
    let mut summary = ReplaySummary::default();

    for (index, line) in text.lines().enumerate() {
        let Some(mut event) = dump::parse_event_line(line, index + 1)? else {
            continue;
        };

        let replayed = match attachment.handle_event(ReportType::Input, &mut event.data) {
            EventAction::Rewritten(_) => {
                summary.rewritten += 1;
                ReplayEvent::Rewritten {
                    line: dump::format_event(&event.timestamp, &event.data),
                    timestamp: event.timestamp,
                }
            }
            EventAction::Unchanged => {
                summary.unchanged += 1;
                ReplayEvent::Unchanged {
                    line: dump::format_event(&event.timestamp, &event.data),
                    timestamp: event.timestamp,
                }
            }
            EventAction::Dropped(reason) => {
                debug!("Dropped event at {}: {}", event.timestamp, reason);
                summary.dropped += 1;
                ReplayEvent::Dropped {
                    timestamp: event.timestamp,
                    reason: reason.to_string(),
                }
            }
        };
        events.push(replayed);
    }

    Ok((events, summary))
}
