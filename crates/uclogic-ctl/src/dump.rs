//! hid-tools text formats: `R:` descriptor lines and `E:` event lines.

use crate::error::CliError;

/// One `E:` line from a hid-recorder capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub timestamp: String,
    pub data: Vec<u8>,
}

fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `R: <len> <hex bytes>`, as hid-decode prints a report descriptor.
pub fn format_descriptor(bytes: &[u8]) -> String {
    format!("R: {} {}", bytes.len(), spaced_hex(bytes))
}

pub fn format_event(timestamp: &str, data: &[u8]) -> String {
    format!("E: {} {} {}", timestamp, data.len(), spaced_hex(data))
}

/// Parse the bytes of an `R:` line.
pub fn parse_descriptor_line(line: &str) -> Result<Vec<u8>, CliError> {
    let invalid = |reason: String| CliError::InvalidRecording { line: 1, reason };
    let rest = line
        .trim()
        .strip_prefix("R:")
        .ok_or_else(|| invalid("expected an R: line".to_owned()))?;

    let mut fields = rest.split_whitespace();
    let len: usize = fields
        .next()
        .ok_or_else(|| invalid("missing length".to_owned()))?
        .parse()
        .map_err(|e| invalid(format!("bad length: {e}")))?;
    let data = decode_bytes(fields, 1)?;
    if data.len() != len {
        return Err(invalid(format!(
            "length says {len} bytes but {} present",
            data.len()
        )));
    }
    Ok(data)
}

fn decode_bytes<'a>(
    tokens: impl Iterator<Item = &'a str>,
    number: usize,
) -> Result<Vec<u8>, CliError> {
    tokens
        .map(|token| {
            let mut byte = [0u8; 1];
            hex::decode_to_slice(token, &mut byte)
                .map(|()| u8::from_be_bytes(byte))
                .map_err(|e| CliError::InvalidRecording {
                    line: number,
                    reason: format!("bad byte {token:?}: {e}"),
                })
        })
        .collect()
}

/// Parse one line of a recording. Lines other than `E:` events yield `None`.
pub fn parse_event_line(line: &str, number: usize) -> Result<Option<RecordedEvent>, CliError> {
    let Some(rest) = line.trim().strip_prefix("E:") else {
        return Ok(None);
    };
    let invalid = |reason: String| CliError::InvalidRecording {
        line: number,
        reason,
    };

    let mut fields = rest.split_whitespace();
    let timestamp = fields
        .next()
        .ok_or_else(|| invalid("missing timestamp".to_owned()))?
        .to_owned();
    let len: usize = fields
        .next()
        .ok_or_else(|| invalid("missing length".to_owned()))?
        .parse()
        .map_err(|e| invalid(format!("bad length: {e}")))?;

    let data = decode_bytes(fields, number)?;

    if data.len() != len {
        return Err(invalid(format!(
            "length says {len} bytes but {} present",
            data.len()
        )));
    }

    Ok(Some(RecordedEvent { timestamp, data }))
}
