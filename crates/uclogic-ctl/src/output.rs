//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use serde::Serialize;
use serde_json::json;

use crate::commands::check::CheckReport;
use crate::commands::info::InfoReport;
use crate::commands::replay::{ReplayEvent, ReplaySummary};
use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match error.downcast_ref::<CliError>() {
        Some(CliError::Unsupported(_)) => "unsupported",
        Some(CliError::Classification(_)) => "classification",
        Some(CliError::InvalidDeviceInfo(_)) => "invalid_device_info",
        Some(CliError::InvalidRecording { .. }) => "invalid_recording",
        Some(CliError::Io(_)) => "io",
        Some(CliError::Json(_)) => "json",
        Some(CliError::Yaml(_)) => "yaml",
        None => "other",
    }
}

/// `{"success": true, <key>: <value>}`
fn print_success_json(key: &str, value: &impl Serialize) {
    let output = json!({
        "success": true,
        key: value,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format {} as JSON: {}", key, e),
    }
}

pub fn print_info(report: &InfoReport, json: bool) {
    if json {
        print_success_json("device", report);
        return;
    }

    let name = report.name.as_deref().unwrap_or("unknown tablet");
    println!(
        "{} {} ({})",
        "Firmware:".bold(),
        name.bold(),
        report.firmware_id.dimmed()
    );
    println!("  Family: {:?}", report.family);
    println!("  {}", report.capabilities);
    println!("  Button layout: {:?}", report.layout);
    println!("  Replacement descriptor: {} bytes", report.descriptor_len);
}

pub fn print_descriptor(line: &str, mode: &str, json: bool) {
    if json {
        print_success_json("descriptor", &json!({ "mode": mode, "hid_decode": line }));
    } else {
        println!("{}", line);
    }
}

pub fn print_replay_event(event: &ReplayEvent) {
    match event {
        ReplayEvent::Rewritten { line, .. } | ReplayEvent::Unchanged { line, .. } => {
            println!("{}", line)
        }
        ReplayEvent::Dropped { .. } => println!("# No event"),
    }
}

pub fn print_replay_json(events: &[ReplayEvent], summary: &ReplaySummary) {
    let output = json!({
        "success": true,
        "events": events,
        "summary": summary,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format replay as JSON: {}", e),
    }
}

pub fn print_check(report: &CheckReport, json: bool) {
    if json {
        print_success_json("check", report);
        return;
    }

    let mark = |ok: Option<bool>| match ok {
        Some(true) => "✓".green(),
        Some(false) => "✗".red(),
        None => "-".dimmed(),
    };
    println!(
        "  {} Firmware {}",
        mark(Some(report.firmware_supported)),
        report.firmware_id
    );
    if let Some(usb) = &report.usb_id {
        println!(
            "  {} USB device {:04x}:{:04x}",
            mark(report.device_supported),
            usb.vendor_id,
            usb.product_id
        );
    }
    if report.forced {
        println!("  {}", "⚠ Allowlist check overridden with --force".yellow());
    } else {
        println!("  {}", "Device supported".green());
    }
}
