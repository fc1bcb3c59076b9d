//! uclogic-ctl - UC-Logic tablet inspection CLI
//!
//! Stands in for the host side of the tablet normalizer: reads the
//! device-info file the mode switcher writes, shows what the protocol crate
//! makes of it, and replays hid-recorder captures through the rewrite engine.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod device_info;
mod dump;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{DeviceArgs, parse_usb_id};
use crate::config::{Config, UsbId};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "uclogic-ctl")]
#[command(about = "UC-Logic tablet tools - inspect capabilities, descriptors and report rewriting")]
#[command(version)]
#[command(long_about = "
uclogic-ctl works on the device-info files written when a Huion or Gaomon
UC-Logic v2 tablet is switched into vendor mode. It prints the decoded
capabilities, the replacement report descriptor, and replays hid-recorder
captures through the same rewrite engine the driver uses.

Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML file extending the supported device and firmware lists
    #[arg(long, global = true, env = "UCLOGIC_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the capability string and print the tablet's capabilities
    Info {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Print the replacement report descriptor (hid-decode format)
    Descriptor {
        #[command(flatten)]
        device: DeviceArgs,

        /// Original descriptor of the interface (binary or `R:` line);
        /// the vendor interface is assumed when omitted
        #[arg(long, value_name = "FILE")]
        rdesc: Option<PathBuf>,
    },

    /// Rewrite the events of a hid-recorder capture
    Replay {
        #[command(flatten)]
        device: DeviceArgs,

        /// Recording to read instead of stdin
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Check firmware and USB id against the allowlist
    Check {
        #[command(flatten)]
        device: DeviceArgs,

        /// USB vendor id, hex
        #[arg(long, value_parser = parse_usb_id, requires = "pid")]
        vid: Option<u16>,

        /// USB product id, hex
        #[arg(long, value_parser = parse_usb_id, requires = "vid")]
        pid: Option<u16>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("uclogic_ctl={log_level},hid_uclogic_protocol={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = execute_command(&cli);

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Info { device } => commands::info::execute(device, &config, cli.json),
        Commands::Descriptor { device, rdesc } => {
            commands::descriptor::execute(device, rdesc.as_deref(), &config, cli.json)
        }
        Commands::Replay { device, input } => {
            commands::replay::execute(device, input.as_deref(), &config, cli.json)
        }
        Commands::Check { device, vid, pid } => {
            let usb_id = vid.zip(*pid).map(|(vendor_id, product_id)| UsbId {
                vendor_id,
                product_id,
            });
            commands::check::execute(device, usb_id, &config, cli.json)
        }
        Commands::Completion { .. } => Ok(()),
    }
}
