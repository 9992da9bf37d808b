//! CLI module for chatmod.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Settings inspection
//! - Replay of recorded click scripts
//!
//! # Usage
//!
//! ```ignore
//! use chatmod::cli::{parse_args, run_cli_command};
//!
//! let args = parse_args(std::env::args());
//! run_cli_command(args)?;
//! ```

pub mod args;
pub mod replay;
pub mod version;

pub use args::{parse_args, CliArgs, CliCommand, USAGE};
pub use replay::{parse_script, replay, PrintingExecutor, ReplayEvent, ReplayReport, ReplayStep};
pub use version::{handle_version_command, VERSION};

use std::path::Path;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

use crate::config::Settings;
use crate::logging;

/// Run a parsed command line.
pub fn run_cli_command(args: CliArgs) -> Result<()> {
    match args.command {
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(message) => Err(eyre!("{}\n\n{}", message, USAGE)),
        CliCommand::PrintConfig => {
            let settings = load_settings(args.config.as_deref())?;
            let json = settings
                .to_json_pretty()
                .wrap_err("Failed to serialize settings")?;
            println!("{}", json);
            Ok(())
        }
        CliCommand::Replay(script) => {
            let settings = load_settings(args.config.as_deref())?;
            handle_replay_command(&script, &settings)
        }
    }
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let (settings, source) = Settings::resolve(explicit).wrap_err("Failed to load settings")?;
    logging::init(&settings.log_filter);
    tracing::debug!(source = ?source, "Settings loaded");
    Ok(settings)
}

fn handle_replay_command(script: &Path, settings: &Settings) -> Result<()> {
    let json = std::fs::read_to_string(script)
        .wrap_err(format!("Failed to read script {:?}", script))?;
    let steps = parse_script(&json).wrap_err(format!("Failed to parse script {:?}", script))?;

    let executor = PrintingExecutor::new();
    let report = replay(&steps, settings.click.clone(), &executor);

    tracing::info!(
        events = report.events,
        clicks = report.clicks,
        prevented = report.prevented,
        executed = report.executed,
        "Replay finished"
    );
    Ok(())
}
