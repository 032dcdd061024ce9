//! Main application entry point and high-level flow coordination.
//!
//! Parses the command line, applies the global flags and dispatches to the
//! handlers in `qibla::commands`. All domain logic lives in the library; this
//! file only decides which command runs and how a failure is reported.

use anyhow::Result;

use qibla::args::{self, CliAction, ParsedArgs};
use qibla::commands;
use qibla::config;
use qibla::constants::EXIT_FAILURE;
use qibla::logger::Log;
use qibla::{log_end, log_error_exit};

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Bearing { position } => commands::bearing::handle_bearing_command(position),
        CliAction::Times {
            position,
            date,
            timezone,
            at,
        } => commands::times::handle_times_command(position, date, timezone, at),
        CliAction::Replay { position, input } => {
            commands::replay::handle_replay_command(position, input)
        }
        CliAction::SetLocation {
            latitude,
            longitude,
        } => commands::location::handle_set_location_command(latitude, longitude),
    }
}

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    Log::set_debug(parsed_args.debug_enabled);
    config::set_config_dir(parsed_args.config_dir)?;

    if let Err(e) = run(parsed_args.action) {
        log_error_exit!("{e:#}");
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
    Ok(())
}
