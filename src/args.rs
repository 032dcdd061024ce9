//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Global flags (`--config`, `--debug`)
//! may appear anywhere; the first positional argument selects the command.
//!
//! Negative numbers such as `-74.0060` are positional coordinates, not flags.

use chrono::NaiveDate;

/// A position given on the command line, validated later against the globe.
pub type CliPosition = Option<(f64, f64)>;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Bearing and distance to the target
    Bearing { position: CliPosition },
    /// Daily prayer times
    Times {
        position: CliPosition,
        date: Option<NaiveDate>,
        timezone: Option<String>,
        at: Option<String>,
    },
    /// Drive a session with a recorded sample stream
    Replay { position: CliPosition, input: String },
    /// Store a fixed position in the config file
    SetLocation { latitude: f64, longitude: f64 },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
#[derive(Debug)]
pub struct ParsedArgs {
    pub action: CliAction,
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
}

fn is_flag(arg: &str) -> bool {
    arg.starts_with('-') && arg.len() > 1 && arg.parse::<f64>().is_err()
}

fn parse_position(args: &[String], command: &str) -> Result<CliPosition, ()> {
    match args {
        [] => Ok(None),
        [lat, lon] => match (lat.parse::<f64>(), lon.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => Ok(Some((lat, lon))),
            _ => {
                log_warning!("Invalid coordinates '{lat} {lon}'. Usage: qibla {command} <lat> <lon>");
                Err(())
            }
        },
        _ => {
            log_warning!("Expected <lat> <lon> or nothing. Usage: qibla {command} [<lat> <lon>]");
            Err(())
        }
    }
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut date: Option<NaiveDate> = None;
        let mut timezone: Option<String> = None;
        let mut at: Option<String> = None;
        let mut positional: Vec<String> = Vec::new();

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].as_str();
            let value = args_vec.get(i + 1).filter(|next| !is_flag(next)).cloned();

            match arg {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" | "--date" | "--tz" | "--at" => {
                    let Some(value) = value else {
                        log_warning!("Missing value for {arg}");
                        unknown_arg_found = true;
                        i += 1;
                        continue;
                    };
                    match arg {
                        "--date" => match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
                            Ok(d) => date = Some(d),
                            Err(_) => {
                                log_warning!("Invalid date '{value}'. Use YYYY-MM-DD");
                                unknown_arg_found = true;
                            }
                        },
                        "--tz" => timezone = Some(value),
                        "--at" => at = Some(value),
                        _ => config_dir = Some(value),
                    }
                    i += 1;
                }
                _ if is_flag(arg) => {
                    log_warning!("Unknown option: {arg}");
                    unknown_arg_found = true;
                }
                _ => positional.push(arg.to_string()),
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help {
            CliAction::ShowHelp
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else {
            Self::parse_command(&positional, date, timezone, at)
        };

        ParsedArgs {
            action,
            debug_enabled,
            config_dir,
        }
    }

    fn parse_command(
        positional: &[String],
        date: Option<NaiveDate>,
        timezone: Option<String>,
        at: Option<String>,
    ) -> CliAction {
        let Some((command, rest)) = positional.split_first() else {
            return CliAction::Bearing { position: None };
        };

        let times_only = date.is_some() || timezone.is_some() || at.is_some();
        if times_only && !matches!(command.as_str(), "times" | "t") {
            log_warning!("--date, --tz and --at only apply to 'qibla times'");
            return CliAction::ShowHelpDueToError;
        }

        let action = match command.as_str() {
            "bearing" | "b" => {
                parse_position(rest, "bearing").map(|position| CliAction::Bearing { position })
            }
            "times" | "t" => parse_position(rest, "times").map(|position| CliAction::Times {
                position,
                date,
                timezone,
                at,
            }),
            "replay" | "r" => match rest.split_last() {
                Some((input, coords)) => parse_position(coords, "replay").map(|position| {
                    CliAction::Replay {
                        position,
                        input: input.clone(),
                    }
                }),
                None => {
                    log_warning!("Missing input. Usage: qibla replay [<lat> <lon>] <FILE|->");
                    Err(())
                }
            },
            "set-location" | "l" => match parse_position(rest, "set-location") {
                Ok(Some((latitude, longitude))) => Ok(CliAction::SetLocation {
                    latitude,
                    longitude,
                }),
                Ok(None) => {
                    log_warning!("Missing coordinates. Usage: qibla set-location <lat> <lon>");
                    Err(())
                }
                Err(()) => Err(()),
            },
            "help" | "h" => Ok(CliAction::ShowHelp),
            "version" => Ok(CliAction::ShowVersion),
            _ => {
                log_warning!("Unknown command: {command}");
                Err(())
            }
        };

        action.unwrap_or(CliAction::ShowHelpDueToError)
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("qibla [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("bearing, b [<lat> <lon>]          Bearing and distance to the target (default)");
    log_indented!("times, t [<lat> <lon>]            Prayer times for a day");
    log_indented!("    --date <YYYY-MM-DD>           Day to calculate (default: today)");
    log_indented!("    --tz <zone>                   auto, system, UTC or an IANA zone");
    log_indented!("    --at <YYYY-MM-DD HH:MM>       Pretend it is this local time");
    log_indented!("replay, r [<lat> <lon>] <FILE|->  Feed heading samples, print JSON frames");
    log_indented!("set-location, l <lat> <lon>       Save a fixed position to the config");
    log_block_start!("Coordinates default to latitude/longitude from qibla.toml.");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> CliAction {
        let mut full = vec!["qibla"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["qibla"]);
        assert_eq!(parsed.action, CliAction::Bearing { position: None });
        assert!(!parsed.debug_enabled);
        assert_eq!(parsed.config_dir, None);
    }

    #[test]
    fn test_parse_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["qibla", "--debug"]);
        assert!(parsed.debug_enabled);
        let parsed = ParsedArgs::parse(vec!["qibla", "bearing", "-d"]);
        assert!(parsed.debug_enabled);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(action(&["--help"]), CliAction::ShowHelp);
        assert_eq!(action(&["-h"]), CliAction::ShowHelp);
        assert_eq!(action(&["help"]), CliAction::ShowHelp);
        assert_eq!(action(&["--version"]), CliAction::ShowVersion);
        assert_eq!(action(&["-V"]), CliAction::ShowVersion);
        assert_eq!(action(&["-v"]), CliAction::ShowVersion);
        assert_eq!(action(&["version"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_multiple_flags() {
        // Help takes precedence
        assert_eq!(action(&["--debug", "--help"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(action(&["--unknown"]), CliAction::ShowHelpDueToError);
        assert_eq!(action(&["frobnicate"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_bearing_with_negative_longitude() {
        assert_eq!(
            action(&["bearing", "40.7128", "-74.0060"]),
            CliAction::Bearing {
                position: Some((40.7128, -74.0060))
            }
        );
        assert_eq!(
            action(&["b", "-6.2", "-106.8"]),
            CliAction::Bearing {
                position: Some((-6.2, -106.8))
            }
        );
    }

    #[test]
    fn test_parse_bearing_bad_coordinates() {
        assert_eq!(action(&["bearing", "north", "west"]), CliAction::ShowHelpDueToError);
        assert_eq!(action(&["bearing", "40.0"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_config_dir() {
        let parsed = ParsedArgs::parse(vec!["qibla", "--config", "/tmp/q", "bearing"]);
        assert_eq!(parsed.config_dir.as_deref(), Some("/tmp/q"));
        assert_eq!(parsed.action, CliAction::Bearing { position: None });

        assert_eq!(action(&["--config"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_times_options() {
        assert_eq!(
            action(&["times", "21.4", "39.8", "--date", "2024-03-20", "--tz", "Asia/Riyadh"]),
            CliAction::Times {
                position: Some((21.4, 39.8)),
                date: NaiveDate::from_ymd_opt(2024, 3, 20),
                timezone: Some("Asia/Riyadh".to_string()),
                at: None,
            }
        );
        assert_eq!(
            action(&["times", "--at", "2024-03-20 16:00"]),
            CliAction::Times {
                position: None,
                date: None,
                timezone: None,
                at: Some("2024-03-20 16:00".to_string()),
            }
        );
        assert_eq!(action(&["times", "--date", "20/03/2024"]), CliAction::ShowHelpDueToError);
        assert_eq!(action(&["bearing", "--tz", "UTC"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_replay() {
        assert_eq!(
            action(&["replay", "-"]),
            CliAction::Replay {
                position: None,
                input: "-".to_string()
            }
        );
        assert_eq!(
            action(&["replay", "51.5", "-0.12", "samples.txt"]),
            CliAction::Replay {
                position: Some((51.5, -0.12)),
                input: "samples.txt".to_string()
            }
        );
        assert_eq!(action(&["replay"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_set_location() {
        assert_eq!(
            action(&["set-location", "40.7", "-74.0"]),
            CliAction::SetLocation {
                latitude: 40.7,
                longitude: -74.0
            }
        );
        assert_eq!(action(&["set-location"]), CliAction::ShowHelpDueToError);
    }
}
