//! Command-line interface handling for the tabletop server.
//!
//! Every option here overrides the matching value of the configuration file.

use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use tabletop_rules::Variant;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for bind address
    pub bind_address: Option<String>,
    /// Optional override for the hosted game
    pub variant: Option<Variant>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

fn command() -> Command {
    Command::new("Tabletop Server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Shared-board server for Gomoku, Triangle Chain and Siege")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("tabletop.toml"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDRESS")
                .help("Bind address (e.g., 0.0.0.0:35102)"),
        )
        .arg(
            Arg::new("variant")
                .short('g')
                .long("variant")
                .value_name("GAME")
                .help("Game hosted by this instance (line, triangle, siege)")
                .value_parser(|s: &str| s.parse::<Variant>()),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tabletop.toml")),
            bind_address: matches.get_one::<String>("bind").cloned(),
            variant: matches.get_one::<Variant>("variant").copied(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}
