//! Command-line interface of the bridge server.
//!
//! Arguments are parsed with `clap`. Everything except the config path is an
//! override applied on top of the loaded configuration file.

use crate::config::ProviderInstall;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// Every option except the config path overrides the matching setting of
/// the configuration file.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the native plugin to install
    pub provider: Option<ProviderInstall>,
    /// Fail startup when no provider binds
    pub strict: bool,
}

impl CliArgs {
    /// Parses the process arguments.
    ///
    /// # Returns
    ///
    /// A `CliArgs` with every option the user passed. Options left out stay
    /// `None` (or `false`) so the configuration file keeps its value.
    ///
    /// # Panics
    ///
    /// Does not panic. On `--help`, `--version` or an invalid value clap
    /// prints the message and exits the process.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("bridge.toml")),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            provider: matches.get_one::<ProviderInstall>("provider").copied(),
            strict: matches.get_flag("strict"),
        }
    }
}

/// The clap definition of every option, shared by [`CliArgs::parse`] and
/// the tests.
fn command() -> Command {
    Command::new("Factions Bridge Server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("In-process host with one faction plugin, bound through the faction bridge")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("bridge.toml"),
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
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("PLUGIN")
                .help("Native plugin to install (factions_uuid, saber, massive, medieval, none)")
                .value_parser(clap::value_parser!(ProviderInstall)),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Exit with an error when no faction provider binds")
                .action(ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let matches = command()
            .try_get_matches_from(std::iter::once("bridge_server").chain(args.iter().copied()))
            .unwrap();
        CliArgs::from_matches(&matches)
    }

    #[test]
    fn defaults_leave_the_config_file_in_charge() {
        let args = parse(&[]);
        assert_eq!(args.config_path, PathBuf::from("bridge.toml"));
        assert!(args.log_level.is_none());
        assert!(args.provider.is_none());
        assert!(!args.json_logs);
        assert!(!args.strict);
    }

    #[test]
    fn overrides_are_parsed() {
        let args = parse(&[
            "--config",
            "custom.toml",
            "-l",
            "debug",
            "--json-logs",
            "--provider",
            "medieval",
            "--strict",
        ]);
        assert_eq!(args.config_path, PathBuf::from("custom.toml"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.provider, Some(ProviderInstall::Medieval));
        assert!(args.json_logs);
        assert!(args.strict);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let result = command().try_get_matches_from(["bridge_server", "--provider", "towny"]);
        assert!(result.is_err());
    }
}
