//! Command-line arguments

use clap::{Parser, Subcommand};

/// Version reported by the binary and attached to telemetry
///
/// Taken from `KBOT_VERSION` at build time when set, otherwise the crate
/// version.
pub const VERSION: &str = match option_env!("KBOT_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// kbot - Telegram bot with OpenTelemetry traces and metrics
#[derive(Debug, Parser)]
#[command(name = "kbot")]
#[command(author, version = VERSION, about = "Telegram bot with OpenTelemetry instrumentation", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot
    ///
    /// Reads TELE_TOKEN for the bot token and METRICS_HOST for the OTLP
    /// collector address.
    #[command(visible_alias = "start")]
    Kbot,

    /// Print the version
    Version,
}

/// Log filter override for the given verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some(
            "info,application=debug,infrastructure=debug,integration_telegram=debug,presentation_cli=debug",
        ),
        _ => Some("debug,application=trace,infrastructure=trace,integration_telegram=trace,presentation_cli=trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn parses_kbot_command() {
        let cli = parse(&["kbot", "kbot"]).unwrap();
        assert_eq!(cli.command, Commands::Kbot);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn start_is_an_alias() {
        assert_eq!(parse(&["kbot", "start"]).unwrap().command, Commands::Kbot);
    }

    #[test]
    fn parses_version_command() {
        assert_eq!(parse(&["kbot", "version"]).unwrap().command, Commands::Version);
    }

    #[test]
    fn verbosity_counts() {
        let cli = parse(&["kbot", "-vv", "kbot"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = parse(&["kbot", "start", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(parse(&["kbot"]).is_err());
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(parse(&["kbot", "serve"]).is_err());
    }

    #[test]
    fn verbosity_filters() {
        assert!(log_filter_from_verbosity(0).is_none());
        assert!(log_filter_from_verbosity(1).unwrap().contains("application=debug"));
        assert!(log_filter_from_verbosity(5).unwrap().contains("application=trace"));
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!VERSION.trim().is_empty());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
