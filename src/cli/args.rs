//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    aircraft::AircraftCommands, completions::CompletionsArgs, config::ConfigCommands,
    employee::EmployeeCommands, part::PartCommands, session::LoginArgs, stage::StageCommands,
    test::TestCommands,
};

#[derive(Parser, Debug)]
#[command(name = "aerocode")]
#[command(author, version, about = "Aerocode Production System")]
#[command(
    long_about = "Terminal dashboard for aircraft production: track aircraft, parts, production stages, employees and quality tests."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging to stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Directory holding config.yaml and the stored login
    #[arg(long, global = true, env = "AEROCODE_HOME")]
    pub home: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with a demo account
    Login(LoginArgs),

    /// Log out and forget the stored login
    Logout,

    /// Show who is logged in
    Whoami,

    /// List the dashboard sections your role can open
    Nav,

    /// Aircraft management
    #[command(subcommand)]
    Aircraft(AircraftCommands),

    /// Parts inventory
    #[command(subcommand)]
    Part(PartCommands),

    /// Employee directory
    #[command(subcommand)]
    Employee(EmployeeCommands),

    /// Production stage tracking
    #[command(subcommand)]
    Stage(StageCommands),

    /// Quality test tracking
    #[command(subcommand)]
    Test(TestCommands),

    /// Interactive shell over one in-memory dashboard
    Shell,

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (details for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl GlobalOpts {
    /// The requested format, or the configured default when left on auto
    pub fn resolved_format(&self, configured: Option<&str>) -> OutputFormat {
        match (self.format, configured) {
            (OutputFormat::Auto, Some(name)) => OutputFormat::from_str(name, true).unwrap_or_else(|_| {
                tracing::warn!(format = name, "ignoring unknown default_format");
                OutputFormat::Auto
            }),
            (format, _) => format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_configured_format_applies_to_auto_only() {
        let cli = Cli::parse_from(["aerocode", "nav"]);
        assert_eq!(cli.global.resolved_format(Some("json")), OutputFormat::Json);
        assert_eq!(cli.global.resolved_format(Some("bogus")), OutputFormat::Auto);

        let cli = Cli::parse_from(["aerocode", "-f", "csv", "nav"]);
        assert_eq!(cli.global.resolved_format(Some("json")), OutputFormat::Csv);
    }

    #[test]
    fn test_record_subcommands_parse() {
        let cli = Cli::parse_from([
            "aerocode",
            "part",
            "list",
            "--category",
            "hydraulic",
            "--low-stock",
            "--sort",
            "quantity",
            "-r",
        ]);
        assert!(matches!(cli.command, Commands::Part(PartCommands::List(_))));

        let cli = Cli::parse_from(["aerocode", "stage", "edit", "#2", "completion_percentage=70"]);
        assert!(matches!(cli.command, Commands::Stage(StageCommands::Edit(_))));
    }

    #[test]
    fn test_bad_filter_value_is_rejected() {
        let err = Cli::try_parse_from(["aerocode", "aircraft", "list", "--status", "scrapped"])
            .unwrap_err();
        assert!(err.to_string().contains("Invalid aircraft status"));
    }
}
