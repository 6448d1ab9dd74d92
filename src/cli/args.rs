//! Command line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Audit Meraki dashboard configuration against policy thresholds.
#[derive(Debug, Clone, Parser)]
#[command(name = "meraki-health-check", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file (YAML, or TOML by extension)
    #[arg(short, long, global = true, env = "MERAKI_HEALTH_CONFIG", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Write the report to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only show checks with issues and failed entities
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show check details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in text output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Deadline in seconds for each network's checks
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<f64>,
}

impl Args {
    /// Subcommand to run; `run` when none is given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }

    /// Colors are used for text written to a terminal, unless disabled
    /// by flag or by `NO_COLOR`.
    pub fn use_color(&self) -> bool {
        self.color_allowed() && std::io::stdout().is_terminal()
    }

    fn color_allowed(&self) -> bool {
        !self.no_color && self.output.is_none() && std::env::var_os("NO_COLOR").is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Run the health check (default)
    #[default]
    Run,
    /// List all available checks
    List,
    /// Print version information
    Version,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}
