//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Benchmark runner for browser-automation agents.
#[derive(Parser)]
#[command(name = "agentbench", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run benchmark scenarios
    Run(RunArgs),
    /// Generate a report from stored results
    Report(ReportArgs),
    /// Analyze failures and suggest improvements
    Improve(ImproveArgs),
    /// List available scenarios
    List,
}

#[derive(Args)]
pub struct RunArgs {
    /// Named suite to run
    #[arg(long, default_value = "smoke")]
    pub suite: String,

    /// Run a specific scenario by id instead of a suite
    #[arg(long)]
    pub scenario: Option<String>,

    /// Run all scenarios carrying a tag instead of a suite
    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print detailed tool call traces for each scenario
    #[arg(long)]
    pub trace: bool,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Number of recent runs to include
    #[arg(long = "last-n", default_value_t = 20)]
    pub last_n: u32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ImproveArgs {
    /// Number of recent runs to analyze
    #[arg(long = "last-n", default_value_t = 50)]
    pub last_n: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

/// Print an error and exit non-zero.
pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("Error: {err:#}");
    std::process::exit(1);
}
