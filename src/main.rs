//! agentbench CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agentbench::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::Report(args) => commands::report::execute(args).await,
        Commands::Improve(args) => commands::improve::execute(args).await,
        Commands::List => commands::list::execute(),
    };

    if let Err(err) = result {
        agentbench::cli::handle_error(err);
    }
}
