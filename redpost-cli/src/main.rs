//! Redpost CLI entry point
//!
//! Thin dispatcher: parse arguments, load configuration, initialise
//! tracing, and hand off to the subcommand handlers. All user-facing
//! output flows through [`output::OutputWriter`]; logs go to stderr.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = commands::load_config(&cli.config).await?;

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.general.log_level);
    init_tracing(log_level, &config.general.log_format);

    tracing::debug!(config = %cli.config.display(), "redpost starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Run(args) => commands::run::execute(args, &config, &writer).await,
        Commands::Tools(args) => commands::tools::execute(args, &config, &writer),
        Commands::Workflows(args) => commands::workflows::execute(args, &config, &writer).await,
        Commands::Report(args) => commands::report::execute(args, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

/// Initialise the tracing subscriber on stderr.
///
/// Stdout is reserved for command output payloads.
fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
