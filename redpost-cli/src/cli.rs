//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Redpost -- declarative security tool workflow engine.
///
/// Use `redpost <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "redpost", version, about, long_about = None)]
pub struct Cli {
    /// Path to the redpost.toml configuration file.
    #[arg(short, long, default_value = "redpost.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a workflow against a target.
    Run(RunArgs),

    /// Show tool availability from the registry.
    Tools(ToolsArgs),

    /// List loaded workflow definitions.
    Workflows(WorkflowsArgs),

    /// Aggregate saved workflow results into a report.
    Report(ReportArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Execute a workflow against a target.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Target host, URL, or capture file.
    pub target: String,

    /// Workflow name (default: configured default workflow).
    #[arg(long)]
    pub workflow: Option<String>,

    /// Extra options for a step, appended after configured options.
    /// Repeatable; format `STEP=OPTION`.
    #[arg(long = "set", value_name = "STEP=OPTION")]
    pub overrides: Vec<String>,

    /// Generate a full report instead of the raw result.
    #[arg(long)]
    pub report: bool,

    /// Write the raw workflow result JSON to this path.
    #[arg(long)]
    pub save: Option<PathBuf>,
}

// ---- tools ----

/// Show tool availability.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Show only available tools.
    #[arg(long)]
    pub available_only: bool,
}

// ---- workflows ----

/// List workflow definitions.
#[derive(Args, Debug)]
pub struct WorkflowsArgs {
    /// Show each step of every workflow.
    #[arg(short, long)]
    pub verbose: bool,
}

// ---- report ----

/// Aggregate saved workflow result files.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// One or more workflow result JSON files (from `run --save`).
    #[arg(required = true)]
    pub results: Vec<PathBuf>,
}

// ---- config ----

/// Manage redpost configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show,
}
