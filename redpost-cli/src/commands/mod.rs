//! Command handlers -- one module per subcommand

pub mod config;
pub mod report;
pub mod run;
pub mod tools;
pub mod workflows;

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use redpost_core::config::RedpostConfig;
use redpost_core::error::{ConfigError, RedpostError};
use redpost_core::pipeline::{AllowAllPolicy, AllowlistPolicy, CommandPolicy, NativeFormatter};
use redpost_engine::{Orchestrator, TokioLauncher, ToolRegistry, ToolRunner, WorkflowSet};

use crate::error::CliError;

/// Load configuration, falling back to defaults when the file is absent.
pub async fn load_config(path: &Path) -> Result<RedpostConfig, CliError> {
    match RedpostConfig::load(path).await {
        Ok(config) => Ok(config),
        Err(RedpostError::Config(ConfigError::FileNotFound { .. })) => {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(RedpostConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Build a production orchestrator from configuration.
///
/// Probes the tool registry against the real filesystem, selects the
/// command policy from `[policy]`, and loads workflow definitions from
/// the configured path (built-in definitions when no path is set).
pub async fn build_orchestrator(
    config: &RedpostConfig,
) -> Result<Orchestrator<TokioLauncher>, CliError> {
    let registry = Arc::new(ToolRegistry::probe(&config.tools));

    let policy: Arc<dyn CommandPolicy> = if config.policy.mode == "allowlist" {
        Arc::new(AllowlistPolicy::new(config.policy.allowed_commands.clone()))
    } else {
        Arc::new(AllowAllPolicy)
    };

    let workflows = match &config.workflow.definitions_path {
        Some(path) => WorkflowSet::load(path).await?,
        None => WorkflowSet::builtin(),
    };

    let runner = ToolRunner::new(registry, policy, Arc::new(NativeFormatter), TokioLauncher);
    Ok(Orchestrator::new(runner, workflows))
}
