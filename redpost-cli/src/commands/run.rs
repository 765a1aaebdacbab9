//! `redpost run` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use redpost_core::config::RedpostConfig;
use redpost_engine::{Report, StepOverrides, WorkflowResult};

use crate::cli::RunArgs;
use crate::commands::build_orchestrator;
use crate::commands::report::ReportPayload;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `run` command.
pub async fn execute(
    args: RunArgs,
    config: &RedpostConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let workflow = args
        .workflow
        .unwrap_or_else(|| config.workflow.default_workflow.clone());
    let overrides = parse_overrides(&args.overrides)?;

    let orchestrator = build_orchestrator(config).await?;

    info!(workflow = %workflow, target = %args.target, "running workflow");
    let result = orchestrator
        .execute_workflow(&workflow, &args.target, &overrides)
        .await;

    if let Some(path) = &args.save {
        let json = serde_json::to_string_pretty(&result)?;
        tokio::fs::write(path, json).await?;
        info!(path = %path.display(), "workflow result saved");
    }

    let failed = !result.success;
    if args.report {
        writer.render(&ReportPayload::from(Report::from_result(result)))?;
    } else {
        writer.render(&RunReport::from(&result))?;
    }

    if failed {
        return Err(CliError::Command("workflow did not complete".to_owned()));
    }
    Ok(())
}

/// Parse repeated `STEP=OPTION` arguments into step overrides.
fn parse_overrides(raw: &[String]) -> Result<StepOverrides, CliError> {
    let mut overrides = StepOverrides::new();
    for entry in raw {
        let Some((step, option)) = entry.split_once('=') else {
            return Err(CliError::Command(format!(
                "invalid --set value (expected STEP=OPTION): {entry}"
            )));
        };
        if step.is_empty() {
            return Err(CliError::Command(format!(
                "invalid --set value (empty step name): {entry}"
            )));
        }
        overrides
            .entry(step.to_owned())
            .or_default()
            .push(option.to_owned());
    }
    Ok(overrides)
}

/// Raw run output payload.
#[derive(Debug, Serialize)]
struct RunReport {
    workflow: String,
    target: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    steps: Vec<StepLine>,
}

#[derive(Debug, Serialize)]
struct StepLine {
    name: String,
    tool: String,
    succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&WorkflowResult> for RunReport {
    fn from(result: &WorkflowResult) -> Self {
        Self {
            workflow: result.workflow.clone(),
            target: result.target.clone(),
            success: result.success,
            error: result.error.clone(),
            steps: result
                .steps
                .iter()
                .map(|s| StepLine {
                    name: s.name.clone(),
                    tool: s.tool.to_string(),
                    succeeded: s.outcome.is_success(),
                    error: s.outcome.error().map(str::to_owned),
                })
                .collect(),
        }
    }
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Workflow: {} (target: {})", self.workflow, self.target)?;
        for step in &self.steps {
            if step.succeeded {
                writeln!(w, "  {} {} [{}]", "ok".green(), step.name, step.tool)?;
            } else {
                writeln!(
                    w,
                    "  {} {} [{}]: {}",
                    "fail".red(),
                    step.name,
                    step.tool,
                    step.error.as_deref().unwrap_or("unknown failure")
                )?;
            }
        }
        if let Some(error) = &self.error {
            writeln!(w, "{} {}", "aborted:".red().bold(), error)?;
        } else {
            let succeeded = self.steps.iter().filter(|s| s.succeeded).count();
            writeln!(w, "{succeeded}/{} steps succeeded", self.steps.len())?;
        }
        Ok(())
    }
}
