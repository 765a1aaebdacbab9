//! `redpost workflows` command handler

use std::io::Write;

use serde::Serialize;

use redpost_core::config::RedpostConfig;
use redpost_engine::WorkflowSet;

use crate::cli::WorkflowsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `workflows` command.
pub async fn execute(
    args: WorkflowsArgs,
    config: &RedpostConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let workflows = match &config.workflow.definitions_path {
        Some(path) => WorkflowSet::load(path).await?,
        None => WorkflowSet::builtin(),
    };

    let report = build_report(&workflows, args.verbose);
    writer.render(&report)?;
    Ok(())
}

fn build_report(workflows: &WorkflowSet, verbose: bool) -> WorkflowListReport {
    WorkflowListReport {
        total: workflows.len(),
        workflows: workflows
            .definitions()
            .map(|d| WorkflowEntry {
                name: d.name.clone(),
                steps: d.steps.len(),
                detail: if verbose {
                    d.steps
                        .iter()
                        .map(|s| format!("{} [{}]", s.name, s.tool))
                        .collect()
                } else {
                    Vec::new()
                },
            })
            .collect(),
    }
}

/// Workflow listing payload.
#[derive(Debug, Serialize)]
struct WorkflowListReport {
    total: usize,
    workflows: Vec<WorkflowEntry>,
}

#[derive(Debug, Serialize)]
struct WorkflowEntry {
    name: String,
    steps: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    detail: Vec<String>,
}

impl Render for WorkflowListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Workflows ({}):", self.total)?;
        for workflow in &self.workflows {
            writeln!(w, "  {} ({} steps)", workflow.name, workflow.steps)?;
            for line in &workflow.detail {
                writeln!(w, "    - {line}")?;
            }
        }
        Ok(())
    }
}
