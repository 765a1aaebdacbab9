//! `redpost report` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use redpost_core::types::Severity;
use redpost_engine::{Report, WorkflowResult};

use crate::cli::ReportArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `report` command.
pub async fn execute(args: ReportArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let mut results = Vec::with_capacity(args.results.len());
    for path in &args.results {
        results.push(load_result(path).await?);
    }

    info!(count = results.len(), "generating report");
    let report = if results.len() == 1 {
        Report::from_result(results.remove(0))
    } else {
        Report::from_results(results)
    };

    writer.render(&ReportPayload::from(report))?;
    Ok(())
}

async fn load_result(path: &Path) -> Result<WorkflowResult, CliError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        CliError::Command(format!("cannot read result file {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::Command(format!("invalid result file {}: {e}", path.display()))
    })
}

/// Renderable wrapper around the engine report.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ReportPayload(Report);

impl From<Report> for ReportPayload {
    fn from(report: Report) -> Self {
        Self(report)
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    let label = severity.to_string();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.red(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.cyan(),
        Severity::Info => label.normal(),
    }
}

impl Render for ReportPayload {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let report = &self.0;
        let summary = &report.summary;

        writeln!(w, "Security Report")?;
        writeln!(
            w,
            "  Steps: {} total, {} succeeded, {} failed",
            summary.total_steps, summary.successful_steps, summary.failed_steps
        )?;
        let tally = &summary.risk_tally;
        writeln!(
            w,
            "  Risks: {} critical, {} high, {} medium, {} low, {} info",
            tally.critical, tally.high, tally.medium, tally.low, tally.info
        )?;

        if !report.findings.is_empty() {
            writeln!(w, "\nFindings:")?;
            for finding in &report.findings {
                writeln!(
                    w,
                    "  [{}] {} -- {} ({} / {})",
                    severity_label(finding.severity),
                    finding.title,
                    finding.detail,
                    finding.step,
                    finding.tool
                )?;
            }
        }

        if !report.recommendations.is_empty() {
            writeln!(w, "\nRecommendations:")?;
            for recommendation in &report.recommendations {
                writeln!(w, "  - {recommendation}")?;
            }
        }

        Ok(())
    }
}
