//! `redpost tools` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use redpost_core::config::RedpostConfig;
use redpost_engine::ToolRegistry;

use crate::cli::ToolsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `tools` command.
pub fn execute(
    args: ToolsArgs,
    config: &RedpostConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let registry = ToolRegistry::probe(&config.tools);
    let report = build_report(&registry, args.available_only);
    writer.render(&report)?;
    Ok(())
}

fn build_report(registry: &ToolRegistry, available_only: bool) -> ToolsReport {
    let tools: Vec<ToolEntry> = registry
        .descriptors()
        .into_iter()
        .filter(|d| !available_only || d.is_available())
        .map(|d| ToolEntry {
            name: d.name.clone(),
            category: d.category.to_string(),
            path: d.path.as_ref().map(|p| p.display().to_string()),
            available: d.is_available(),
        })
        .collect();

    ToolsReport {
        total: tools.len(),
        available: tools.iter().filter(|t| t.available).count(),
        tools,
    }
}

/// Tool availability payload.
#[derive(Debug, Serialize)]
struct ToolsReport {
    total: usize,
    available: usize,
    tools: Vec<ToolEntry>,
}

#[derive(Debug, Serialize)]
struct ToolEntry {
    name: String,
    category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    available: bool,
}

impl Render for ToolsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Tools ({}/{} available):", self.available, self.total)?;
        writeln!(w, "{:<14} {:<24} {:<12} PATH", "NAME", "CATEGORY", "STATUS")?;
        for tool in &self.tools {
            let status = if tool.available {
                "available".green()
            } else {
                "missing".red()
            };
            writeln!(
                w,
                "{:<14} {:<24} {:<12} {}",
                tool.name,
                tool.category,
                status,
                tool.path.as_deref().unwrap_or("-")
            )?;
        }
        Ok(())
    }
}
