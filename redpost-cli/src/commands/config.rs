//! `redpost config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use redpost_core::config::RedpostConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show => execute_show(config_path, writer).await,
    }
}

/// Attempt to load and validate the configuration file, reporting any errors.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match RedpostConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

/// Show the effective configuration (file + env overrides + defaults).
async fn execute_show(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    let config = crate::commands::load_config(config_path).await?;
    writer.render(&ConfigShowReport { config })?;
    Ok(())
}

/// Validation result payload.
#[derive(Debug, Serialize)]
struct ConfigValidationReport {
    source: String,
    valid: bool,
    errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.valid {
            writeln!(w, "{}: valid", self.source)?;
        } else {
            writeln!(w, "{}: invalid", self.source)?;
            for error in &self.errors {
                writeln!(w, "  - {error}")?;
            }
        }
        Ok(())
    }
}

/// Effective configuration payload.
#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ConfigShowReport {
    config: RedpostConfig,
}

impl Render for ConfigShowReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        let toml = toml::to_string_pretty(&self.config).map_err(std::io::Error::other)?;
        write!(w, "{toml}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[tokio::test]
    async fn validate_accepts_default_style_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redpost.toml");
        tokio::fs::write(
            &path,
            r#"
[general]
log_level = "debug"

[policy]
mode = "allowlist"
allowed_commands = ["nmap"]
"#,
        )
        .await
        .unwrap();

        let writer = OutputWriter::new(OutputFormat::Text);
        let args = ConfigArgs {
            action: ConfigAction::Validate,
        };
        assert!(execute(args, &path, &writer).await.is_ok());
    }

    #[tokio::test]
    async fn validate_rejects_bad_log_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redpost.toml");
        tokio::fs::write(&path, "[general]\nlog_level = \"loud\"\n")
            .await
            .unwrap();

        let writer = OutputWriter::new(OutputFormat::Text);
        let args = ConfigArgs {
            action: ConfigAction::Validate,
        };
        let result = execute(args, &path, &writer).await;
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[tokio::test]
    async fn show_falls_back_to_defaults_when_file_missing() {
        let writer = OutputWriter::new(OutputFormat::Text);
        let args = ConfigArgs {
            action: ConfigAction::Show,
        };
        let missing = Path::new("/nonexistent/redpost.toml");
        assert!(execute(args, missing, &writer).await.is_ok());
    }
}
