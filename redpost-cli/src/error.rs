//! CLI-specific error types and exit code mapping

use redpost_core::error::RedpostError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Workflow definition loading failure.
    #[error("workflow error: {0}")]
    Workflow(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from redpost-core.
    #[error("{0}")]
    Core(#[from] RedpostError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                 |
    /// |------|-------------------------|
    /// | 0    | Success                 |
    /// | 1    | General / command error |
    /// | 2    | Configuration error     |
    /// | 10   | IO error                |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Workflow(_) | Self::Core(_) => 1,
        }
    }
}

impl From<redpost_engine::EngineError> for CliError {
    fn from(e: redpost_engine::EngineError) -> Self {
        Self::Workflow(e.to_string())
    }
}
