//! Error types for the playbook runner and its configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code when the playbook runner binary cannot be found.
pub const EXIT_TOOL_NOT_FOUND: i32 = 127;

/// Exit code when the runner binary exists but could not be launched.
pub const EXIT_LAUNCH_FAILED: i32 = 126;

/// Result type for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Faults raised while starting the external process.
///
/// A child that starts and exits non-zero is not an error; see
/// [`RunOutcome`](super::RunOutcome).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The runner binary was not found on `PATH`.
    #[error("Playbook runner '{tool}' not found")]
    ToolNotFound {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other spawn or wait failure.
    #[error("Failed to launch '{tool}': {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The command line had no program token.
    #[error("Empty command line")]
    EmptyCommand,
}

impl RunnerError {
    /// Classify an I/O error raised while launching `tool`.
    pub fn from_io(tool: impl Into<String>, source: std::io::Error) -> Self {
        let tool = tool.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::ToolNotFound { tool, source }
        } else {
            Self::Launch { tool, source }
        }
    }

    /// Process exit code to report for this fault.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            Self::Launch { .. } | Self::EmptyCommand => EXIT_LAUNCH_FAILED,
        }
    }
}

/// Malformed `key=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarParseError {
    #[error("Invalid extra variable '{0}': expected key=value")]
    MissingSeparator(String),

    #[error("Invalid extra variable '{0}': key is empty")]
    EmptyKey(String),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema.
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Shell expansion of a configured path failed.
    #[error("Could not expand '{value}': {message}")]
    Expand { value: String, message: String },
}
