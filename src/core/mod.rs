//! Core types and functionality for Playrun.
//!
//! This module contains the invocation model, process execution, the
//! playbook runner, and configuration.

mod config;
mod error;
mod executor;
mod invocation;
mod runner;

#[cfg(test)]
pub(crate) use runner::testing;

pub use config::{
    expand_path, Config, ConfigSource, DeployConfig, DEFAULT_HOST, DEFAULT_PLAYBOOK,
    LOCAL_CONFIG_FILE,
};
pub use error::{
    ConfigError, RunnerError, RunnerResult, VarParseError, EXIT_LAUNCH_FAILED,
    EXIT_TOOL_NOT_FOUND,
};
pub use executor::{ExecutionOutcome, ProcessLauncher, SystemLauncher};
pub use invocation::{CommandLine, ExtraVar, ExtraVars, InvocationRequest, DEFAULT_TOOL};
pub use runner::{PlaybookRunner, RunOutcome};
