//! Playbook runner.
//!
//! Builds the command line for an [`InvocationRequest`], launches it once and
//! turns the exit status into a [`RunOutcome`].

use super::error::RunnerResult;
use super::executor::{ExecutionOutcome, ProcessLauncher, SystemLauncher};
use super::{ExtraVars, InvocationRequest};

/// How a playbook run ended.
///
/// A non-zero exit is a value here, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exit status 0.
    Success { stdout: String, stderr: String },

    /// Non-zero exit status, with the captured output for diagnostics.
    Failed { code: i32, stdout: String, stderr: String },
}

impl RunOutcome {
    /// Integer exit status of the run.
    pub fn code(&self) -> i32 {
        match self {
            Self::Success { .. } => 0,
            Self::Failed { code, .. } => *code,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn stdout(&self) -> &str {
        match self {
            Self::Success { stdout, .. } | Self::Failed { stdout, .. } => stdout,
        }
    }

    pub fn stderr(&self) -> &str {
        match self {
            Self::Success { stderr, .. } | Self::Failed { stderr, .. } => stderr,
        }
    }
}

impl From<ExecutionOutcome> for RunOutcome {
    fn from(outcome: ExecutionOutcome) -> Self {
        if outcome.success() {
            Self::Success { stdout: outcome.stdout, stderr: outcome.stderr }
        } else {
            Self::Failed { code: outcome.status, stdout: outcome.stdout, stderr: outcome.stderr }
        }
    }
}

/// Runs playbooks through a [`ProcessLauncher`].
#[derive(Debug, Default)]
pub struct PlaybookRunner<L = SystemLauncher> {
    launcher: L,
}

impl PlaybookRunner<SystemLauncher> {
    /// Create a runner that spawns real processes.
    pub fn new() -> Self {
        Self { launcher: SystemLauncher::new() }
    }
}

impl<L: ProcessLauncher> PlaybookRunner<L> {
    /// Create a runner with a custom launcher.
    pub fn with_launcher(launcher: L) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run a playbook and wait for it to finish.
    ///
    /// The playbook path is not checked here; the external tool reports a
    /// missing playbook through its own exit status. Launch faults such as
    /// a missing runner binary are returned as `Err`.
    pub fn run_playbook(&self, request: &InvocationRequest) -> RunnerResult<RunOutcome> {
        let command = request.command_line();
        tracing::debug!(command = %command, "Running playbook");

        let outcome = self.launcher.launch(&command)?;
        let duration_ms = u64::try_from(outcome.duration.as_millis()).unwrap_or(u64::MAX);
        let outcome = RunOutcome::from(outcome);

        match &outcome {
            RunOutcome::Success { .. } => {
                tracing::info!(
                    playbook = %request.playbook,
                    host = %request.host,
                    duration_ms,
                    "Playbook succeeded"
                );
            }
            RunOutcome::Failed { code, stderr, .. } => {
                tracing::warn!(
                    playbook = %request.playbook,
                    host = %request.host,
                    code,
                    stderr = stderr.trim(),
                    "Playbook failed"
                );
            }
        }

        Ok(outcome)
    }

    /// Convenience form taking the pieces of a request directly.
    pub fn run(
        &self,
        playbook: &str,
        host: &str,
        extra_vars: &ExtraVars,
    ) -> RunnerResult<RunOutcome> {
        let request = InvocationRequest::new(playbook, host).with_extra_vars(extra_vars.clone());
        self.run_playbook(&request)
    }
}
