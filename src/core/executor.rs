//! Process execution module.
//!
//! Spawns the external playbook runner and captures its output.

use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use super::error::{RunnerError, RunnerResult};
use super::CommandLine;

/// Result of running one external process to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Exit status as an integer (signals map to `128 + signal` on Unix)
    pub status: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Time taken to execute
    pub duration: Duration,
}

impl ExecutionOutcome {
    /// Outcome with the given status and no output.
    pub fn with_status(status: i32) -> Self {
        Self { status, stdout: String::new(), stderr: String::new(), duration: Duration::ZERO }
    }

    #[must_use]
    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    #[must_use]
    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Check if the process succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Launches a command line and waits for it.
///
/// The runner only talks to processes through this trait.
pub trait ProcessLauncher {
    /// Run `command` to completion, capturing stdout and stderr.
    fn launch(&self, command: &CommandLine) -> RunnerResult<ExecutionOutcome>;
}

/// Launcher backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, command: &CommandLine) -> RunnerResult<ExecutionOutcome> {
        let program = command.program();
        if program.is_empty() {
            return Err(RunnerError::EmptyCommand);
        }

        let start = Instant::now();

        let output = ProcessCommand::new(program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RunnerError::from_io(program, e))?;

        let duration = start.elapsed();

        Ok(ExecutionOutcome {
            status: status_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration,
        })
    }
}

/// Collapse an `ExitStatus` into a single integer.
fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
