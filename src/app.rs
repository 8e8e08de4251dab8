//! Deployment entry point.
//!
//! Resolves the options for one deployment, checks that the playbook exists
//! and hands the run to the [`PlaybookRunner`].

use std::io::{self, Write};
use std::path::PathBuf;

use crate::core::{
    Config, ConfigError, ExtraVars, InvocationRequest, PlaybookRunner, ProcessLauncher,
    RunOutcome, SystemLauncher,
};

/// Exit code for a successful deployment or dry run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when the playbook file does not exist.
pub const EXIT_MISSING_PLAYBOOK: i32 = 1;

/// How a dry run prints the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// Parse a format name, falling back to text for anything unknown.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Everything the entry point needs for one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Playbook file; must exist before anything is launched
    pub playbook: PathBuf,

    /// Inventory host or group
    pub host: String,

    /// Extra variables, in command-line order
    pub extra_vars: ExtraVars,

    /// Playbook runner binary
    pub tool: String,

    /// Print the command line instead of running it
    pub dry_run: Option<OutputFormat>,
}

impl Default for DeployOptions {
    fn default() -> Self {
        let deploy = crate::core::DeployConfig::default();
        Self {
            playbook: PathBuf::from(deploy.playbook),
            host: deploy.host,
            extra_vars: ExtraVars::new(),
            tool: deploy.tool,
            dry_run: None,
        }
    }
}

impl DeployOptions {
    /// Options taken from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            playbook: config.expanded_playbook()?,
            host: config.deploy.host.clone(),
            extra_vars: config.extra_vars(),
            tool: config.deploy.tool.clone(),
            dry_run: None,
        })
    }

    #[must_use]
    pub fn with_playbook(mut self, playbook: impl Into<PathBuf>) -> Self {
        self.playbook = playbook.into();
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Merge extra variables on top of the existing ones.
    #[must_use]
    pub fn with_extra_vars(mut self, vars: &ExtraVars) -> Self {
        self.extra_vars.merge(vars);
        self
    }

    #[must_use]
    pub fn dry_run(mut self, format: OutputFormat) -> Self {
        self.dry_run = Some(format);
        self
    }

    /// The runner request these options describe.
    pub fn request(&self) -> InvocationRequest {
        InvocationRequest::new(self.playbook.to_string_lossy(), self.host.clone())
            .with_extra_vars(self.extra_vars.clone())
            .with_tool(self.tool.clone())
    }
}

/// Runs one deployment and reports a process exit code.
#[derive(Debug, Default)]
pub struct Deployer<L = SystemLauncher> {
    runner: PlaybookRunner<L>,
}

impl Deployer<SystemLauncher> {
    pub fn new() -> Self {
        Self { runner: PlaybookRunner::new() }
    }
}

impl<L: ProcessLauncher> Deployer<L> {
    /// Create a deployer with a custom launcher.
    pub fn with_launcher(launcher: L) -> Self {
        Self { runner: PlaybookRunner::with_launcher(launcher) }
    }

    pub fn runner(&self) -> &PlaybookRunner<L> {
        &self.runner
    }

    /// Run the deployment described by `options`.
    ///
    /// Returns 1 without launching anything when the playbook is missing.
    /// Otherwise the runner's exit code is returned unchanged.
    pub fn run(&self, options: &DeployOptions) -> i32 {
        if !options.playbook.exists() {
            tracing::error!(playbook = %options.playbook.display(), "Playbook not found");
            eprintln!("Error: playbook not found: {}", options.playbook.display());
            return EXIT_MISSING_PLAYBOOK;
        }

        let request = options.request();

        if let Some(format) = options.dry_run {
            print_dry_run(&request, format);
            return EXIT_SUCCESS;
        }

        match self.runner.run_playbook(&request) {
            Ok(outcome) => {
                forward_output(&outcome);
                outcome.code()
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not launch playbook runner");
                eprintln!("Error: {e}");
                e.exit_code()
            }
        }
    }
}

fn print_dry_run(request: &InvocationRequest, format: OutputFormat) {
    let command = request.command_line();
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&command) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "Could not serialize command line"),
        },
        OutputFormat::Text => {
            println!("[DRY RUN] Would execute:");
            println!("  {command}");
        }
    }
}

/// Replay captured output so the tool's diagnostics reach the terminal.
fn forward_output(outcome: &RunOutcome) {
    // Write errors on our own streams are ignored.
    if !outcome.stdout().is_empty() {
        let _ = io::stdout().write_all(outcome.stdout().as_bytes());
    }
    if !outcome.success() && !outcome.stderr().is_empty() {
        let _ = io::stderr().write_all(outcome.stderr().as_bytes());
    }
}
