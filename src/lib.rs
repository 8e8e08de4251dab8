//! # Playrun
//!
//! Deployment wrapper that runs an Ansible playbook against an inventory host.
//!
//! Playrun builds a single `ansible-playbook <playbook> -i <host> [-e key=value]...`
//! invocation, runs it to completion, and turns the result into a process
//! exit code.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run ansible/playbooks/deploy.yml against localhost
//! playrun
//!
//! # Override the target and pass variables
//! playrun deploy --host k8s-nodes -e namespace=todo-app -e replicas=3
//!
//! # Show what would be executed
//! playrun deploy --dry-run
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::option_if_let_else)]

pub mod app;
pub mod core;

// Re-export commonly used types
pub use app::{Deployer, DeployOptions, OutputFormat, EXIT_MISSING_PLAYBOOK, EXIT_SUCCESS};
pub use crate::core::{
    CommandLine, Config, ExtraVars, InvocationRequest, PlaybookRunner, ProcessLauncher,
    RunOutcome, RunnerError, SystemLauncher,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "playrun";
