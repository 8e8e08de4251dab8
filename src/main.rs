//! Playrun - run deployment playbooks from the command line.
//!
//! Wraps `ansible-playbook` and reports its exit status as our own.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use playrun::core::{Config, ConfigSource, ExtraVars};
use playrun::{Deployer, DeployOptions, OutputFormat};

/// Exit code for usage and configuration errors.
const EXIT_USAGE: i32 = 2;

/// Run Ansible deployment playbooks
#[derive(Parser)]
#[command(name = "playrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of .playrun.toml / ~/.config/playrun/config.toml
    #[arg(short, long, global = true, env = "PLAYRUN_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deployment playbook (default)
    Deploy(DeployArgs),

    /// Show the effective configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Default)]
struct DeployArgs {
    /// Playbook to run
    #[arg(short, long)]
    playbook: Option<PathBuf>,

    /// Inventory host or group to target
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Extra variable assignment (key=value), repeatable
    #[arg(short = 'e', long = "extra-var", value_name = "KEY=VALUE")]
    extra_vars: Vec<String>,

    /// Playbook runner binary
    #[arg(long)]
    tool: Option<String>,

    /// Show the command line without running it
    #[arg(long)]
    dry_run: bool,

    /// Dry-run output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_USAGE
        }
    };

    let _ = io::stdout().flush();
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        None => cmd_deploy(cli.config.as_deref(), DeployArgs::default()),
        Some(Commands::Deploy(args)) => cmd_deploy(cli.config.as_deref(), args),
        Some(Commands::Config { path }) => {
            cmd_config(cli.config.as_deref(), path)?;
            Ok(0)
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(0)
        }
    }
}

/// Run the deployment playbook.
fn cmd_deploy(config_path: Option<&std::path::Path>, args: DeployArgs) -> Result<i32> {
    let (config, source) = Config::load_with_override(config_path)?;
    if let ConfigSource::File(path) = &source {
        tracing::debug!(path = %path.display(), "Using config file");
    }

    let cli_vars = ExtraVars::parse_assignments(&args.extra_vars)?;

    let mut options = DeployOptions::from_config(&config)?.with_extra_vars(&cli_vars);
    if let Some(playbook) = args.playbook {
        options = options.with_playbook(playbook);
    }
    if let Some(host) = args.host {
        options = options.with_host(host);
    }
    if let Some(tool) = args.tool {
        options = options.with_tool(tool);
    }
    anyhow::ensure!(!options.host.trim().is_empty(), "Target host must not be empty");
    if args.dry_run {
        options = options.dry_run(OutputFormat::from_name(&args.format));
    }

    Ok(Deployer::new().run(&options))
}

/// Show configuration.
fn cmd_config(config_path: Option<&std::path::Path>, show_path: bool) -> Result<()> {
    if show_path {
        match config_path.map(std::path::Path::to_path_buf).or_else(Config::global_config_path) {
            Some(path) => println!("{}", path.display()),
            None => println!("Could not determine config directory"),
        }
        return Ok(());
    }

    let (config, source) = Config::load_with_override(config_path)?;
    match source {
        ConfigSource::File(path) => println!("# Loaded from {}", path.display()),
        ConfigSource::Defaults => println!("# Using defaults (no config file found)"),
    }

    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    print!("{content}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, playrun::APP_NAME, &mut io::stdout());
}
