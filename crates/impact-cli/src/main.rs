//! impact — before/after policy-impact analysis of simulation event traces.
//!
//! Exit codes:
//!   0 - Success
//!   1 - An input could not be read or parsed, or a strict policy was violated

mod cli;
mod config;
mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use cli::{Args, Command};
use config::{Config, DEFAULT_CONFIG_FILE};

fn main() {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig { force } = args.command {
        let path = args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if let Err(e) = handle_init_config(&path, force) {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);

    info!("impact v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_analysis(&args) {
        error!("Analysis failed: {:#}", e);
        std::process::exit(1);
    }
}

fn run_analysis(args: &Args) -> Result<()> {
    let mut config = Config::resolve(args)?;
    config.merge_with_args(args);
    debug!("Configuration: {:?}", config);
    run::run(&args.command, &config)
}

/// Write a default configuration file.
fn handle_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists. Remove it, edit it, or pass --force.", path.display());
    }

    let content = Config::default_toml()?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {} with default settings.", path.display());
    Ok(())
}

/// Logs go to stderr so text reports on stdout stay clean.  `RUST_LOG`
/// overrides the level chosen by `-v` / `-q`.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
