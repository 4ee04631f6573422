//! Thin CLI harness around the bootvisor library.
//!
//! Loads a flat `key=value` bootstrap resource, then either:
//! - runs static configuration checks (`--config-check`): one report block per
//!   check, exit status 1 if any is fatal;
//! - boots management-only (`--management-only`): no runtime unit is created,
//!   only auxiliary components come up;
//! - boots normally: creates a unit through the wired config manager (none is
//!   wired in the standalone harness, so plain boots degrade per
//!   `start.quietly` or fail fast).
//!
//! Runs until a termination signal, then drives the coordinated shutdown.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use bootvisor::checks::{default_checks, run_checks};
use bootvisor::{BootError, Config, Orchestrator, Subscribe, UnitRef};

#[derive(Parser, Debug)]
#[command(name = "bootvisor", version, about = "Lifecycle orchestration harness")]
struct Args {
    /// Bootstrap resource: flat key=value lines ('#' starts a comment).
    #[arg(long, default_value = "bootstrap.properties")]
    config: PathBuf,

    /// Run static configuration checks and exit (no unit is started).
    #[arg(long)]
    config_check: bool,

    /// Skip creating a local runtime unit; start only management components.
    #[arg(long)]
    management_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match load_bootstrap(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("bootvisor: cannot load {}: {e}", args.config.display());
            return ExitCode::FAILURE;
        }
    };

    #[cfg(feature = "logging")]
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(bootvisor::LogWriter)];
    #[cfg(not(feature = "logging"))]
    let subscribers: Vec<Arc<dyn Subscribe>> = Vec::new();

    let orch = Orchestrator::builder(cfg.clone())
        .with_subscribers(subscribers)
        .build();

    if args.config_check {
        return config_check(&cfg, &orch);
    }

    let quietly = cfg.start_quietly();
    let unit = if args.management_only {
        None
    } else {
        match orch.create_unit().await {
            Ok(unit) => Some(unit),
            Err(e) if quietly => {
                print_cause_chain(&e);
                eprintln!("bootvisor: continuing management-only (start.quietly)");
                None
            }
            Err(e) => {
                print_cause_chain(&e);
                return ExitCode::FAILURE;
            }
        }
    };

    if let Err(e) = boot(&orch, unit).await {
        print_cause_chain(&e);
        if !quietly {
            return ExitCode::FAILURE;
        }
        eprintln!("bootvisor: continuing degraded (start.quietly)");
    }

    let report = orch.run_until_shutdown().await;
    if !report.stuck.is_empty() {
        eprintln!("bootvisor: units still stuck at exit: {:?}", report.stuck);
    }
    ExitCode::SUCCESS
}

/// init + start, fail fast.
async fn boot(orch: &Orchestrator, unit: Option<UnitRef>) -> Result<(), BootError> {
    orch.init(unit).await?;
    orch.start().await
}

/// Runs every check, prints one report block per check.
fn config_check(cfg: &Config, orch: &Orchestrator) -> ExitCode {
    let reports = run_checks(cfg, orch.resolver(), &default_checks());
    for report in &reports {
        print!("{}", report.render());
    }
    if reports.iter().any(|r| r.fatal) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Reads a flat `key=value` resource. Blank lines and '#' comments skipped.
fn load_bootstrap(path: &PathBuf) -> std::io::Result<Config> {
    let raw = std::fs::read_to_string(path)?;
    let mut map = HashMap::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(Config::from_map(map))
}

/// Prints the full cause chain of a boot failure to the error stream.
fn print_cause_chain(err: &dyn StdError) {
    eprintln!("bootvisor: boot failed: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
