//! IID CLI
//!
//! Command definitions and handlers for the `iid` binary. Handlers write
//! their results to any [`Write`] so they can be exercised without a
//! terminal.
//!
//! ```text
//! iid check --metadata metadata.json [--set 1] [--root /mnt/stage] [--format json]
//! iid modes
//! ```

#![warn(unreachable_pub)]

pub mod logging;
mod report;

pub use report::Row;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use iid_core::{Engine, EngineConfig};
use iid_metadata::{UpdateObject, UpdatePackage};
use iid_modes::ModeRegistry;
use iid_probe::{OsFs, TargetFs};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "iid", version, about = "Decide which update objects need installing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate every object of an installation set
    Check(CheckArgs),
    /// List registered install modes
    Modes,
}

/// Arguments of `iid check`
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Update package metadata (JSON)
    #[arg(long, env = "IID_METADATA")]
    pub metadata: PathBuf,

    /// Installation set to evaluate
    #[arg(long, default_value_t = 0)]
    pub set: usize,

    /// Directory target paths are resolved below
    #[arg(long, env = "IID_ROOT")]
    pub root: Option<PathBuf>,

    /// Result format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Evaluate objects one at a time
    #[arg(long)]
    pub sequential: bool,
}

/// Result format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab separated lines
    Text,
    /// JSON array
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable
    Text,
    /// One JSON object per line
    Json,
}

/// Run a parsed command
///
/// Returns `false` when any object failed to evaluate.
///
/// # Errors
/// Returns error if the metadata cannot be loaded or output cannot be written.
/// Per-object failures are reported in the output instead.
pub fn run(command: &Command, out: &mut dyn Write) -> Result<bool> {
    match command {
        Command::Check(args) => check(args, out),
        Command::Modes => modes(&ModeRegistry::with_defaults(), out),
    }
}

fn check(args: &CheckArgs, out: &mut dyn Write) -> Result<bool> {
    let bytes = std::fs::read(&args.metadata)
        .with_context(|| format!("failed to read {}", args.metadata.display()))?;
    let package = UpdatePackage::parse(&bytes)
        .with_context(|| format!("failed to parse {}", args.metadata.display()))?;
    let objects = package.objects(args.set)?;
    tracing::info!(
        "Checking {} objects of installation set {} (package {})",
        objects.len(),
        args.set,
        package.version
    );

    let fs: Arc<dyn TargetFs> = match &args.root {
        Some(root) => {
            tracing::debug!("Resolving targets below {}", root.display());
            Arc::new(OsFs::rooted(root))
        }
        None => Arc::new(OsFs::new()),
    };
    let config = EngineConfig::new().with_parallel(!args.sequential);
    let engine = Engine::new(ModeRegistry::with_defaults(), fs).with_config(config);

    let rows: Vec<Row> = objects
        .iter()
        .zip(engine.evaluate_all(objects))
        .map(|(object, result)| Row::new(object, &result))
        .collect();

    match args.format {
        OutputFormat::Text => report::write_text(&rows, out)?,
        OutputFormat::Json => report::write_json(&rows, out)?,
    }

    let failed = rows.iter().filter(|row| row.is_error()).count();
    if failed > 0 {
        tracing::error!("{} of {} objects failed", failed, rows.len());
    }
    Ok(failed == 0)
}

fn modes(registry: &ModeRegistry, out: &mut dyn Write) -> Result<bool> {
    for name in registry.names() {
        // Any target will do; only the capability is of interest
        let probe = UpdateObject::new(name).with_target("/");
        let capability = match registry.resolve(&probe) {
            Ok(handler) if handler.target_getter().is_some() => "target",
            _ => "-",
        };
        writeln!(out, "{name}\t{capability}")?;
    }
    Ok(true)
}
