//! Cairn CLI: inspect cache layouts and filesystem snapshots.
//!
//! Provides `cairn layout` to print every cache directory the registry
//! resolves, `cairn history` to show an entry's format history, and
//! `cairn snapshot` to snapshot a directory and print its hashes.

#![warn(missing_docs)]

mod history;
mod layout;
mod registry;
mod snapshot;
mod walk;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Cairn: incremental-build snapshots and cache layouts.
#[derive(Parser, Debug)]
#[command(name = "cairn", version, about = "Cairn cache layout and snapshot tool")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a layout configuration file. Defaults to the built-in layout.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved directory of every cache layout entry.
    Layout(LayoutArgs),
    /// Print the version history of one cache layout entry.
    History(HistoryArgs),
    /// Snapshot a directory and print its file hashes.
    Snapshot(SnapshotArgs),
}

/// Arguments for the `cairn layout` subcommand.
#[derive(Parser, Debug)]
pub struct LayoutArgs {
    /// Base cache directory the entries resolve under.
    #[arg(short, long, default_value = ".")]
    pub base: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `cairn history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Entry to show, as a `/`-separated name chain (e.g. `modules/metadata`).
    pub entry: String,

    /// Also report the version written by this release (e.g. `4.5.1`).
    #[arg(short, long)]
    pub release: Option<String>,
}

/// Arguments for the `cairn snapshot` subcommand.
#[derive(Parser, Debug)]
pub struct SnapshotArgs {
    /// Directory (or file) to snapshot.
    pub path: PathBuf,

    /// Directory names to leave out (e.g. `--exclude target .git`).
    #[arg(long, num_args = 1..)]
    pub exclude: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Resolved global arguments passed to each subcommand.
pub struct GlobalArgs {
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Enable debug logging.
    pub verbose: bool,
    /// Layout configuration file, if given.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Layout(ref args) => layout::run(args, &global),
        Command::History(ref args) => history::run(args, &global),
        Command::Snapshot(ref args) => snapshot::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` overrides the level chosen by
/// `--verbose` / `--quiet`.
fn init_logging(global: &GlobalArgs) {
    let default_level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
