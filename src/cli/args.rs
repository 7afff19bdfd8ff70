//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use devkey::output::{OutputRenderer, Report};

/// Derive and persist the device key for a provisioned device identifier.
#[derive(Parser, Debug)]
#[command(name = "devkey", version = devkey::constants::VERSION)]
pub struct Cli {
    /// File holding the device identifier (default: ./DEVICE_ID).
    #[arg(long, global = true)]
    pub id_file: Option<PathBuf>,

    /// File the derived key is written to (default: ./DEVICE_KEY).
    #[arg(long, global = true)]
    pub key_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, default_value = "terminal")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Read the identifier file, derive the key, and write the key file (default).
    Generate,

    /// Derive the key for a literal identifier without touching any files.
    Compute(ComputeArgs),

    /// Check that the key file matches the identifier file.
    Verify,

    /// Print the persisted key.
    Show,

    /// Print the resolved configuration.
    Config,

    /// Print version and build information.
    Version,
}

/// Arguments for the `compute` subcommand.
#[derive(Parser, Debug)]
pub struct ComputeArgs {
    /// Device identifier to derive a key for.
    pub device_id: String,

    /// Also print the intermediate digests.
    #[arg(long, default_value_t = false)]
    pub trace: bool,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render a report using the renderer for this format.
    pub fn render(&self, report: &Report) -> String {
        match self {
            OutputFormat::Terminal => devkey::output::terminal::TerminalRenderer.render(report),
            OutputFormat::Json => devkey::output::json::JsonRenderer.render(report),
        }
    }
}
