//! devkey — derive and persist device keys.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use devkey::config;
use devkey::constants;
use devkey::derive;
use devkey::env;
use devkey::output::Report;
use devkey::provision::Provisioner;
use devkey::store::{FileSink, FileSource, KeySink};

use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cli::args::{Cli, Command, ComputeArgs, OutputFormat};
use config::Config;
use env::Env;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let work_dir = std::env::current_dir().context("could not determine working directory")?;
    let loaded = Config::load(Some(&work_dir), &Env::real())
        .context("failed to load configuration")?;
    let mut config = loaded.config;
    config.apply_overrides(cli.id_file, cli.key_file, cli.verbose);

    cli::init_logging(&config.log.level, &loaded.warnings);
    tracing::debug!(?config, "configuration resolved");

    let format = cli.format;
    match cli.command.unwrap_or(Command::Generate) {
        Command::Generate => run_generate(&config, &work_dir, format),
        Command::Compute(args) => run_compute(args, format),
        Command::Verify => run_verify(&config, &work_dir, format),
        Command::Show => run_show(&config, &work_dir, format),
        Command::Config => run_config(config, &work_dir, format),
        Command::Version => run_version(),
    }
}

fn provisioner(config: &Config, work_dir: &Path) -> Provisioner<FileSource, FileSink> {
    Provisioner::new(
        FileSource::new(config.id_path(work_dir)),
        FileSink::new(config.key_path(work_dir)),
    )
}

/// Read the identifier file, derive the key, and persist it.
fn run_generate(config: &Config, work_dir: &Path, format: OutputFormat) -> Result<()> {
    let provisioned = provisioner(config, work_dir)
        .provision()
        .context("failed to generate device key")?;
    print!("{}", format.render(&Report::Provisioned(provisioned)));
    Ok(())
}

/// Derive the key for a literal identifier.
fn run_compute(args: ComputeArgs, format: OutputFormat) -> Result<()> {
    let trace = derive::trace(&args.device_id).context("cannot derive a device key")?;
    print!(
        "{}",
        format.render(&Report::Computed {
            device_id: args.device_id,
            trace,
            show_trace: args.trace,
        })
    );
    Ok(())
}

/// Check the persisted key against the identifier.
fn run_verify(config: &Config, work_dir: &Path, format: OutputFormat) -> Result<()> {
    let verification = provisioner(config, work_dir)
        .verify()
        .context("failed to verify device key")?;
    let matches = verification.matches;
    let location = verification.key_location.clone();
    print!("{}", format.render(&Report::Verified(verification)));

    if !matches {
        bail!("device key at {location} does not match the device identifier");
    }
    Ok(())
}

/// Print the persisted key.
fn run_show(config: &Config, work_dir: &Path, format: OutputFormat) -> Result<()> {
    let sink = FileSink::new(config.key_path(work_dir));
    let device_key = sink.read_key().context("failed to read device key")?;
    print!(
        "{}",
        format.render(&Report::Stored {
            key_location: sink.location(),
            device_key,
        })
    );
    Ok(())
}

/// Print the resolved configuration.
fn run_config(config: Config, work_dir: &Path, format: OutputFormat) -> Result<()> {
    let id_path = config.id_path(work_dir);
    let key_path = config.key_path(work_dir);
    print!(
        "{}",
        format.render(&Report::Config {
            config,
            id_path,
            key_path,
        })
    );
    Ok(())
}

/// Print version and build information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    println!("{}     {}", "target:".dimmed(), constants::TARGET);
    Ok(())
}
