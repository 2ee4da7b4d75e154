//! litcovid - LitCovid BioC conversion and export tool
//!
//! Converts BioC XML dumps into JSON arrays and exports per-article
//! data and citation lines from either format.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

/// Exit status after an operator interrupt
const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Parser)]
#[command(name = "litcovid")]
#[command(about = "Streaming conversion and export tools for LitCovid BioC dumps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Disable progress bars even on a terminal
    #[arg(long, global = true)]
    no_progress: bool,

    /// Config file path (default: ./litcovid.toml or ~/.config/litcovid/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a BioC XML file into a JSON array
    Convert(cmd::convert::ConvertArgs),
    /// Export data or refs lines from BioC XML or JSON
    Export(cmd::export::ExportArgs),
    /// Show current configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(if cli.no_progress {
        litcovid_core::ProgressContext::with_tty(false)
    } else {
        litcovid_core::ProgressContext::new()
    });

    // Logging: warn on a TTY (the progress bar shows activity), info otherwise.
    // --debug raises both to debug.
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    litcovid_core::init_logging(quiet, cli.debug, multi);

    if let Err(e) = litcovid_core::install_signal_handlers() {
        log::warn!("Failed to install signal handlers: {e}");
    }

    match run(cli, &progress) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let interrupted = e
                .downcast_ref::<litcovid_bioc::Error>()
                .is_some_and(litcovid_bioc::Error::is_interrupted);
            if interrupted {
                log::warn!("Interrupted: {e:#}");
                ExitCode::from(INTERRUPTED_EXIT_CODE)
            } else {
                log::error!("Fatal error: {e:#}");
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli, progress: &litcovid_core::SharedProgress) -> Result<()> {
    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Convert(args) => cmd::convert::run(args, &config, progress),
        Command::Export(args) => cmd::export::run(args, &config, progress),
        Command::Config => {
            cmd::print_summary(
                "Setting",
                &[
                    (
                        "convert.progress_every",
                        config.convert.progress_every.to_string(),
                    ),
                    ("convert.pretty", config.convert.pretty.to_string()),
                    ("convert.skip_empty", config.convert.skip_empty.to_string()),
                    ("convert.atomic", config.convert.atomic.to_string()),
                    (
                        "export.progress_every",
                        config.export.progress_every.to_string(),
                    ),
                ],
            );
            Ok(())
        }
    }
}
