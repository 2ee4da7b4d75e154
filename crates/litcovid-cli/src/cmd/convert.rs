//! Convert subcommand - BioC XML to JSON array

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use litcovid_bioc::ConvertConfig;
use litcovid_bioc::writer::Layout;
use litcovid_core::{SharedProgress, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// BioC XML input (`*.gz` is decompressed, `-` reads stdin)
    pub input: PathBuf,

    /// JSON array output
    pub output: PathBuf,

    /// Indent each document by two spaces inside the array
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// One compact document per line, even if the config file says pretty
    #[arg(long, overrides_with = "pretty")]
    pub no_pretty: bool,

    /// Drop documents with neither id nor passages
    #[arg(long, overrides_with = "no_skip_empty")]
    pub skip_empty: bool,

    /// Keep empty documents, even if the config file says to skip them
    #[arg(long, overrides_with = "skip_empty")]
    pub no_skip_empty: bool,

    /// Write to <OUTPUT>.tmp and rename only on success
    #[arg(long, overrides_with = "no_atomic")]
    pub atomic: bool,

    /// Write the output in place, even if the config file says atomic
    #[arg(long, overrides_with = "atomic")]
    pub no_atomic: bool,

    /// Log progress every N documents
    #[arg(long)]
    pub progress_every: Option<usize>,
}

/// Resolve an `--x`/`--no-x` pair against the config file value
fn switch(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

impl ConvertArgs {
    /// Merge with config file values; a flag in either direction wins
    fn into_config(self, config: &Config) -> ConvertConfig {
        let pretty = switch(self.pretty, self.no_pretty, config.convert.pretty);
        ConvertConfig {
            input: self.input,
            output: self.output,
            layout: if pretty { Layout::Pretty } else { Layout::Compact },
            skip_empty: switch(self.skip_empty, self.no_skip_empty, config.convert.skip_empty),
            atomic: switch(self.atomic, self.no_atomic, config.convert.atomic),
            progress_every: self
                .progress_every
                .unwrap_or(config.convert.progress_every),
        }
    }
}

pub fn run(args: ConvertArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let convert_config = args.into_config(config);
    let summary = litcovid_bioc::convert(&convert_config, progress)?;

    super::print_summary(
        "Conversion",
        &[
            ("Documents", fmt_num(summary.documents)),
            ("Passages", fmt_num(summary.passages)),
            ("Skipped", fmt_num(summary.skipped)),
            ("Bytes", fmt_num(summary.bytes_written as usize)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
    progress.println(format!(
        "Conversion complete! {} documents written to {}",
        summary.documents,
        convert_config.output.display()
    ));

    Ok(())
}
