//! Export subcommand - one text line per article from BioC XML or JSON

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use litcovid_bioc::{ExportConfig, ExportKind, InputFormat};
use litcovid_core::{SharedProgress, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Record to export
    #[arg(value_enum)]
    pub kind: KindArg,

    /// BioC XML or converted JSON input
    pub input: PathBuf,

    /// Text output, one record per line
    pub output: PathBuf,

    /// Input format (default: detected from the content, then the file extension)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Log progress every N documents
    #[arg(long)]
    pub progress_every: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum KindArg {
    /// PMID/Title Abstract
    Data,
    /// PMID/ref1/ref2/...
    Refs,
}

impl From<KindArg> for ExportKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Data => ExportKind::Data,
            KindArg::Refs => ExportKind::Refs,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
pub enum FormatArg {
    Xml,
    Json,
}

impl From<FormatArg> for InputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Xml => InputFormat::Xml,
            FormatArg::Json => InputFormat::Json,
        }
    }
}

pub fn run(args: ExportArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let export_config = ExportConfig {
        input: args.input,
        output: args.output,
        kind: args.kind.into(),
        format: args.format.map(Into::into),
        progress_every: args
            .progress_every
            .unwrap_or(config.export.progress_every),
    };

    let summary = litcovid_bioc::export(&export_config, progress)?;

    super::print_summary(
        "Export",
        &[
            ("Documents", fmt_num(summary.documents)),
            ("Lines", fmt_num(summary.written)),
            ("Without record", fmt_num(summary.skipped)),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
    progress.println(format!(
        "SUCCESS: Exported {} lines to {}",
        summary.written,
        export_config.output.display()
    ));

    Ok(())
}
