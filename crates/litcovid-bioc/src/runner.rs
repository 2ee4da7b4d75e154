//! File-level runners for conversion and export

use std::io::Write;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use litcovid_core::{ByteCounter, OutputSink, ProgressContext, fmt_num, open_input, shutdown_flag};

use crate::config::{ConvertConfig, ExportConfig, ExportKind};
use crate::convert::convert_stream;
use crate::export::export_stream;

/// Conversion summary
#[derive(Debug)]
pub struct ConvertSummary {
    pub documents: usize,
    pub passages: usize,
    pub skipped: usize,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

/// Export summary
#[derive(Debug)]
pub struct ExportSummary {
    pub documents: usize,
    pub written: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Advance the input bar and log every `every` documents
fn tick(pb: &ProgressBar, counter: &ByteCounter, documents: usize, every: usize) {
    pb.set_position(counter.load(Ordering::Relaxed));
    if every > 0 && documents % every == 0 {
        pb.set_message(format!("{} docs", fmt_num(documents)));
        log::info!("Processed {} documents...", fmt_num(documents));
    }
}

fn log_throughput(documents: usize, elapsed: Duration) {
    log::info!("Time: {:.1}s", elapsed.as_secs_f64());
    if documents > 0 && elapsed.as_secs_f64() > 0.0 {
        let rate = documents as f64 / elapsed.as_secs_f64();
        log::info!("Throughput: {:.0} documents/sec", rate);
    }
}

/// Convert a BioC XML file into a JSON array file
pub fn convert(config: &ConvertConfig, progress: &ProgressContext) -> Result<ConvertSummary> {
    let start = Instant::now();

    log::info!("Reading XML file: {}", config.input.display());
    log::info!("Output JSON file: {}", config.output.display());

    let (reader, counter, total) = open_input(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    let sink = OutputSink::create(&config.output, config.atomic)
        .with_context(|| format!("Failed to create {}", config.output.display()))?;
    let write_path = sink.write_path().to_path_buf();

    let pb = progress.file_bar(&display_name(&config.input), total);
    let mut last_documents = 0;

    let outcome = convert_stream(reader, sink, config, shutdown_flag(), |stats| {
        last_documents = stats.documents;
        tick(&pb, &counter, stats.documents, config.progress_every);
    });

    let (stats, sink) = match outcome {
        Ok(done) => done,
        Err(e) => {
            pb.abandon();
            log::warn!(
                "{} left incomplete after {} documents",
                write_path.display(),
                fmt_num(last_documents)
            );
            return Err(e).with_context(|| format!("Failed to convert {}", config.input.display()));
        }
    };

    let bytes_written = sink
        .finalize()
        .with_context(|| format!("Failed to finalize {}", config.output.display()))?;
    pb.finish_and_clear();

    let summary = ConvertSummary {
        documents: stats.documents,
        passages: stats.passages,
        skipped: stats.skipped,
        bytes_written,
        elapsed: start.elapsed(),
    };

    log::info!("=== BioC Conversion Summary ===");
    log::info!(
        "Documents: {} ({} skipped)",
        fmt_num(summary.documents),
        fmt_num(summary.skipped)
    );
    log::info!("Passages: {}", fmt_num(summary.passages));
    log::info!(
        "Output: {} ({} bytes)",
        config.output.display(),
        fmt_num(summary.bytes_written as usize)
    );
    log_throughput(summary.documents, summary.elapsed);

    Ok(summary)
}

/// Export data or refs lines from a BioC XML or JSON file
pub fn export(config: &ExportConfig, progress: &ProgressContext) -> Result<ExportSummary> {
    let start = Instant::now();
    let label = match config.kind {
        ExportKind::Data => "data",
        ExportKind::Refs => "refs",
    };

    let (mut reader, counter, total) = open_input(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    let format = config
        .input_format(&mut reader)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;

    log::info!(
        "Exporting {label} from {} ({format:?}) to {}",
        config.input.display(),
        config.output.display()
    );
    let mut sink = OutputSink::create(&config.output, false)
        .with_context(|| format!("Failed to create {}", config.output.display()))?;

    let pb = progress.file_bar(&display_name(&config.input), total);

    let outcome = export_stream(
        reader,
        format,
        config.kind,
        &mut sink,
        shutdown_flag(),
        |stats| tick(&pb, &counter, stats.documents, config.progress_every),
    );

    let stats = match outcome {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon();
            return Err(e).with_context(|| format!("Failed to export {}", config.input.display()));
        }
    };

    sink.flush()?;
    sink.finalize()
        .with_context(|| format!("Failed to finalize {}", config.output.display()))?;
    pb.finish_and_clear();

    let summary = ExportSummary {
        documents: stats.documents,
        written: stats.written,
        skipped: stats.skipped,
        elapsed: start.elapsed(),
    };

    log::info!("=== BioC Export Summary ===");
    log::info!("Documents: {}", fmt_num(summary.documents));
    log::info!(
        "Lines: {} ({} without record)",
        fmt_num(summary.written),
        fmt_num(summary.skipped)
    );
    log_throughput(summary.documents, summary.elapsed);

    Ok(summary)
}
