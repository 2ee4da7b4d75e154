//! Line-oriented record export from BioC XML or a converted JSON array

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{ExportKind, InputFormat};
use crate::error::{Error, Result};
use crate::extract::{article_record, refs_record};
use crate::json_reader::for_each_document;
use crate::model::Document;
use crate::parser::BiocReader;

/// Counters for one export
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    /// Documents read from the input
    pub documents: usize,
    /// Lines written
    pub written: usize,
    /// Documents without a record (no PMID, or no references for refs)
    pub skipped: usize,
}

/// Render the export line for one document, if it has a record
pub fn record_line(doc: &Document, kind: ExportKind) -> Option<String> {
    match kind {
        ExportKind::Data => article_record(doc).map(|r| r.to_line()),
        ExportKind::Refs => refs_record(doc).map(|r| r.to_line()),
    }
}

/// Read documents from `input` and write one line per record to `output`.
pub fn export_stream<R, W>(
    input: R,
    format: InputFormat,
    kind: ExportKind,
    output: &mut W,
    stop: &AtomicBool,
    mut on_progress: impl FnMut(&ExportStats),
) -> Result<ExportStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = ExportStats::default();

    let mut handle = |doc: Document| -> Result<()> {
        if stop.load(Ordering::Relaxed) {
            return Err(Error::Interrupted);
        }
        stats.documents += 1;
        match record_line(&doc, kind) {
            Some(line) => {
                writeln!(output, "{line}")?;
                stats.written += 1;
            }
            None => stats.skipped += 1,
        }
        on_progress(&stats);
        Ok(())
    };

    let outcome = match format {
        InputFormat::Xml => BiocReader::new(input).try_for_each(|doc| handle(doc?)),
        InputFormat::Json => for_each_document(input, &mut handle).map(|_| ()),
    };
    output.flush()?;
    outcome?;

    Ok(stats)
}
