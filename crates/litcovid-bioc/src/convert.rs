//! Streaming XML → JSON array conversion
//!
//! Parser and writer run in lockstep: each document is assembled, written
//! and dropped before the next input event is read.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ConvertConfig;
use crate::error::{Error, Result};
use crate::parser::BiocReader;
use crate::writer::JsonArrayWriter;

/// Counters for one conversion
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    /// Documents written to the array
    pub documents: usize,
    /// Passages across written documents
    pub passages: usize,
    /// Empty documents dropped by `skip_empty`
    pub skipped: usize,
}

/// Convert a BioC XML stream into a JSON array on `output`.
///
/// `stop` is polled between documents; when set, the output is flushed
/// without its closing bracket and [`Error::Interrupted`] is returned.
/// `on_progress` runs after every written document.
pub fn convert_stream<R, W>(
    input: R,
    output: W,
    config: &ConvertConfig,
    stop: &AtomicBool,
    mut on_progress: impl FnMut(&ConvertStats),
) -> Result<(ConvertStats, W)>
where
    R: BufRead,
    W: Write,
{
    let mut writer = JsonArrayWriter::new(output, config.layout)?;
    let mut stats = ConvertStats::default();

    for doc in BiocReader::new(input) {
        if stop.load(Ordering::Relaxed) {
            writer.flush()?;
            return Err(Error::Interrupted);
        }
        let doc = match doc {
            Ok(doc) => doc,
            Err(e) => {
                // Keep what was converted so far on disk
                writer.flush()?;
                return Err(e);
            }
        };

        if config.skip_empty && doc.is_empty() {
            stats.skipped += 1;
            log::debug!("Skipping empty document after {} written", stats.documents);
            continue;
        }

        writer.write_document(&doc)?;
        stats.documents += 1;
        stats.passages += doc.passages.len();
        on_progress(&stats);
    }

    let output = writer.finish()?;
    Ok((stats, output))
}
