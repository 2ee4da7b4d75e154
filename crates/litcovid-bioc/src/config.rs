//! Conversion and export configuration

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crate::writer::Layout;

/// Runtime configuration for XML → JSON conversion
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// BioC XML input (`*.gz` is decompressed, `-` is stdin)
    pub input: PathBuf,
    /// JSON array output
    pub output: PathBuf,
    /// JSON layout of array elements
    pub layout: Layout,
    /// Drop documents with neither id nor passages
    pub skip_empty: bool,
    /// Write to `<output>.tmp` and rename on success
    pub atomic: bool,
    /// Log a progress line every N documents
    pub progress_every: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("litcovid2BioCXML"),
            output: PathBuf::from("litcovid2BioCJSON"),
            layout: Layout::Compact,
            skip_empty: false,
            atomic: false,
            progress_every: 100,
        }
    }
}

/// Which record an export emits per article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// `PMID/Title Abstract`
    Data,
    /// `PMID/ref1/ref2/...`
    Refs,
}

/// Format of an export input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// BioC XML
    Xml,
    /// Converted JSON array
    Json,
}

/// UTF-8 byte order mark
const BOM: &[u8] = b"\xEF\xBB\xBF";

impl InputFormat {
    /// Peek at the first significant byte of `reader`: `[` is JSON, `<` is XML.
    ///
    /// Leading whitespace is consumed; nothing else is. Returns `None` for
    /// empty input or any other leading byte.
    pub fn sniff<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<Self>> {
        let mut at_start = true;
        loop {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            let skip = if at_start && buf.starts_with(BOM) { BOM.len() } else { 0 };
            at_start = false;
            match buf[skip..].iter().position(|b| !b.is_ascii_whitespace()) {
                Some(i) => {
                    return Ok(match buf[skip + i] {
                        b'[' => Some(Self::Json),
                        b'<' => Some(Self::Xml),
                        _ => None,
                    });
                }
                None if skip == 0 => {
                    let len = buf.len();
                    reader.consume(len);
                }
                // Keep the BOM for the XML reader, and look past it
                None => return Ok(None),
            }
        }
    }

    /// Guess from the file name: `*.json` and `*.json.gz` are JSON, anything else XML.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".json") {
            Self::Json
        } else {
            Self::Xml
        }
    }
}

/// Runtime configuration for record export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: ExportKind,
    /// Input format; guessed from the input path when unset
    pub format: Option<InputFormat>,
    /// Log a progress line every N documents
    pub progress_every: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("litcovid2BioCJSON"),
            output: PathBuf::from("result1.txt"),
            kind: ExportKind::Data,
            format: None,
            progress_every: 10_000,
        }
    }
}

impl ExportConfig {
    /// Explicit format, else the one sniffed from the input stream, else the
    /// one guessed from the input path.
    pub fn input_format<R: BufRead + ?Sized>(&self, reader: &mut R) -> io::Result<InputFormat> {
        if let Some(format) = self.format {
            return Ok(format);
        }
        Ok(InputFormat::sniff(reader)?.unwrap_or_else(|| InputFormat::from_path(&self.input)))
    }
}
