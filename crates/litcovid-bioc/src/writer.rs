//! Incremental JSON array writer
//!
//! Writes `[`, then each document as it arrives, then `]` on
//! [`finish`](JsonArrayWriter::finish). A writer dropped without `finish`
//! leaves the array unterminated.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::model::Document;

/// Output layout of the JSON array
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// One compact document per line
    #[default]
    Compact,
    /// Two-space indented documents, nested one level inside the array
    Pretty,
}

pub struct JsonArrayWriter<W: Write> {
    inner: W,
    layout: Layout,
    count: usize,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Start the array by writing the opening bracket.
    pub fn new(mut inner: W, layout: Layout) -> Result<Self> {
        inner.write_all(b"[")?;
        Ok(Self {
            inner,
            layout,
            count: 0,
        })
    }

    /// Append one document.
    pub fn write_document(&mut self, doc: &Document) -> Result<()> {
        let sep: &[u8] = if self.count == 0 { b"\n" } else { b",\n" };
        self.inner.write_all(sep)?;
        match self.layout {
            Layout::Compact => serde_json::to_writer(&mut self.inner, doc)?,
            Layout::Pretty => {
                self.inner.write_all(b"  ")?;
                let mut ser = serde_json::Serializer::with_formatter(
                    Indented::new(&mut self.inner),
                    PrettyFormatter::with_indent(b"  "),
                );
                doc.serialize(&mut ser)?;
            }
        }
        self.count += 1;
        Ok(())
    }

    /// Documents written so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush buffered output without closing the array
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Close the array and return the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.write_all(b"\n]\n")?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Writer adapter that indents every line after the first by two spaces
struct Indented<W> {
    inner: W,
}

impl<W: Write> Indented<W> {
    fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for Indented<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.inner.write_all(&rest[..=pos])?;
            self.inner.write_all(b"  ")?;
            rest = &rest[pos + 1..];
        }
        self.inner.write_all(rest)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
