//! Local input opening with optional gzip decompression and a byte counter.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::read::MultiGzDecoder;

/// Buffer size for the raw file reader
const READ_BUFFER: usize = 256 * 1024;

/// Shared count of raw (on-disk) bytes consumed
pub type ByteCounter = Arc<AtomicU64>;

/// Buffered input stream handed to the parsers
pub type InputReader = Box<dyn BufRead + Send>;

/// Reader adapter that counts bytes pulled from the inner reader
pub struct CountingReader<R> {
    inner: R,
    counter: ByteCounter,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R, counter: ByteCounter) -> Self {
        Self { inner, counter }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Whether a path names gzip input (`*.gz`)
pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Open a local file (or `-` for stdin), gunzipping `*.gz` on the fly.
///
/// Returns (reader, byte_counter, total_bytes). The counter and total are
/// in raw bytes, before decompression.
pub fn open_input(path: &Path) -> io::Result<(InputReader, ByteCounter, Option<u64>)> {
    let counter = ByteCounter::default();

    if path.as_os_str() == "-" {
        let stdin = CountingReader::new(io::stdin(), counter.clone());
        return Ok((Box::new(BufReader::with_capacity(READ_BUFFER, stdin)), counter, None));
    }

    let file = File::open(path)?;
    let total = file.metadata().ok().map(|m| m.len());
    let raw = CountingReader::new(file, counter.clone());

    let reader: InputReader = if is_gzip(path) {
        let decoder = MultiGzDecoder::new(BufReader::with_capacity(READ_BUFFER, raw));
        Box::new(BufReader::with_capacity(READ_BUFFER, decoder))
    } else {
        Box::new(BufReader::with_capacity(READ_BUFFER, raw))
    };

    Ok((reader, counter, total))
}
