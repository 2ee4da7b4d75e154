//! Output sink: buffered file writer with optional atomic tmp→rename

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffer size for the output writer
const WRITE_BUFFER: usize = 256 * 1024;

/// Path of the temporary file used for atomic writes (`<output>.tmp`)
pub fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Remove a stale `<output>.tmp` left by an earlier failed run
pub fn cleanup_tmp_file(path: &Path) -> io::Result<bool> {
    let tmp = tmp_path_for(path);
    if tmp.exists() {
        fs::remove_file(&tmp)?;
        log::info!("Removed stale {}", tmp.display());
        return Ok(true);
    }
    Ok(false)
}

/// Buffered output file.
///
/// The file handle is released when the sink is finalized or dropped. A
/// dropped sink flushes what it buffered and leaves the file in place, so a
/// failed run keeps its partial output.
pub struct OutputSink {
    writer: BufWriter<File>,
    write_path: PathBuf,
    final_path: PathBuf,
    bytes_written: u64,
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("final_path", &self.final_path)
            .field("bytes_written", &self.bytes_written)
            .finish_non_exhaustive()
    }
}

impl OutputSink {
    /// Create the output file. With `atomic`, writes go to `<path>.tmp`
    /// and only [`finalize`](Self::finalize) moves them to `path`.
    pub fn create(path: &Path, atomic: bool) -> io::Result<Self> {
        let write_path = if atomic {
            cleanup_tmp_file(path)?;
            tmp_path_for(path)
        } else {
            path.to_path_buf()
        };

        let file = File::create(&write_path)?;
        Ok(Self {
            writer: BufWriter::with_capacity(WRITE_BUFFER, file),
            write_path,
            final_path: path.to_path_buf(),
            bytes_written: 0,
        })
    }

    /// Path currently being written
    pub fn write_path(&self) -> &Path {
        &self.write_path
    }

    /// Flush, sync and (for atomic sinks) rename into place.
    pub fn finalize(self) -> io::Result<u64> {
        let bytes = self.bytes_written;
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);
        if self.write_path != self.final_path {
            fs::rename(&self.write_path, &self.final_path)?;
        }
        Ok(bytes)
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
