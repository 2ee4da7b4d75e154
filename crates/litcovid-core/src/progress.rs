//! Progress reporting for TTY and non-TTY environments.
//!
//! TTY mode: one indicatif byte bar over the input file.
//! Non-TTY mode: hidden bars; the periodic log lines are the only progress.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Input bar: bytes consumed out of the file size, document count in the message
fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{prefix:<20.dim} {bar:30.green/dim} {binary_bytes:>7}/{binary_total_bytes:7} {eta:>4} {wide_msg:.dim}")
        .expect("invalid template")
        .progress_chars("--")
}

/// Spinner used when the input size is unknown (stdin, pipes)
fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix:<20.dim} {binary_bytes:>7} {wide_msg:.dim}")
        .expect("invalid template")
}

/// Central progress context
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Create new context, detecting TTY automatically.
    pub fn new() -> Self {
        Self::with_tty(std::io::stderr().is_terminal())
    }

    /// Create a context with explicit TTY mode. Used by tests and `--no-progress`.
    pub fn with_tty(is_tty: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty,
        }
    }

    /// Create the bar tracking bytes read from an input file.
    ///
    /// `total` is the on-disk size when known. For gzip input this is the
    /// compressed size, so the bar position must be fed compressed bytes too.
    pub fn file_bar(&self, name: &str, total: Option<u64>) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }

        let pb = match total {
            Some(total) => {
                let pb = self.multi.add(ProgressBar::new(total));
                pb.set_style(bar_style());
                pb
            }
            None => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(spinner_style());
                pb.enable_steady_tick(Duration::from_millis(80));
                pb
            }
        };
        // Truncate long names to keep the bar aligned
        let display = if name.len() > 20 {
            name.char_indices()
                .take_while(|(i, _)| *i < 20)
                .map(|(_, c)| c)
                .collect()
        } else {
            name.to_string()
        };
        pb.set_prefix(display);
        pb
    }

    /// Print a line above managed progress bars.
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.is_tty {
            let _ = self.multi.println(msg);
        } else {
            eprintln!("{}", msg.as_ref());
        }
    }

    /// Whether running in TTY mode.
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Get reference to `MultiProgress` for log bridge.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe wrapper for `ProgressContext`.
pub type SharedProgress = Arc<ProgressContext>;

/// Format number with thousand separators.
pub fn fmt_num(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_num_small() {
        assert_eq!(fmt_num(0), "0");
        assert_eq!(fmt_num(7), "7");
        assert_eq!(fmt_num(999), "999");
    }

    #[test]
    fn fmt_num_thousands() {
        assert_eq!(fmt_num(1_000), "1,000");
        assert_eq!(fmt_num(123_456), "123,456");
        assert_eq!(fmt_num(1_000_000), "1,000,000");
    }

    #[test]
    fn non_tty_bar_is_hidden() {
        let ctx = ProgressContext::with_tty(false);
        let pb = ctx.file_bar("litcovid2BioCXML", Some(1024));
        assert!(pb.is_hidden());
    }

    #[test]
    fn tty_bar_keeps_total() {
        let ctx = ProgressContext::with_tty(true);
        let pb = ctx.file_bar("a-very-long-input-file-name.xml", Some(4096));
        assert_eq!(pb.length(), Some(4096));
        assert_eq!(pb.prefix().chars().count(), 20);
    }
}
