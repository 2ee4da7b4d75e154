//! LitCovid Core - Common infrastructure for the BioC conversion tools
//!
//! Logging, progress reporting, input/output plumbing and graceful
//! shutdown shared by the converter and the export commands.

pub mod input;
pub mod logging;
pub mod progress;
pub mod shutdown;
pub mod sink;

// Re-exports for convenience
pub use input::{ByteCounter, CountingReader, InputReader, open_input};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use shutdown::{install_signal_handlers, shutdown_flag};
pub use sink::{OutputSink, cleanup_tmp_file, tmp_path_for};
