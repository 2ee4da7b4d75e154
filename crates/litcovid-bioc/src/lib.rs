//! LitCovid BioC - streaming BioC XML tooling
//!
//! Converts LitCovid BioC XML dumps into a JSON array and exports
//! per-article text records from either format.
//!
//! # Features
//!
//! - Streaming XML parsing with quick-xml, one `<document>` in memory at a time
//! - Incremental JSON array output (compact or indented)
//! - Streaming JSON array input for the export side
//! - Gzip input and atomic output
//!
//! # Example
//!
//! ```ignore
//! use litcovid_bioc::{ConvertConfig, convert};
//! use litcovid_core::ProgressContext;
//!
//! let config = ConvertConfig {
//!     input: "litcovid2BioCXML".into(),
//!     output: "litcovid2BioCJSON".into(),
//!     ..Default::default()
//! };
//!
//! let summary = convert(&config, &ProgressContext::new())?;
//! println!("Converted {} documents", summary.documents);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod extract;
pub mod json_reader;
pub mod model;
pub mod parser;
pub mod runner;
pub mod writer;

// Re-exports
pub use config::{ConvertConfig, ExportConfig, ExportKind, InputFormat};
pub use error::{Error, Result};
pub use model::{Document, Infons, Offset, Passage};
pub use parser::BiocReader;
pub use runner::{ConvertSummary, ExportSummary, convert, export};
pub use writer::JsonArrayWriter;
