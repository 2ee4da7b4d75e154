//! Error type for BioC parsing, conversion and export

/// Fatal error from reading or writing a BioC stream.
///
/// Every variant aborts the run; nothing is skipped or retried.
#[derive(Debug)]
pub enum Error {
    /// Malformed XML input, with the byte position where parsing failed
    Xml { position: u64, message: String },
    /// Malformed JSON input (export side)
    Json {
        line: usize,
        column: usize,
        message: String,
    },
    /// Read or write failure
    Io(std::io::Error),
    /// Shutdown requested by the operator
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml { position, message } => {
                write!(f, "malformed XML at byte {position}: {message}")
            }
            Self::Json {
                line,
                column,
                message,
            } => write!(f, "malformed JSON at line {line}, column {column}: {message}"),
            Self::Io(e) => write!(f, "IO: {e}"),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return Self::Io(e.into());
        }
        Self::Json {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

impl Error {
    /// Build an XML error from a quick-xml error at a reader position
    pub(crate) fn xml(position: u64, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            position,
            message: err.to_string(),
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
