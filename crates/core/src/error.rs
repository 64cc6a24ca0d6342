//! Error types for nicheoverlap

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for nicheoverlap operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Grid size mismatch: expected {ec}x{er} ({en} cells), got {ac}x{ar} ({an} cells)")]
    SizeMismatch {
        er: usize,
        ec: usize,
        en: usize,
        ar: usize,
        ac: usize,
        an: usize,
    },

    #[error("Cannot normalize: valid cells sum to zero")]
    ZeroMass,

    #[error("Cannot normalize: valid cells sum to {0}")]
    NonFiniteMass(f64),

    #[error("Non-finite value {value} at cell {index}")]
    NonFinite { index: usize, value: f64 },

    #[error("Negative value {value} at cell {index}")]
    NegativeValue { index: usize, value: f64 },

    #[error("No normalized grid for {}", path.display())]
    MissingGrid { path: PathBuf },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach the file the error came from
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Already located, don't nest
            e @ Error::File { .. } => e,
            e => Error::File {
                path: path.into(),
                source: Box::new(e),
            },
        }
    }

    /// The innermost error, skipping any file context
    pub fn root(&self) -> &Error {
        match self {
            Error::File { source, .. } => source.root(),
            e => e,
        }
    }
}

/// Result type alias for nicheoverlap operations
pub type Result<T> = std::result::Result<T, Error>;
