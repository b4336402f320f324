use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building passages and corpora.
#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("malformed reference: {0:?}")]
    MalformedReference(String),
    #[error("passage {reference}: expected position {expected}, found {found}")]
    NonContiguous {
        reference: String,
        expected: usize,
        found: usize,
    },
    #[error("passage {reference}: duplicate token position {position}")]
    DuplicatePosition { reference: String, position: usize },
    #[error("duplicate passage reference {0:?}")]
    DuplicatePassage(String),
    #[error("{path}: missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("{path}:{line}: {message}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },
    #[error("alignment slug must not be empty")]
    EmptySlug,
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
