use std::path::PathBuf;

use canonical::CanonicalError;
use matcher::MatchError;
use thiserror::Error;

use crate::config::ConfigLoadError;

/// Fatal errors of an alignment run. Per-target resolution failures are not
/// errors; they are counted in the [`ResolutionReport`](matcher::ResolutionReport).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration failure: {0}")]
    Config(#[from] ConfigLoadError),
    #[error("corpus failure: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("resolver failure: {0}")]
    Match(#[from] MatchError),
    #[error("invalid alignment settings: {0}")]
    InvalidAlignment(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("observation table csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
