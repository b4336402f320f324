//! Observation tables.
//!
//! An observation says that, within passage `ref`, side `a` corresponds to
//! side `b`. Each side is empty (the token has no counterpart), an explicit
//! 1-based position, or a word form the resolver has to locate.
//!
//! ```text
//! ref,a,b
//! 43a,Σωκράτης,Socrates
//! 43a,3,
//! 43a,ὦ,O
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PipelineError;

const BOM: char = '\u{feff}';

/// One raw row of an observation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "ref")]
    pub reference: String,
    pub a: String,
    pub b: String,
    /// 1-based line in the source table; 0 for observations built in memory.
    #[serde(default)]
    pub line: u64,
}

impl Observation {
    pub fn new(reference: impl Into<String>, a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            a: a.into(),
            b: b.into(),
            line: 0,
        }
    }

    pub fn side_a(&self) -> Side<'_> {
        Side::parse(&self.a)
    }

    pub fn side_b(&self) -> Side<'_> {
        Side::parse(&self.b)
    }
}

/// Interpretation of one side of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side<'o> {
    /// No counterpart on this side.
    Empty,
    /// Explicit token position. Zero is kept so the caller can reject it.
    Position(usize),
    /// Word form to resolve.
    Word(&'o str),
}

impl<'o> Side<'o> {
    pub fn parse(raw: &'o str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Side::Empty;
        }
        match raw.parse::<usize>() {
            Ok(position) => Side::Position(position),
            Err(_) => Side::Word(raw),
        }
    }
}

/// Loads an observation table; `.tsv` files are tab-separated, anything else
/// comma-separated.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>, PipelineError> {
    let text = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    let observations = parse_observations(&text, if is_tsv { b'\t' } else { b',' }, path)?;
    debug!(
        path = %path.display(),
        rows = observations.len(),
        "loaded observation table"
    );
    Ok(observations)
}

/// Parses observation rows from delimited text with `ref`, `a` and `b`
/// columns. `origin` only labels errors.
pub fn parse_observations(
    text: &str,
    delimiter: u8,
    origin: &Path,
) -> Result<Vec<Observation>, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.trim_start_matches(BOM).as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PipelineError::MissingColumn {
                path: origin.to_path_buf(),
                column: name.to_string(),
            })
    };
    let ref_col = column("ref")?;
    let a_col = column("a")?;
    let b_col = column("b")?;

    let mut observations = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();
        observations.push(Observation {
            reference: field(ref_col),
            a: field(a_col),
            b: field(b_col),
            line: row.position().map_or(0, |p| p.line()),
        });
    }
    Ok(observations)
}
