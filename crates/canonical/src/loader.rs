//! Corpus loaders for the flat-text and token-CSV formats.
//!
//! Flat text is one passage per line, `"{ref} {text}"`. Token CSVs carry one
//! row per token with `value`, `word_value`, `position`, `ve_ref` and an
//! optional `space_after` column.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::document::Corpus;
use crate::error::CanonicalError;
use crate::reference::VeRef;
use crate::token::{Passage, Token};

const BOM: char = '\u{feff}';

fn read_to_string(path: &Path) -> Result<String, CanonicalError> {
    fs::read_to_string(path).map_err(|source| CanonicalError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a flat-text corpus. Paths ending in `.csv` are read as token CSVs.
pub fn load_corpus(path: &Path, version_urn: &str) -> Result<Corpus, CanonicalError> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_token_csv(path, version_urn)
    } else {
        load_flat_text(path, version_urn)
    }
}

pub fn load_flat_text(path: &Path, version_urn: &str) -> Result<Corpus, CanonicalError> {
    let text = read_to_string(path)?;
    let corpus = parse_flat_text(&text, version_urn)?;
    debug!(
        path = %path.display(),
        passages = corpus.len(),
        tokens = corpus.token_count(),
        "loaded flat text corpus"
    );
    Ok(corpus)
}

/// Parses `"{ref} {text}"` lines. Blank lines are skipped; a line holding
/// only a reference yields an empty passage.
pub fn parse_flat_text(text: &str, version_urn: &str) -> Result<Corpus, CanonicalError> {
    let mut corpus = Corpus::new(version_urn);
    for line in text.trim_start_matches(BOM).lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (reference, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        corpus.insert(Passage::from_text(reference, rest))?;
    }
    Ok(corpus)
}

pub fn load_token_csv(path: &Path, version_urn: &str) -> Result<Corpus, CanonicalError> {
    let text = read_to_string(path)?;
    let corpus = parse_token_csv(&text, path, version_urn)?;
    debug!(
        path = %path.display(),
        passages = corpus.len(),
        tokens = corpus.token_count(),
        "loaded token csv"
    );
    Ok(corpus)
}

/// Parses token-CSV text. `origin` only labels errors.
///
/// Rows are grouped into passages by the reference part of `ve_ref`, in
/// first-seen order; each passage must have contiguous positions.
pub fn parse_token_csv(
    text: &str,
    origin: &Path,
    version_urn: &str,
) -> Result<Corpus, CanonicalError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.trim_start_matches(BOM).as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| CanonicalError::MissingColumn {
                path: origin.to_path_buf(),
                column: name.to_string(),
            })
    };
    let value_col = column("value")?;
    let word_value_col = column("word_value")?;
    let position_col = column("position")?;
    let ve_ref_col = column("ve_ref")?;
    let space_after_col = headers.iter().position(|h| h.trim() == "space_after");

    let mut grouped: Vec<(String, Vec<Token>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        let invalid = |message: String| CanonicalError::InvalidRow {
            path: origin.to_path_buf(),
            line,
            message,
        };
        let field = |idx: usize| row.get(idx).unwrap_or("").trim();

        let ve_ref = VeRef::parse(field(ve_ref_col))?;
        let position: usize = field(position_col)
            .parse()
            .map_err(|_| invalid(format!("invalid position {:?}", field(position_col))))?;
        if position != ve_ref.position {
            return Err(invalid(format!(
                "position {position} disagrees with ve_ref {ve_ref}"
            )));
        }
        let space_after = match space_after_col.map(field) {
            None | Some("") => true,
            Some(flag) => parse_flag(flag)
                .ok_or_else(|| invalid(format!("invalid space_after {flag:?}")))?,
        };

        let token = Token {
            value: field(value_col).to_string(),
            word_value: field(word_value_col).to_string(),
            position,
            reference: ve_ref.reference.clone(),
            space_after,
        };
        match slots.get(&ve_ref.reference) {
            Some(&slot) => grouped[slot].1.push(token),
            None => {
                slots.insert(ve_ref.reference.clone(), grouped.len());
                grouped.push((ve_ref.reference, vec![token]));
            }
        }
    }

    let mut corpus = Corpus::new(version_urn);
    for (reference, tokens) in grouped {
        corpus.insert(Passage::from_tokens(reference, tokens)?)?;
    }
    Ok(corpus)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
