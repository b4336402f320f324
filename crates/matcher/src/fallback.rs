//! Curated fallback tables.
//!
//! A fallback table maps a subref key, `"{ref}@{target}"` or
//! `"{ref}@{target}[n]"`, to the token an editor decided the target means.
//! Entries are authoritative: they are consulted only after every automatic
//! rule failed, and accepted without scoring.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use canonical::VeRef;
use tracing::debug;

use crate::subref::subref_key;
use crate::types::MatchError;

const KEY_COLUMNS: [&str; 2] = ["subref", "key"];
const VALUE_COLUMNS: [&str; 3] = ["value", "ve_ref", "lemma"];

/// How a fallback value points at a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Designation<'v> {
    /// `"1.2.t3"`.
    VeRef(VeRef),
    /// `"t3"` or `"3"`.
    Position(usize),
    /// Anything else: a candidate's word value.
    WordValue(&'v str),
}

impl<'v> Designation<'v> {
    pub fn parse(value: &'v str) -> Self {
        let value = value.trim();
        if let Ok(ve_ref) = VeRef::parse(value) {
            return Designation::VeRef(ve_ref);
        }
        let digits = value.strip_prefix('t').unwrap_or(value);
        match digits.parse::<usize>() {
            Ok(position) if position > 0 => Designation::Position(position),
            _ => Designation::WordValue(value),
        }
    }
}

/// A fallback entry found for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackHit<'t> {
    pub key: String,
    pub value: &'t str,
}

/// In-memory fallback table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackTable {
    entries: HashMap<String, String>,
}

impl FallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry for the `occurrence`-th resolution of `target` in
    /// passage `reference`. The occurrence-keyed entry wins over the plain one.
    pub fn lookup(&self, reference: &str, target: &str, occurrence: usize) -> Option<FallbackHit<'_>> {
        let mut keys = Vec::with_capacity(2);
        if occurrence > 0 {
            keys.push(format!("{reference}@{target}[{occurrence}]"));
        }
        keys.push(subref_key(reference, target, 1));
        keys.into_iter().find_map(|key| {
            self.get(&key).map(|value| FallbackHit { key: key.clone(), value })
        })
    }

    /// Loads a table, choosing the format from the extension: `.json` for a
    /// flat JSON object, `.tsv` for tab-separated, anything else comma-separated.
    pub fn load(path: &Path) -> Result<Self, MatchError> {
        let text = fs::read_to_string(path).map_err(|source| MatchError::FallbackIo {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let table = match ext.as_deref() {
            Some("json") => Self::from_json_str(&text)?,
            Some("tsv") => Self::from_delimited(&text, b'\t', path)?,
            _ => Self::from_delimited(&text, b',', path)?,
        };
        debug!(path = %path.display(), entries = table.len(), "loaded fallback table");
        Ok(table)
    }

    /// Parses `{"43a@τἆλλα": "43a.t7", ...}`.
    pub fn from_json_str(text: &str) -> Result<Self, MatchError> {
        let entries: HashMap<String, String> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    /// Parses a delimited table with a `subref` (or `key`) column and a
    /// `value` (or `ve_ref`, or `lemma`) column. `origin` only labels errors.
    pub fn from_delimited(text: &str, delimiter: u8, origin: &Path) -> Result<Self, MatchError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.trim_start_matches('\u{feff}').as_bytes());
        let headers = reader.headers()?.clone();
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| headers.iter().position(|h| h.trim() == *name))
        };
        let missing = |what: &str| MatchError::FallbackFormat {
            path: origin.to_path_buf(),
            message: format!("no {what} column in header {:?}", headers.iter().collect::<Vec<_>>()),
        };
        let key_col = find(&KEY_COLUMNS).ok_or_else(|| missing("subref/key"))?;
        let value_col = find(&VALUE_COLUMNS).ok_or_else(|| missing("value/ve_ref/lemma"))?;

        let mut table = Self::new();
        for row in reader.records() {
            let row = row?;
            let key = row.get(key_col).unwrap_or("").trim();
            let value = row.get(value_col).unwrap_or("").trim();
            if key.is_empty() || value.is_empty() {
                continue;
            }
            table.insert(key, value);
        }
        Ok(table)
    }
}
