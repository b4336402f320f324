//! Subreference keys and key healing.
//!
//! A subref names the n-th occurrence of a form inside a passage:
//! `"43a@Σωκράτης"` for the first, `"43a@καί[2]"` for the second `καί`.
//! Independently produced subrefs drift in predictable ways (occurrence counts
//! off by one, a missing or extra `[n]`, `ʼ` vs `’` elision marks), and
//! [`SubrefIndex::heal`] retries the lookup through those variants.

use std::collections::HashMap;

use canonical::Passage;
use serde::{Deserialize, Serialize};

/// Which lookup variant found the entry.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Healing {
    Exact,
    OffByOne,
    RawKey,
    Apostrophe,
}

/// Builds `"{citation}@{form}"`, with `"[n]"` appended for `n > 1`.
pub fn subref_key(citation: &str, form: &str, occurrence: usize) -> String {
    with_occurrence(&format!("{citation}@{form}"), occurrence)
}

/// Splits a trailing `"[n]"` occurrence off a key or target.
///
/// ```rust
/// use matcher::split_occurrence;
///
/// assert_eq!(split_occurrence("1.2@καί[2]"), ("1.2@καί", Some(2)));
/// assert_eq!(split_occurrence("καί"), ("καί", None));
/// assert_eq!(split_occurrence("[x]"), ("[x]", None));
/// ```
pub fn split_occurrence(key: &str) -> (&str, Option<usize>) {
    let Some(body) = key.strip_suffix(']') else {
        return (key, None);
    };
    let Some((base, digits)) = body.rsplit_once('[') else {
        return (key, None);
    };
    match digits.parse::<usize>() {
        Ok(n) if !base.is_empty() => (base, Some(n)),
        _ => (key, None),
    }
}

/// Map from subref key to a value, with occurrence counting on insert.
#[derive(Debug, Clone)]
pub struct SubrefIndex<V> {
    entries: HashMap<String, V>,
    seen: HashMap<(String, String), usize>,
}

impl<V> Default for SubrefIndex<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            seen: HashMap::new(),
        }
    }
}

impl<V> SubrefIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the next occurrence of `form` in `citation` and returns its key.
    pub fn insert(&mut self, citation: &str, form: &str, value: V) -> String {
        let count = self
            .seen
            .entry((citation.to_string(), form.to_string()))
            .or_insert(0);
        *count += 1;
        let key = subref_key(citation, form, *count);
        self.entries.insert(key.clone(), value);
        key
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks `key` up, then the previous occurrence, then the key without
    /// occurrence, then the key with `’` replaced by `ʼ`.
    ///
    /// An explicit `"[1]"` is equivalent to no occurrence at all. Word values
    /// keep a trailing `ʼ` but lose a trailing `’`, so only the swap towards
    /// `ʼ` can reach an indexed key.
    pub fn heal(&self, key: &str) -> Option<(&V, Healing)> {
        let (base, occurrence) = split_occurrence(key);
        let occurrence = occurrence.unwrap_or(1);
        let canonical_key = with_occurrence(base, occurrence);

        if let Some(v) = self.entries.get(&canonical_key) {
            return Some((v, Healing::Exact));
        }
        if occurrence > 1 {
            let previous = with_occurrence(base, occurrence - 1);
            if let Some(v) = self.entries.get(&previous) {
                return Some((v, Healing::OffByOne));
            }
        }
        if let Some(v) = self.entries.get(base) {
            return Some((v, Healing::RawKey));
        }
        let swapped = canonical_key.replace('\u{2019}', "\u{02BC}");
        if swapped != canonical_key {
            if let Some(v) = self.entries.get(&swapped) {
                return Some((v, Healing::Apostrophe));
            }
        }
        None
    }
}

impl SubrefIndex<usize> {
    /// Indexes a passage's tokens by word value, mapping to positions.
    pub fn from_passage(passage: &Passage) -> Self {
        let mut index = Self::new();
        for token in &passage.tokens {
            index.insert(&passage.reference, &token.word_value, token.position);
        }
        index
    }
}

fn with_occurrence(base: &str, occurrence: usize) -> String {
    if occurrence > 1 {
        format!("{base}[{occurrence}]")
    } else {
        base.to_string()
    }
}
