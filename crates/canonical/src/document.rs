//! Versioned corpora.
//!
//! A [`Corpus`] holds every passage of one text version, in the order the
//! source lists them, addressable by passage reference.

use std::collections::HashMap;

use crate::error::CanonicalError;
use crate::token::{Passage, Token};

/// The ordered passages of one version, keyed by reference.
///
/// ```rust
/// use canonical::{Corpus, Passage};
///
/// let mut corpus = Corpus::new("urn:cts:greekLit:tlg0059.tlg003.perseus-grc2:");
/// corpus.insert(Passage::from_text("43a", "τί τηνικάδε ἀφῖξαι")).unwrap();
/// assert_eq!(corpus.get("43a").map(|p| p.len()), Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    version_urn: String,
    passages: Vec<Passage>,
    index: HashMap<String, usize>,
}

impl Corpus {
    pub fn new(version_urn: impl Into<String>) -> Self {
        Self {
            version_urn: version_urn.into(),
            passages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Version URN prefix used to qualify token identifiers.
    pub fn version_urn(&self) -> &str {
        &self.version_urn
    }

    /// Appends a passage. References must be unique within a corpus.
    pub fn insert(&mut self, passage: Passage) -> Result<(), CanonicalError> {
        if self.index.contains_key(&passage.reference) {
            return Err(CanonicalError::DuplicatePassage(passage.reference));
        }
        self.index
            .insert(passage.reference.clone(), self.passages.len());
        self.passages.push(passage);
        Ok(())
    }

    pub fn get(&self, reference: &str) -> Option<&Passage> {
        self.index.get(reference).map(|&idx| &self.passages[idx])
    }

    /// Token at `position` of passage `reference`.
    pub fn token(&self, reference: &str, position: usize) -> Option<&Token> {
        self.get(reference).and_then(|p| p.get(position))
    }

    /// Fully qualified identifier of a token, if it exists.
    pub fn identifier(&self, reference: &str, position: usize) -> Option<String> {
        self.token(reference, position)
            .map(|t| t.identifier(&self.version_urn))
    }

    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.passages.iter()
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.passages.iter().map(Passage::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_source_order_and_lookup() {
        let mut corpus = Corpus::new("urn:v:");
        corpus.insert(Passage::from_text("1.10", "b c")).unwrap();
        corpus.insert(Passage::from_text("1.9", "a")).unwrap();
        let refs: Vec<&str> = corpus.passages().map(|p| p.reference.as_str()).collect();
        assert_eq!(refs, vec!["1.10", "1.9"]);
        assert_eq!(corpus.identifier("1.10", 2).as_deref(), Some("urn:v:1.10.t2"));
        assert_eq!(corpus.identifier("1.10", 3), None);
        assert_eq!(corpus.token_count(), 3);
    }

    #[test]
    fn duplicate_reference_rejected() {
        let mut corpus = Corpus::new("urn:v:");
        corpus.insert(Passage::from_text("1", "a")).unwrap();
        let err = corpus.insert(Passage::from_text("1", "b")).expect_err("duplicate");
        assert!(matches!(err, CanonicalError::DuplicatePassage(r) if r == "1"));
    }
}
