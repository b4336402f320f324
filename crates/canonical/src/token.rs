use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;
use crate::normalize::word_value;
use crate::reference::VeRef;

/// One word-level unit of a passage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Raw surface form, with original casing, diacritics and punctuation.
    pub value: String,
    /// `value` with enclosing punctuation stripped.
    pub word_value: String,
    /// 1-based position within the containing passage.
    pub position: usize,
    /// Reference of the containing passage, e.g. `"1.23"`.
    #[serde(rename = "ref")]
    pub reference: String,
    /// Whether the source renders a space after this token.
    #[serde(default = "default_space_after")]
    pub space_after: bool,
}

fn default_space_after() -> bool {
    true
}

impl Token {
    /// Builds a token from a raw value, deriving its word value.
    pub fn new(reference: impl Into<String>, position: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            word_value: word_value(&value),
            value,
            position,
            reference: reference.into(),
            space_after: true,
        }
    }

    /// Passage-plus-position reference (`"1.23.t4"`).
    pub fn ve_ref(&self) -> VeRef {
        VeRef::new(self.reference.clone(), self.position)
    }

    /// Fully qualified identifier (`"{version_urn}{ref}.t{position}"`).
    pub fn identifier(&self, version_urn: &str) -> String {
        format!("{version_urn}{}", self.ve_ref())
    }
}

/// A citable, ordered container of tokens.
///
/// Positions are contiguous `1..=N`; [`Passage::from_tokens`] enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passage {
    #[serde(rename = "ref")]
    pub reference: String,
    pub tokens: Vec<Token>,
}

impl Passage {
    /// Tokenizes whitespace-separated `text` into a passage.
    pub fn from_text(reference: impl Into<String>, text: &str) -> Self {
        let reference = reference.into();
        let tokens = tokenize(&reference, text);
        Self { reference, tokens }
    }

    /// Builds a passage from tokens in any order, validating positions.
    pub fn from_tokens(
        reference: impl Into<String>,
        mut tokens: Vec<Token>,
    ) -> Result<Self, CanonicalError> {
        let reference = reference.into();
        tokens.sort_by_key(|t| t.position);
        for (idx, token) in tokens.iter().enumerate() {
            let expected = idx + 1;
            if token.position == expected {
                continue;
            }
            if idx > 0 && token.position == tokens[idx - 1].position {
                return Err(CanonicalError::DuplicatePosition {
                    reference,
                    position: token.position,
                });
            }
            return Err(CanonicalError::NonContiguous {
                reference,
                expected,
                found: token.position,
            });
        }
        Ok(Self { reference, tokens })
    }

    /// Token at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&Token> {
        position
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .filter(|t| t.position == position)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Splits passage text on Unicode whitespace into 1-based tokens.
pub fn tokenize(reference: &str, text: &str) -> Vec<Token> {
    text.split_whitespace()
        .enumerate()
        .map(|(idx, value)| Token::new(reference, idx + 1, value))
        .collect()
}
