//! Canonical word and token layer for text alignment.
//!
//! This crate turns raw passages into a token model the resolver can match
//! against, and defines the comparison form under which two spellings of a
//! word are considered equal.
//!
//! ## What we do
//!
//! - Word normalization: strip combining marks, recompose, full case folding
//! - Token model: surface value, word value, 1-based position, passage ref
//! - Passage references (`"1.23"`) and token references (`"1.23.t4"`)
//! - Corpus loading from flat text or token CSVs
//! - Deterministic URN minting for alignment documents
//!
//! ## Pure function guarantee
//!
//! Normalization performs no I/O and never consults the OS locale. Same word
//! and config give the same comparison form on any machine.
//!
//! ## Invariants worth knowing
//!
//! - `normalize(&normalize(w)) == normalize(w)`
//! - Passage positions are contiguous `1..=N`; loaders reject anything else
//! - Token identifiers are `"{version_urn}{ref}.t{position}"`
//!
//! ```rust
//! use canonical::{normalize, Passage};
//!
//! assert_eq!(normalize("Σωκράτης"), normalize("σωκρατης"));
//!
//! let passage = Passage::from_text("43a", "ὦ Σώκρατες,");
//! assert_eq!(passage.tokens[1].word_value, "Σώκρατες");
//! ```

mod config;
mod document;
mod error;
mod hash;
mod loader;
mod normalize;
mod reference;
mod token;

pub use crate::config::NormalizeConfig;
pub use crate::document::Corpus;
pub use crate::error::CanonicalError;
pub use crate::hash::{
    mint_alignment_urn, record_urn, urn_suffix, ALIGNMENT_URN_PREFIX, RECORD_URN_PREFIX,
};
pub use crate::loader::{
    load_corpus, load_flat_text, load_token_csv, parse_flat_text, parse_token_csv,
};
pub use crate::normalize::{normalize, normalize_with, strip_digits, trailing_number, word_value};
pub use crate::reference::{Citation, VeRef};
pub use crate::token::{tokenize, Passage, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_insensitive_equality() {
        let pairs = [("ἄνδρα", "ανδρα"), ("Ἀχιλῆος", "αχιληοσ"), ("café", "CAFE")];
        for (with_marks, bare) in pairs {
            assert_eq!(normalize(with_marks), normalize(bare), "{with_marks} vs {bare}");
        }
    }

    #[test]
    fn flat_text_tokens_carry_identifiers() {
        let corpus = parse_flat_text("1.1 μῆνιν ἄειδε θεὰ", "urn:cts:greekLit:tlg0012.tlg001.perseus-grc2:")
            .expect("parse");
        let token = corpus.token("1.1", 3).expect("token");
        assert_eq!(
            token.identifier(corpus.version_urn()),
            "urn:cts:greekLit:tlg0012.tlg001.perseus-grc2:1.1.t3"
        );
        assert_eq!(normalize(&token.word_value), "θεα");
    }
}
