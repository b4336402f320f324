//! # Token resolver (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` reconciles two independent tokenizations of the same passage.
//! Given a word form observed in one source (a treebank word, a word from an
//! alignment table) it finds the token of a canonically tokenized passage
//! that the form refers to, robust to spelling variation, elision marks,
//! truncation, punctuation splitting and repeated words.
//!
//! ## Cascade
//!
//! The first rule that produces an accepted match wins:
//!
//! 1. `exact`: `word_value == target` (retried with digits stripped)
//! 2. `normalized`: equal comparison forms (see [`canonical::normalize`])
//! 3. `elision`: equal up to one trailing elision mark
//! 4. `truncation`: the candidate starts with the target
//! 5. `containment`: one contains the other
//! 6. `fuzzy`: best [`Scorer`] score strictly above `fuzzy_threshold`
//! 7. `fallback`: curated [`FallbackTable`] entry
//!
//! Targets written as subrefs (`καί[2]`) are looked up first through the
//! passage's [`SubrefIndex`], with key healing.
//!
//! ## Core Types
//!
//! - [`ResolverConfig`]: threshold, scorer, elision marks, digit handling.
//! - [`Resolver`]: validated configuration; opens [`PassageResolver`]s.
//! - [`PassageResolver`]: per-passage occurrence counters.
//! - [`Resolved`] / [`ResolutionFailure`]: outcome of one resolution.
//! - [`ResolutionReport`]: counters by strategy and failure reason.
//!
//! ## Example Usage
//!
//! ```rust
//! use canonical::Passage;
//! use matcher::{Resolver, Strategy};
//!
//! let passage = Passage::from_text("43a", "τί τηνικάδε ἀφῖξαι, ὦ Κρίτων;");
//! let resolver = Resolver::default();
//! let mut handle = resolver.passage(&passage, None).unwrap();
//!
//! let hit = handle.resolve("Κριτων").unwrap();
//! assert_eq!(hit.token.position, 5);
//! assert_eq!(hit.strategy, Strategy::Normalized);
//! ```

mod engine;
mod fallback;
mod fuzzy;
mod report;
mod subref;
mod types;

pub use crate::engine::{PassageResolver, Resolver};
pub use crate::fallback::{Designation, FallbackHit, FallbackTable};
pub use crate::fuzzy::{levenshtein_similarity, ratio, score};
pub use crate::report::ResolutionReport;
pub use crate::subref::{split_occurrence, subref_key, Healing, SubrefIndex};
pub use crate::types::{
    FailureReason, MatchError, ResolutionFailure, Resolved, ResolverConfig, Scorer, Strategy,
};
