//! Configuration types for word normalization.
//!
//! [`NormalizeConfig`] controls how a word is turned into its comparison form
//! before two token strings are matched against each other.
//!
//! # Stability
//!
//! A given configuration always produces the same comparison form on any
//! machine and locale. Nothing here consults the OS locale.
//!
//! # Examples
//!
//! ## Default Configuration
//!
//! ```rust
//! use canonical::NormalizeConfig;
//!
//! let config = NormalizeConfig::default();
//! assert!(config.strip_marks);
//! assert!(config.casefold);
//! assert!(!config.strip_punctuation);
//! ```
//!
//! ## Keeping Diacritics
//!
//! ```rust
//! use canonical::NormalizeConfig;
//!
//! let config = NormalizeConfig {
//!     strip_marks: false,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for the word normalizer.
///
/// `NormalizeConfig` is cheap to clone and serializable, so it can be embedded
/// directly in the YAML pipeline configuration:
///
/// ```yaml
/// normalize:
///   strip_marks: true
///   casefold: true
///   strip_punctuation: false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Remove every combining mark (general category `M*`) after canonical
    /// decomposition.
    ///
    /// With marks stripped, polytonic Greek compares equal to its bare
    /// letters:
    ///
    /// ```text
    /// "παῖς" → "παις"
    /// "ἄνδρα" → "ανδρα"
    /// ```
    ///
    /// # Default
    ///
    /// `true`
    pub strip_marks: bool,

    /// Apply full Unicode case folding.
    ///
    /// Full folding differs from lowercasing for a handful of scripts. Greek
    /// final sigma folds to medial sigma and German `ß` folds to `ss`:
    ///
    /// ```text
    /// "λόγος" → "λογοσ"
    /// "Straße" → "strasse"
    /// ```
    ///
    /// # Default
    ///
    /// `true`
    pub casefold: bool,

    /// Drop Unicode punctuation characters anywhere in the word.
    ///
    /// Token word values already have their enclosing punctuation removed
    /// (see [`word_value`](crate::word_value)); this flag additionally removes
    /// inner punctuation such as hyphens in split compounds.
    ///
    /// # Default
    ///
    /// `false`
    pub strip_punctuation: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            strip_marks: true,
            casefold: true,
            strip_punctuation: false,
        }
    }
}
