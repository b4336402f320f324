use std::fmt;
use std::path::PathBuf;

use canonical::Token;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_categories::UnicodeCategories;

use crate::subref::Healing;

/// Similarity function used by the fuzzy rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scorer {
    /// Indel similarity: `200 * LCS / (len_a + len_b)`.
    #[default]
    Ratio,
    /// Normalized edit distance: `100 * (1 - dist / max_len)`.
    Levenshtein,
}

/// Resolution rule that produced a match, in cascade order.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Explicit `form[n]` target found through the passage subref index.
    Subref,
    Exact,
    Normalized,
    Elision,
    Truncation,
    Containment,
    Fuzzy,
    Fallback,
}

impl Strategy {
    /// The automatic rules, in the order they are tried.
    pub const CASCADE: [Strategy; 6] = [
        Strategy::Exact,
        Strategy::Normalized,
        Strategy::Elision,
        Strategy::Truncation,
        Strategy::Containment,
        Strategy::Fuzzy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Subref => "subref",
            Strategy::Exact => "exact",
            Strategy::Normalized => "normalized",
            Strategy::Elision => "elision",
            Strategy::Truncation => "truncation",
            Strategy::Containment => "containment",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Fallback => "fallback",
        }
    }

    /// Rules 4 and 5 refuse multi-matches over distinct word values.
    pub(crate) fn rejects_mixed_matches(self) -> bool {
        matches!(self, Strategy::Truncation | Strategy::Containment)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a target could not be resolved.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The passage reference is unknown or has no tokens.
    NoCitation,
    /// Nothing matched.
    Missing,
    /// Several candidates matched and none could be chosen.
    PartialAmbiguous,
    /// The best fuzzy score was non-zero but not above the threshold.
    FuzzyBelowThreshold,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::NoCitation => "no_citation",
            FailureReason::Missing => "missing",
            FailureReason::PartialAmbiguous => "partial_ambiguous",
            FailureReason::FuzzyBelowThreshold => "fuzzy_below_threshold",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal resolution failure. Counted, logged, and skipped by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("could not resolve {target:?} in {reference}: {reason}")]
pub struct ResolutionFailure {
    pub target: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub reason: FailureReason,
    /// Highest fuzzy score seen, when the fuzzy rule ran.
    pub best_score: Option<u8>,
}

/// A successful resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub token: &'a Token,
    pub strategy: Strategy,
    /// Fuzzy score of the chosen candidate; `None` for non-fuzzy rules.
    pub score: Option<u8>,
    /// Key healing applied by the subref rule.
    pub healing: Option<Healing>,
}

impl Resolved<'_> {
    pub fn position(&self) -> usize {
        self.token.position
    }
}

/// Tuning knobs for the resolver cascade.
///
/// ```yaml
/// resolver:
///   fuzzy_threshold: 50
///   scorer: ratio
///   elision_marks: ["ʼ", "’", "'"]
///   strip_digits: true
///   report_near_misses: false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// A fuzzy match is accepted only when its score is strictly greater.
    #[serde(default = "ResolverConfig::default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,
    #[serde(default)]
    pub scorer: Scorer,
    /// Characters treated as interchangeable trailing elision marks.
    #[serde(default = "ResolverConfig::default_elision_marks")]
    pub elision_marks: Vec<char>,
    /// Retry exact matching with ASCII digits removed from the target.
    #[serde(default = "ResolverConfig::default_strip_digits")]
    pub strip_digits: bool,
    /// Report `fuzzy_below_threshold` instead of `missing` for near misses.
    #[serde(default)]
    pub report_near_misses: bool,
}

impl ResolverConfig {
    pub(crate) fn default_fuzzy_threshold() -> u8 {
        50
    }

    pub(crate) fn default_elision_marks() -> Vec<char> {
        vec!['\u{02BC}', '\u{2019}', '\'']
    }

    pub(crate) fn default_strip_digits() -> bool {
        true
    }

    /// Validate the configuration before building a resolver.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.fuzzy_threshold > 100 {
            return Err(MatchError::InvalidConfig(
                "fuzzy_threshold must be between 0 and 100".into(),
            ));
        }
        if self.elision_marks.is_empty() {
            return Err(MatchError::InvalidConfig(
                "elision_marks must not be empty".into(),
            ));
        }
        // Modifier letters (U+02BC) are apostrophes, not word letters.
        if self
            .elision_marks
            .iter()
            .any(|c| c.is_numeric() || (c.is_alphabetic() && !c.is_letter_modifier()))
        {
            return Err(MatchError::InvalidConfig(
                "elision_marks must not contain letters or digits".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: Self::default_fuzzy_threshold(),
            scorer: Scorer::default(),
            elision_marks: Self::default_elision_marks(),
            strip_digits: Self::default_strip_digits(),
            report_near_misses: false,
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Invalid resolver configuration.
    #[error("invalid resolver config: {0}")]
    InvalidConfig(String),
    /// Asked to resolve against an empty pool with no fallback table.
    #[error("passage {0} has no candidate tokens and no fallback table")]
    EmptyCandidates(String),
    #[error("failed to read fallback table {path}: {source}")]
    FallbackIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fallback table {path}: {message}")]
    FallbackFormat { path: PathBuf, message: String },
    #[error("fallback table json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fallback table csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = ResolverConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.fuzzy_threshold, 50);
        assert_eq!(cfg.scorer, Scorer::Ratio);
        assert!(cfg.strip_digits);
        assert!(!cfg.report_near_misses);
    }

    #[test]
    fn threshold_above_hundred_rejected() {
        let cfg = ResolverConfig {
            fuzzy_threshold: 101,
            ..ResolverConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("fuzzy_threshold")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_elision_marks_rejected() {
        let cfg = ResolverConfig {
            elision_marks: Vec::new(),
            ..ResolverConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("elision_marks")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn elision_marks_accept_modifier_letter_apostrophe() {
        for mark in ['\u{02BC}', '\u{2019}', '\''] {
            let cfg = ResolverConfig {
                elision_marks: vec![mark],
                ..ResolverConfig::default()
            };
            assert!(cfg.validate().is_ok(), "{mark:?}");
        }
        for mark in ['a', 'α', '1'] {
            let cfg = ResolverConfig {
                elision_marks: vec![mark],
                ..ResolverConfig::default()
            };
            assert!(cfg.validate().is_err(), "{mark:?}");
        }
    }

    #[test]
    fn serde_names_are_snake_case() {
        let json = serde_json::to_string(&FailureReason::FuzzyBelowThreshold).unwrap();
        assert_eq!(json, "\"fuzzy_below_threshold\"");
        let scorer: Scorer = serde_json::from_str("\"levenshtein\"").unwrap();
        assert_eq!(scorer, Scorer::Levenshtein);
        assert_eq!(Strategy::Containment.to_string(), "containment");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: ResolverConfig = serde_json::from_str(r#"{"fuzzy_threshold": 70}"#).unwrap();
        assert_eq!(cfg.fuzzy_threshold, 70);
        assert_eq!(cfg.elision_marks.len(), 3);
        assert!(cfg.strip_digits);
    }
}
