//! Passage and token references.
//!
//! A passage reference is a dot-separated citation (`"1.23"` for book 1,
//! line 23, or `"43a"` for a Stephanus page). A token reference, or *ve_ref*, appends the 1-based token
//! position: `"1.23.t4"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Passage-plus-position reference (`"1.23.t4"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VeRef {
    pub reference: String,
    pub position: usize,
}

impl VeRef {
    pub fn new(reference: impl Into<String>, position: usize) -> Self {
        Self {
            reference: reference.into(),
            position,
        }
    }

    /// Parses `"{ref}.t{position}"`, splitting at the last `".t"`.
    pub fn parse(input: &str) -> Result<Self, CanonicalError> {
        let malformed = || CanonicalError::MalformedReference(input.to_string());
        let (reference, position) = input.rsplit_once(".t").ok_or_else(malformed)?;
        if reference.is_empty() {
            return Err(malformed());
        }
        let position: usize = position.parse().map_err(|_| malformed())?;
        if position == 0 {
            return Err(malformed());
        }
        Ok(Self::new(reference, position))
    }
}

impl fmt::Display for VeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.t{}", self.reference, self.position)
    }
}

impl FromStr for VeRef {
    type Err = CanonicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated passage reference: one or more non-empty dot-separated
/// components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Citation {
    reference: String,
}

impl Citation {
    /// Checks a passage reference. A trailing dot, as written by some
    /// flat-file exports (`"12."`), is ignored.
    pub fn parse(reference: &str) -> Result<Self, CanonicalError> {
        let trimmed = reference.trim().trim_end_matches('.');
        if trimmed.is_empty() || trimmed.split('.').any(str::is_empty) {
            return Err(CanonicalError::MalformedReference(reference.to_string()));
        }
        Ok(Self {
            reference: trimmed.to_string(),
        })
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ve_ref_round_trips_through_display() {
        let parsed = VeRef::parse("1.23.t4").expect("valid");
        assert_eq!(parsed, VeRef::new("1.23", 4));
        assert_eq!(parsed.to_string(), "1.23.t4");
    }

    #[test]
    fn ve_ref_splits_at_last_marker() {
        let parsed: VeRef = "pr.t1.t2".parse().expect("valid");
        assert_eq!(parsed.reference, "pr.t1");
        assert_eq!(parsed.position, 2);
    }

    #[test]
    fn malformed_ve_refs_are_rejected() {
        for bad in ["1.23", "1.23.tx", ".t3", "1.2.t0", ""] {
            assert!(
                matches!(VeRef::parse(bad), Err(CanonicalError::MalformedReference(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn citation_components_must_be_non_empty() {
        assert_eq!(Citation::parse("5.347").unwrap().to_string(), "5.347");
        assert_eq!(Citation::parse(" 12. ").unwrap().to_string(), "12");
        assert!(Citation::parse("43a").is_ok());
        for bad in ["5..3", ".1", "", " . "] {
            assert!(Citation::parse(bad).is_err(), "{bad:?} should be malformed");
        }
    }
}
