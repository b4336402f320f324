//! Deterministic URN minting for alignment documents.
//!
//! # Algorithm
//!
//! ```text
//! SHA-256(slug || 0x00 || version_a || 0x00 || version_b)[..16] → 32 hex chars
//! ```
//!
//! The same slug and versions always mint the same URN, so re-running the
//! pipeline on unchanged inputs produces byte-identical documents.
//!
//! # Examples
//!
//! ```rust
//! use canonical::{mint_alignment_urn, record_urn};
//!
//! let urn = mint_alignment_urn("crito-word-alignment", ["urn:a:", "urn:b:"]).unwrap();
//! assert!(urn.starts_with("urn:cite2:scaife-viewer:alignment.v1:crito-word-alignment-"));
//!
//! let record = record_urn(&urn, 3);
//! assert!(record.starts_with("urn:cite2:scaife-viewer:alignment-record.v1:crito-word-alignment-"));
//! assert!(record.ends_with("_3"));
//! ```

use sha2::{Digest, Sha256};

use crate::error::CanonicalError;

pub const ALIGNMENT_URN_PREFIX: &str = "urn:cite2:scaife-viewer:alignment.v1:";
pub const RECORD_URN_PREFIX: &str = "urn:cite2:scaife-viewer:alignment-record.v1:";

/// 32-hex-character suffix derived from a slug and the aligned versions.
pub fn urn_suffix<'a>(slug: &str, versions: impl IntoIterator<Item = &'a str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(slug.as_bytes());
    for version in versions {
        hasher.update([0]);
        hasher.update(version.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// Mints `urn:cite2:scaife-viewer:alignment.v1:{slug}-{suffix}`.
pub fn mint_alignment_urn<'a>(
    slug: &str,
    versions: impl IntoIterator<Item = &'a str>,
) -> Result<String, CanonicalError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(CanonicalError::EmptySlug);
    }
    Ok(format!(
        "{ALIGNMENT_URN_PREFIX}{slug}-{}",
        urn_suffix(slug, versions)
    ))
}

/// Record URN sharing the part of `alignment_urn` after its last `:`.
pub fn record_urn(alignment_urn: &str, idx: usize) -> String {
    let shared = alignment_urn
        .rsplit_once(':')
        .map_or(alignment_urn, |(_, tail)| tail);
    format!("{RECORD_URN_PREFIX}{shared}_{idx}")
}
