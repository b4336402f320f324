//! The standoff-annotation alignment document.

use std::io::Write;

use canonical::record_urn;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const DOCUMENT_FORMAT: &str = "atlas-standoff-annotation";

/// One aligned unit: the A-side and B-side token identifiers of a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    pub urn: String,
    pub relations: [Vec<String>; 2],
}

/// A complete alignment between two versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentDocument {
    pub urn: String,
    pub label: String,
    pub format: String,
    pub versions: [String; 2],
    pub records: Vec<AlignmentRecord>,
}

impl AlignmentDocument {
    pub fn new(urn: impl Into<String>, label: impl Into<String>, versions: [&str; 2]) -> Self {
        Self {
            urn: urn.into(),
            label: label.into(),
            format: DOCUMENT_FORMAT.to_string(),
            versions: versions.map(str::to_string),
            records: Vec::new(),
        }
    }

    /// Appends a record; its URN carries the next 0-based index.
    pub fn push(&mut self, a: Vec<String>, b: Vec<String>) -> &AlignmentRecord {
        let urn = record_urn(&self.urn, self.records.len());
        self.records.push(AlignmentRecord {
            urn,
            relations: [a, b],
        });
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pretty-printed JSON with non-ASCII text kept verbatim.
    pub fn to_json_pretty(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), PipelineError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
