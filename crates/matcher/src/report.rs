//! Aggregated resolution counters.
//!
//! Callers record every resolution outcome into a [`ResolutionReport`], merge
//! per-passage reports into one, and log or serialize the result at the end
//! of a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::subref::Healing;
use crate::types::{FailureReason, ResolutionFailure, Resolved, Strategy};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Passages processed.
    pub passages: usize,
    /// Sides given as explicit integer positions.
    pub positional: usize,
    /// Sides left empty (one-sided seeds).
    pub seeds: usize,
    pub resolved: BTreeMap<Strategy, usize>,
    pub healed: BTreeMap<Healing, usize>,
    pub failed: BTreeMap<FailureReason, usize>,
    /// Pairs dropped because they would have joined two clusters.
    pub cluster_drops: usize,
    /// Cluster merges performed under the union policy.
    pub cluster_merges: usize,
    /// Rows skipped because of an unparsable reference or position.
    pub malformed_references: usize,
}

impl ResolutionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_resolved(&mut self, resolved: &Resolved<'_>) {
        *self.resolved.entry(resolved.strategy).or_insert(0) += 1;
        if let Some(healing) = resolved.healing {
            *self.healed.entry(healing).or_insert(0) += 1;
        }
    }

    pub fn record_failure(&mut self, failure: &ResolutionFailure) {
        self.record_reason(failure.reason);
    }

    pub fn record_reason(&mut self, reason: FailureReason) {
        *self.failed.entry(reason).or_insert(0) += 1;
    }

    pub fn resolved_total(&self) -> usize {
        self.resolved.values().sum()
    }

    pub fn failed_total(&self) -> usize {
        self.failed.values().sum()
    }

    pub fn resolved_by(&self, strategy: Strategy) -> usize {
        self.resolved.get(&strategy).copied().unwrap_or(0)
    }

    pub fn failed_by(&self, reason: FailureReason) -> usize {
        self.failed.get(&reason).copied().unwrap_or(0)
    }

    /// Adds `other`'s counters into `self`.
    pub fn merge(&mut self, other: &ResolutionReport) {
        self.passages += other.passages;
        self.positional += other.positional;
        self.seeds += other.seeds;
        self.cluster_drops += other.cluster_drops;
        self.cluster_merges += other.cluster_merges;
        self.malformed_references += other.malformed_references;
        for (strategy, count) in &other.resolved {
            *self.resolved.entry(*strategy).or_insert(0) += count;
        }
        for (healing, count) in &other.healed {
            *self.healed.entry(*healing).or_insert(0) += count;
        }
        for (reason, count) in &other.failed {
            *self.failed.entry(*reason).or_insert(0) += count;
        }
    }

    /// Emits one `info` event with the totals and one per non-zero counter.
    pub fn log_summary(&self) {
        info!(
            passages = self.passages,
            resolved = self.resolved_total(),
            failed = self.failed_total(),
            positional = self.positional,
            seeds = self.seeds,
            cluster_drops = self.cluster_drops,
            cluster_merges = self.cluster_merges,
            malformed_references = self.malformed_references,
            "resolution summary"
        );
        for (strategy, count) in &self.resolved {
            info!(strategy = %strategy, count, "resolved by strategy");
        }
        for (reason, count) in &self.failed {
            info!(reason = %reason, count, "failed by reason");
        }
    }
}
