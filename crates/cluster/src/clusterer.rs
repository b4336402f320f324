use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ClusterConfig, MergePolicy};

/// A connected component of alignment pairs. Sides are ascending sets; either
/// side may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    pub a: BTreeSet<usize>,
    pub b: BTreeSet<usize>,
}

impl Cluster {
    pub fn new(a: impl IntoIterator<Item = usize>, b: impl IntoIterator<Item = usize>) -> Self {
        Self {
            a: a.into_iter().collect(),
            b: b.into_iter().collect(),
        }
    }

    /// True when exactly one side is empty.
    pub fn is_one_sided(&self) -> bool {
        self.a.is_empty() != self.b.is_empty()
    }
}

/// Effect of one observation on the cluster set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ClusterOutcome {
    Created,
    Extended,
    Unchanged,
    Dropped,
    Merged,
}

/// Counts of outcomes, plus how many of the created clusters were seeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterStats {
    pub pairs: usize,
    pub seeds: usize,
    pub created: usize,
    pub extended: usize,
    pub unchanged: usize,
    pub dropped: usize,
    pub merged: usize,
}

impl ClusterStats {
    fn record(&mut self, outcome: ClusterOutcome) {
        match outcome {
            ClusterOutcome::Created => self.created += 1,
            ClusterOutcome::Extended => self.extended += 1,
            ClusterOutcome::Unchanged => self.unchanged += 1,
            ClusterOutcome::Dropped => self.dropped += 1,
            ClusterOutcome::Merged => self.merged += 1,
        }
    }
}

#[derive(Clone, Copy)]
enum Side {
    A,
    B,
}

/// Incremental builder of clusters from `(a, b)` index pairs.
///
/// Observations are processed in the order given; output clusters keep the
/// order in which they were created. Every index observed ends up in exactly
/// one cluster.
#[derive(Debug, Clone, Default)]
pub struct Clusterer {
    policy: MergePolicy,
    slots: Vec<Option<Cluster>>,
    a_to_slot: HashMap<usize, usize>,
    b_to_slot: HashMap<usize, usize>,
    stats: ClusterStats,
}

impl Clusterer {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn with_config(config: &ClusterConfig) -> Self {
        Self::new(config.merge_policy)
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn stats(&self) -> &ClusterStats {
        &self.stats
    }

    /// Records that A-token `a` and B-token `b` correspond.
    pub fn add_pair(&mut self, a: usize, b: usize) -> ClusterOutcome {
        self.stats.pairs += 1;
        let outcome = match (self.a_to_slot.get(&a).copied(), self.b_to_slot.get(&b).copied()) {
            (None, None) => {
                self.create(Cluster::new([a], [b]));
                ClusterOutcome::Created
            }
            (Some(slot), None) => {
                self.extend(slot, Side::B, b);
                ClusterOutcome::Extended
            }
            (None, Some(slot)) => {
                self.extend(slot, Side::A, a);
                ClusterOutcome::Extended
            }
            (Some(sa), Some(sb)) if sa == sb => ClusterOutcome::Unchanged,
            (Some(sa), Some(sb)) => match self.policy {
                MergePolicy::Drop => {
                    warn!(a, b, "dropping pair that would join two clusters");
                    ClusterOutcome::Dropped
                }
                MergePolicy::Union => {
                    self.merge(sa.min(sb), sa.max(sb));
                    debug!(a, b, "merged clusters");
                    ClusterOutcome::Merged
                }
            },
        };
        self.stats.record(outcome);
        outcome
    }

    /// Records an A-token with no counterpart. No-op if `a` is already placed.
    pub fn seed_a(&mut self, a: usize) -> ClusterOutcome {
        self.seed(Side::A, a)
    }

    /// Records a B-token with no counterpart. No-op if `b` is already placed.
    pub fn seed_b(&mut self, b: usize) -> ClusterOutcome {
        self.seed(Side::B, b)
    }

    fn seed(&mut self, side: Side, index: usize) -> ClusterOutcome {
        let seen = match side {
            Side::A => self.a_to_slot.contains_key(&index),
            Side::B => self.b_to_slot.contains_key(&index),
        };
        let outcome = if seen {
            ClusterOutcome::Unchanged
        } else {
            self.stats.seeds += 1;
            self.create(match side {
                Side::A => Cluster::new([index], []),
                Side::B => Cluster::new([], [index]),
            });
            ClusterOutcome::Created
        };
        self.stats.record(outcome);
        outcome
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live clusters in creation order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.slots.iter().flatten()
    }

    pub fn finish(self) -> Vec<Cluster> {
        self.slots.into_iter().flatten().collect()
    }

    fn create(&mut self, cluster: Cluster) {
        let slot = self.slots.len();
        for &a in &cluster.a {
            self.a_to_slot.insert(a, slot);
        }
        for &b in &cluster.b {
            self.b_to_slot.insert(b, slot);
        }
        self.slots.push(Some(cluster));
    }

    fn extend(&mut self, slot: usize, side: Side, index: usize) {
        let Some(cluster) = self.slots[slot].as_mut() else {
            return;
        };
        match side {
            Side::A => {
                cluster.a.insert(index);
                self.a_to_slot.insert(index, slot);
            }
            Side::B => {
                cluster.b.insert(index);
                self.b_to_slot.insert(index, slot);
            }
        }
    }

    /// Moves cluster `from` into `into`; `into < from` keeps the earlier slot.
    fn merge(&mut self, into: usize, from: usize) {
        let Some(moved) = self.slots[from].take() else {
            return;
        };
        for &a in &moved.a {
            self.a_to_slot.insert(a, into);
        }
        for &b in &moved.b {
            self.b_to_slot.insert(b, into);
        }
        if let Some(target) = self.slots[into].as_mut() {
            target.a.extend(moved.a);
            target.b.extend(moved.b);
        }
    }
}

/// Clusters `pairs` with the default drop policy.
///
/// ```rust
/// use cluster::{cluster, Cluster};
///
/// let clusters = cluster([(1, 1), (2, 1), (1, 2)]);
/// assert_eq!(clusters, vec![Cluster::new([1, 2], [1, 2])]);
/// ```
pub fn cluster(pairs: impl IntoIterator<Item = (usize, usize)>) -> Vec<Cluster> {
    let mut clusterer = Clusterer::default();
    for (a, b) in pairs {
        clusterer.add_pair(a, b);
    }
    clusterer.finish()
}
