use serde::{Deserialize, Serialize};

/// What to do with a pair whose two indices already sit in different
/// clusters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Ignore the pair and log a warning.
    #[default]
    Drop,
    /// Merge the later cluster into the earlier one.
    Union,
}

/// Clusterer configuration.
///
/// ```yaml
/// cluster:
///   merge_policy: drop
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClusterConfig {
    pub merge_policy: MergePolicy,
}
