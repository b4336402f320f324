//! Alignment clustering.
//!
//! Observations of the form "A-token `a` corresponds to B-token `b`" are
//! grouped into connected components `(set_of_a, set_of_b)`. Each component
//! becomes one alignment record, so many-to-many correspondences (a phrase
//! rendered by a single word, a word split across two) come out as a single
//! unit.
//!
//! A pair whose two indices already belong to *different* clusters is
//! dropped with a warning under the default [`MergePolicy::Drop`], or merges
//! the two clusters under [`MergePolicy::Union`].
//!
//! ```rust
//! use cluster::{Cluster, ClusterOutcome, Clusterer, MergePolicy};
//!
//! let mut clusterer = Clusterer::new(MergePolicy::Drop);
//! clusterer.add_pair(1, 1);
//! clusterer.add_pair(2, 1);
//! assert_eq!(clusterer.add_pair(3, 2), ClusterOutcome::Created);
//! assert_eq!(
//!     clusterer.finish(),
//!     vec![Cluster::new([1, 2], [1]), Cluster::new([3], [2])]
//! );
//! ```

mod clusterer;
mod config;

pub use crate::clusterer::{cluster, Cluster, ClusterOutcome, ClusterStats, Clusterer};
pub use crate::config::{ClusterConfig, MergePolicy};
