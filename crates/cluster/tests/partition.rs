use std::collections::BTreeSet;

use cluster::{cluster, Cluster, Clusterer, MergePolicy};

/// Deterministic pseudo-random pairs over small index ranges.
fn scrambled_pairs(count: usize, range: usize) -> Vec<(usize, usize)> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let a = (state % range as u64) as usize + 1;
            let b = ((state >> 32) % range as u64) as usize + 1;
            (a, b)
        })
        .collect()
}

fn assert_partition(pairs: &[(usize, usize)], clusters: &[Cluster]) {
    let seen_a: BTreeSet<usize> = pairs.iter().map(|p| p.0).collect();
    let seen_b: BTreeSet<usize> = pairs.iter().map(|p| p.1).collect();

    let mut placed_a = BTreeSet::new();
    let mut placed_b = BTreeSet::new();
    for c in clusters {
        for &a in &c.a {
            assert!(placed_a.insert(a), "A index {a} placed twice");
        }
        for &b in &c.b {
            assert!(placed_b.insert(b), "B index {b} placed twice");
        }
    }
    assert_eq!(placed_a, seen_a);
    assert_eq!(placed_b, seen_b);
}

#[test]
fn every_index_lands_in_exactly_one_cluster() {
    for (count, range) in [(5, 3), (40, 10), (200, 25), (500, 400)] {
        let pairs = scrambled_pairs(count, range);

        assert_partition(&pairs, &cluster(pairs.iter().copied()));

        let mut union = Clusterer::new(MergePolicy::Union);
        for &(a, b) in &pairs {
            union.add_pair(a, b);
        }
        assert_partition(&pairs, &union.finish());
    }
}

#[test]
fn union_yields_true_connected_components() {
    // a chain 1-1, 2-2, then 2-1 links the two clusters
    let pairs = [(1, 1), (2, 2), (2, 1)];
    assert_eq!(cluster(pairs).len(), 2);

    let mut union = Clusterer::new(MergePolicy::Union);
    for (a, b) in pairs {
        union.add_pair(a, b);
    }
    assert_eq!(union.finish(), vec![Cluster::new([1, 2], [1, 2])]);
}

#[test]
fn output_is_deterministic() {
    let pairs = scrambled_pairs(120, 30);
    let first = cluster(pairs.iter().copied());
    let second = cluster(pairs.iter().copied());
    assert_eq!(first, second);
    let rendered = serde_json::to_string(&first).expect("json");
    assert_eq!(rendered, serde_json::to_string(&second).expect("json"));
}

#[test]
fn many_to_one_pairs() {
    assert_eq!(cluster([(1, 1), (2, 1)]), vec![Cluster::new([1, 2], [1])]);
}
