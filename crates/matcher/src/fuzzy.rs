//! Similarity scores on a 0–100 scale.
//!
//! Scores are computed over Unicode scalar values, so a precomposed Greek
//! letter counts as one unit. Callers normalize both sides first.

use crate::types::Scorer;

/// Scores `a` against `b` with the chosen scorer. Either side empty → 0.
pub fn score(scorer: Scorer, a: &str, b: &str) -> u8 {
    match scorer {
        Scorer::Ratio => ratio(a, b),
        Scorer::Levenshtein => levenshtein_similarity(a, b),
    }
}

/// Indel similarity, `200 * LCS / (len_a + len_b)`, rounded.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let common = lcs_len(&a, &b);
    percent(2 * common, total)
}

/// `100 * (1 - distance / max_len)`, rounded.
pub fn levenshtein_similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let longest = a.len().max(b.len());
    let distance = levenshtein(&a, &b);
    percent(longest - distance, longest)
}

fn percent(numerator: usize, denominator: usize) -> u8 {
    // rounds half up; denominator is never zero here
    (((numerator * 200) + denominator) / (2 * denominator)).min(100) as u8
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Classic edit distance with unit costs.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_hundred() {
        assert_eq!(ratio("σωκρατησ", "σωκρατησ"), 100);
        assert_eq!(levenshtein_similarity("σωκρατησ", "σωκρατησ"), 100);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(levenshtein_similarity("abc", "xyz"), 0);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(ratio("", "abc"), 0);
        assert_eq!(score(Scorer::Levenshtein, "abc", ""), 0);
        assert_eq!(ratio("", ""), 0);
    }

    #[test]
    fn known_values() {
        // LCS("kitten", "sitting") = 4 → 200 * 4 / 13 = 61.5 → 62
        assert_eq!(ratio("kitten", "sitting"), 62);
        // distance 3 over 7 → 57.1 → 57
        assert_eq!(levenshtein_similarity("kitten", "sitting"), 57);
        assert_eq!(levenshtein(&['a', 'b'], &['b', 'a']), 2);
    }

    #[test]
    fn counts_scalar_values_not_bytes() {
        // two edits over five letters
        assert_eq!(levenshtein_similarity("λογε", "λογοσ"), 60);
        assert_eq!(ratio("λογοσ", "λογοι"), 80);
    }
}
