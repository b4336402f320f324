use super::*;

use canonical::Passage;

use crate::subref::Healing;
use crate::types::Scorer;

fn resolver_with(config: ResolverConfig) -> Resolver {
    Resolver::new(config, NormalizeConfig::default()).expect("valid config")
}

fn resolve_once(text: &str, target: &str) -> Result<(usize, Strategy), FailureReason> {
    let passage = Passage::from_text("1", text);
    let resolver = Resolver::default();
    resolver
        .resolve(target, &passage, None)
        .map(|r| (r.token.position, r.strategy))
        .map_err(|f| f.reason)
}

#[test]
fn exact_match_beats_normalized() {
    assert_eq!(
        resolve_once("Σωκράτης σωκρατης", "σωκρατης"),
        Ok((2, Strategy::Exact))
    );
    assert_eq!(
        resolve_once("Σωκράτης σωκρατης", "Σωκράτης"),
        Ok((1, Strategy::Exact))
    );
}

#[test]
fn characteristic_case_per_rule() {
    let cases = [
        ("ὦ Κρίτων", "Κριτων", 2, Strategy::Normalized),
        ("δʼ ἄρα", "δ\u{2019}", 1, Strategy::Elision),
        ("δʼ ἄρα", "δ", 1, Strategy::Elision),
        ("ἀνδράσιν ἄλλοις", "ἀνδρ", 1, Strategy::Truncation),
        ("τ-ἆλλα ἔφη", "ἆλλα", 1, Strategy::Containment),
        ("Ἀχιλλεύς ἔφη", "Αχιλευς", 1, Strategy::Fuzzy),
    ];
    for (text, target, position, strategy) in cases {
        assert_eq!(
            resolve_once(text, target),
            Ok((position, strategy)),
            "{target:?} in {text:?}"
        );
    }
}

#[test]
fn digits_are_stripped_for_exact_match() {
    assert_eq!(resolve_once("ὁ καί", "καί1"), Ok((2, Strategy::Exact)));
}

#[test]
fn repeated_forms_resolve_in_order() {
    let passage = Passage::from_text("1.1", "καί ὁ καί τε καί");
    let resolver = Resolver::default();
    let mut handle = resolver.passage(&passage, None).expect("handle");

    let positions: Vec<usize> = (0..3)
        .map(|_| handle.resolve("καί").expect("resolves").token.position)
        .collect();
    assert_eq!(positions, vec![1, 3, 5]);

    let failure = handle.resolve("καί").expect_err("occurrences exhausted");
    assert_eq!(failure.reason, FailureReason::PartialAmbiguous);
    assert_eq!(failure.reference, "1.1");
    assert_eq!(failure.best_score, None);
}

#[test]
fn numeric_hint_applies_after_exhaustion() {
    let passage = Passage::from_text("2", "καί ὁ καί");
    let resolver = Resolver::default();
    let mut handle = resolver.passage(&passage, None).expect("handle");
    assert_eq!(handle.resolve("καί").unwrap().token.position, 1);
    assert_eq!(handle.resolve("καί").unwrap().token.position, 3);
    let hinted = handle.resolve("καί2").expect("hint honored");
    assert_eq!(hinted.token.position, 3);
    assert_eq!(hinted.strategy, Strategy::Exact);
}

#[test]
fn unique_form_resolves_to_same_token_every_time() {
    let passage = Passage::from_text("3", "Σωκράτης ἔφη");
    let resolver = Resolver::default();
    let mut handle = resolver.passage(&passage, None).expect("handle");
    for _ in 0..3 {
        assert_eq!(handle.resolve("Σωκράτης").unwrap().token.position, 1);
    }
}

#[test]
fn counters_are_scoped_to_one_handle() {
    let passage = Passage::from_text("4", "καί καί");
    let resolver = Resolver::default();
    let mut first = resolver.passage(&passage, None).expect("handle");
    assert_eq!(first.resolve("καί").unwrap().token.position, 1);
    let mut second = resolver.passage(&passage, None).expect("handle");
    assert_eq!(second.resolve("καί").unwrap().token.position, 1);
    assert_eq!(first.resolve("καί").unwrap().token.position, 2);
}

#[test]
fn unmatched_target_is_missing() {
    let passage = Passage::from_text("43a", "ὦ Κρίτων");
    let failure = Resolver::default()
        .resolve("xyz", &passage, None)
        .expect_err("nothing matches");
    assert_eq!(failure.reason, FailureReason::Missing);
    assert_eq!(failure.target, "xyz");
    assert_eq!(failure.reference, "43a");
    assert_eq!(failure.best_score, Some(0));
}

#[test]
fn near_miss_reported_only_when_enabled() {
    let passage = Passage::from_text("43a", "ὦ Κρίτων");

    // LCS 3 over 12 letters scores exactly 50, which is not above the threshold
    let failure = Resolver::default()
        .resolve("κρατος", &passage, None)
        .expect_err("at threshold");
    assert_eq!(failure.reason, FailureReason::Missing);
    assert_eq!(failure.best_score, Some(50));

    let resolver = resolver_with(ResolverConfig {
        report_near_misses: true,
        ..ResolverConfig::default()
    });
    let failure = resolver
        .resolve("κρατος", &passage, None)
        .expect_err("at threshold");
    assert_eq!(failure.reason, FailureReason::FuzzyBelowThreshold);
}

#[test]
fn mixed_partial_matches_are_ambiguous() {
    let passage = Passage::from_text("5", "ἀνδρός ἀνδράσιν");

    // fuzzy still settles it under the default threshold
    let resolver = Resolver::default();
    let hit = resolver
        .resolve("ανδρ", &passage, None)
        .expect("fuzzy pick");
    assert_eq!((hit.token.position, hit.strategy), (1, Strategy::Fuzzy));
    assert_eq!(hit.score, Some(80));

    let strict = resolver_with(ResolverConfig {
        fuzzy_threshold: 90,
        ..ResolverConfig::default()
    });
    let failure = strict
        .resolve("ανδρ", &passage, None)
        .expect_err("ambiguous");
    assert_eq!(failure.reason, FailureReason::PartialAmbiguous);
}

#[test]
fn fuzzy_ties_keep_earliest_position() {
    let passage = Passage::from_text("6", "αβ αδ");
    let resolver = resolver_with(ResolverConfig {
        fuzzy_threshold: 40,
        ..ResolverConfig::default()
    });
    let hit = resolver.resolve("αγ", &passage, None).expect("fuzzy");
    assert_eq!(hit.token.position, 1);
    assert_eq!(hit.score, Some(50));
}

#[test]
fn levenshtein_scorer() {
    let passage = Passage::from_text("7", "Ἀχιλλεύς ἔφη");
    let resolver = resolver_with(ResolverConfig {
        scorer: Scorer::Levenshtein,
        ..ResolverConfig::default()
    });
    let hit = resolver.resolve("Αχιλευς", &passage, None).expect("fuzzy");
    assert_eq!(hit.strategy, Strategy::Fuzzy);
    assert_eq!(hit.score, Some(88));
}

#[test]
fn fallback_overrides_when_everything_else_fails() {
    let passage = Passage::from_text("1", "τἆλλα ἔφη");
    let mut table = FallbackTable::new();
    table.insert("1@qq", "t2");
    table.insert("1@qq[2]", "1.t1");
    table.insert("1@zz", "ἔφη");
    table.insert("1@ww", "2.t1");

    let resolver = Resolver::default();
    let mut handle = resolver.passage(&passage, Some(&table)).expect("handle");

    let first = handle.resolve("qq").expect("fallback");
    assert_eq!((first.token.position, first.strategy), (2, Strategy::Fallback));
    assert_eq!(handle.resolve("qq").expect("occurrence key").token.position, 1);
    assert_eq!(handle.resolve("zz").expect("word value").token.position, 2);

    let outside = handle.resolve("ww").expect_err("other passage");
    assert_eq!(outside.reason, FailureReason::Missing);
}

#[test]
fn subref_targets_use_healing() {
    let passage = Passage::from_text("8", "καί ὁ καί");
    let resolver = Resolver::default();
    let mut handle = resolver.passage(&passage, None).expect("handle");

    let exact = handle.resolve("καί[2]").expect("subref");
    assert_eq!(exact.token.position, 3);
    assert_eq!(exact.strategy, Strategy::Subref);
    assert_eq!(exact.healing, Some(Healing::Exact));

    let healed = handle.resolve("καί[3]").expect("off by one");
    assert_eq!(healed.token.position, 3);
    assert_eq!(healed.healing, Some(Healing::OffByOne));
}

#[test]
fn subref_with_typographic_apostrophe_heals_to_indexed_form() {
    let passage = Passage::from_text("8", "δʼ ἄρα");
    assert_eq!(passage.tokens[0].word_value, "δ\u{02BC}");
    let resolver = Resolver::default();
    let mut handle = resolver.passage(&passage, None).expect("handle");

    let healed = handle.resolve("δ\u{2019}[1]").expect("apostrophe swap");
    assert_eq!(healed.token.position, 1);
    assert_eq!(healed.strategy, Strategy::Subref);
    assert_eq!(healed.healing, Some(Healing::Apostrophe));
}

#[test]
fn empty_pool_without_fallback_is_an_error() {
    let passage = Passage::from_text("9", "");
    let resolver = Resolver::default();
    assert!(matches!(
        resolver.passage(&passage, None),
        Err(MatchError::EmptyCandidates(r)) if r == "9"
    ));

    let failure = resolver.resolve("x", &passage, None).expect_err("no citation");
    assert_eq!(failure.reason, FailureReason::NoCitation);

    let table = FallbackTable::new();
    let mut handle = resolver.passage(&passage, Some(&table)).expect("handle");
    assert_eq!(
        handle.resolve("x").expect_err("no tokens").reason,
        FailureReason::NoCitation
    );
}

#[test]
fn invalid_config_rejected_at_construction() {
    let err = Resolver::new(
        ResolverConfig {
            fuzzy_threshold: 120,
            ..ResolverConfig::default()
        },
        NormalizeConfig::default(),
    )
    .expect_err("invalid");
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

#[test]
fn default_config_constructs_and_resolves_elisions() {
    let resolver = resolver_with(ResolverConfig::default());
    let passage = Passage::from_text("1", "μυρίʼ Ἀχαιοῖς ἄλγεʼ ἔθηκε");
    let hit = resolver
        .resolve("ἄλγε", &passage, None)
        .expect("elided form resolves");
    assert_eq!(hit.token.position, 3);
    assert_eq!(hit.strategy, Strategy::Elision);
}
