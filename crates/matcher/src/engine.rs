use std::collections::HashMap;

use canonical::{normalize_with, strip_digits, trailing_number, NormalizeConfig, Passage};
use tracing::{debug, warn};

use crate::fallback::{Designation, FallbackTable};
use crate::fuzzy;
use crate::subref::{split_occurrence, SubrefIndex};
use crate::types::{
    FailureReason, MatchError, ResolutionFailure, Resolved, ResolverConfig, Strategy,
};

#[cfg(test)]
mod tests;

/// Resolves word forms to tokens through the cascade of [`Strategy`] rules.
///
/// A `Resolver` is stateless and cheap to share; per-passage state lives in
/// the [`PassageResolver`] handles it hands out.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
    normalize: NormalizeConfig,
}

impl Resolver {
    /// Construct a resolver after validating `config`.
    pub fn new(config: ResolverConfig, normalize: NormalizeConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config, normalize })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn normalize_config(&self) -> &NormalizeConfig {
        &self.normalize
    }

    /// Opens a stateful handle for one passage.
    ///
    /// Fails with [`MatchError::EmptyCandidates`] when the passage has no
    /// tokens and there is no fallback table to fall back on.
    pub fn passage<'a>(
        &'a self,
        passage: &'a Passage,
        fallback: Option<&'a FallbackTable>,
    ) -> Result<PassageResolver<'a>, MatchError> {
        if passage.is_empty() && fallback.is_none() {
            return Err(MatchError::EmptyCandidates(passage.reference.clone()));
        }
        Ok(PassageResolver::new(self, passage, fallback))
    }

    /// One-shot resolution with a fresh occurrence counter.
    pub fn resolve<'a>(
        &'a self,
        target: &str,
        passage: &'a Passage,
        fallback: Option<&'a FallbackTable>,
    ) -> Result<Resolved<'a>, ResolutionFailure> {
        match self.passage(passage, fallback) {
            Ok(mut handle) => handle.resolve(target),
            Err(_) => Err(ResolutionFailure {
                target: target.to_string(),
                reference: passage.reference.clone(),
                reason: FailureReason::NoCitation,
                best_score: None,
            }),
        }
    }
}

enum Selection {
    Chosen(usize),
    /// Distinct word values matched a rule that refuses mixed matches.
    Mixed,
    /// Every occurrence of the form was already handed out.
    Exhausted,
}

/// Per-passage resolution state: candidate comparison forms, subref index,
/// and occurrence counters. Discard it once the passage is done.
pub struct PassageResolver<'a> {
    resolver: &'a Resolver,
    passage: &'a Passage,
    fallback: Option<&'a FallbackTable>,
    comparison: Vec<String>,
    subrefs: SubrefIndex<usize>,
    occurrences: HashMap<String, usize>,
    targets_seen: HashMap<String, usize>,
}

impl<'a> PassageResolver<'a> {
    fn new(resolver: &'a Resolver, passage: &'a Passage, fallback: Option<&'a FallbackTable>) -> Self {
        let comparison = passage
            .tokens
            .iter()
            .map(|t| normalize_with(&t.word_value, &resolver.normalize))
            .collect();
        Self {
            resolver,
            passage,
            fallback,
            comparison,
            subrefs: SubrefIndex::from_passage(passage),
            occurrences: HashMap::new(),
            targets_seen: HashMap::new(),
        }
    }

    pub fn reference(&self) -> &'a str {
        &self.passage.reference
    }

    /// Resolves `target` against the passage's tokens.
    ///
    /// Repeated calls with the same form walk through its occurrences in
    /// position order.
    pub fn resolve(&mut self, target: &str) -> Result<Resolved<'a>, ResolutionFailure> {
        let target = target.trim();
        let occurrence = {
            let seen = self.targets_seen.entry(target.to_string()).or_insert(0);
            *seen += 1;
            *seen
        };
        let outcome = self.run_cascade(target, occurrence);
        match &outcome {
            Ok(resolved) => debug!(
                passage = %self.passage.reference,
                word = target,
                position = resolved.token.position,
                strategy = %resolved.strategy,
                score = resolved.score,
                "resolved target"
            ),
            Err(failure) => warn!(
                passage = %failure.reference,
                word = target,
                reason = %failure.reason,
                best_score = failure.best_score,
                "unresolved target"
            ),
        }
        outcome
    }

    fn run_cascade(&mut self, target: &str, occurrence: usize) -> Result<Resolved<'a>, ResolutionFailure> {
        let resolver: &'a Resolver = self.resolver;
        let passage: &'a Passage = self.passage;
        let config = &resolver.config;
        let failure = |reason, best_score| ResolutionFailure {
            target: target.to_string(),
            reference: passage.reference.clone(),
            reason,
            best_score,
        };

        if passage.is_empty() {
            return Err(failure(FailureReason::NoCitation, None));
        }
        if target.is_empty() {
            return Err(failure(FailureReason::Missing, None));
        }

        let (form, explicit) = split_occurrence(target);
        if explicit.is_some() {
            let key = format!("{}@{}", passage.reference, target);
            if let Some((&position, healing)) = self.subrefs.heal(&key) {
                if let Some(token) = passage.get(position) {
                    return Ok(Resolved {
                        token,
                        strategy: Strategy::Subref,
                        score: None,
                        healing: Some(healing),
                    });
                }
            }
        }

        let stripped = if config.strip_digits {
            strip_digits(form)
        } else {
            form.into()
        };
        let base: &str = if stripped.is_empty() { form } else { &stripped };
        let norm_target = normalize_with(base, &resolver.normalize);

        let mut ambiguous = false;
        let mut exhausted = false;
        for strategy in Strategy::CASCADE {
            if strategy == Strategy::Fuzzy {
                break;
            }
            let matches = self.matches(strategy, form, base, &norm_target);
            if matches.is_empty() {
                continue;
            }
            match self.select(strategy, &matches, target, explicit, &norm_target) {
                Selection::Chosen(idx) => {
                    return Ok(self.accept(idx, strategy, None));
                }
                Selection::Mixed => ambiguous = true,
                Selection::Exhausted => {
                    ambiguous = true;
                    exhausted = true;
                    break;
                }
            }
        }

        let mut best_score = None;
        if !exhausted {
            let (best_idx, score) = self.best_fuzzy(&norm_target);
            best_score = Some(score);
            if score > config.fuzzy_threshold {
                return Ok(self.accept(best_idx, Strategy::Fuzzy, Some(score)));
            }
        }

        if let Some(idx) = self.from_fallback(form, explicit.unwrap_or(occurrence)) {
            return Ok(self.accept(idx, Strategy::Fallback, None));
        }

        let reason = if ambiguous {
            FailureReason::PartialAmbiguous
        } else if config.report_near_misses && best_score.is_some_and(|s| s > 0) {
            FailureReason::FuzzyBelowThreshold
        } else {
            FailureReason::Missing
        };
        Err(failure(reason, best_score))
    }

    fn accept(&self, idx: usize, strategy: Strategy, score: Option<u8>) -> Resolved<'a> {
        let passage: &'a Passage = self.passage;
        Resolved {
            token: &passage.tokens[idx],
            strategy,
            score,
            healing: None,
        }
    }

    /// Candidate indices matching `strategy`, in position order.
    fn matches(&self, strategy: Strategy, form: &str, base: &str, norm_target: &str) -> Vec<usize> {
        let tokens = &self.passage.tokens;
        let pick = |pred: &dyn Fn(usize) -> bool| -> Vec<usize> {
            (0..tokens.len()).filter(|&i| pred(i)).collect()
        };
        match strategy {
            Strategy::Exact => {
                let found = pick(&|i| tokens[i].word_value == form);
                if found.is_empty() && base != form {
                    pick(&|i| tokens[i].word_value == base)
                } else {
                    found
                }
            }
            Strategy::Normalized => pick(&|i| self.comparison[i] == norm_target),
            Strategy::Elision => {
                let marks = &self.resolver.config.elision_marks;
                let (target_stem, target_marked) = strip_elision(norm_target, marks);
                if target_stem.is_empty() {
                    return Vec::new();
                }
                pick(&|i| {
                    let (stem, marked) = strip_elision(&self.comparison[i], marks);
                    (marked || target_marked) && stem == target_stem
                })
            }
            Strategy::Truncation => {
                if norm_target.is_empty() {
                    return Vec::new();
                }
                pick(&|i| self.comparison[i].starts_with(norm_target))
            }
            Strategy::Containment => {
                if norm_target.is_empty() {
                    return Vec::new();
                }
                pick(&|i| {
                    let candidate = self.comparison[i].as_str();
                    !candidate.is_empty()
                        && (candidate.contains(norm_target) || norm_target.contains(candidate))
                })
            }
            Strategy::Subref | Strategy::Fuzzy | Strategy::Fallback => Vec::new(),
        }
    }

    fn select(
        &mut self,
        strategy: Strategy,
        matches: &[usize],
        target: &str,
        explicit: Option<usize>,
        norm_target: &str,
    ) -> Selection {
        if matches.len() == 1 {
            return Selection::Chosen(matches[0]);
        }
        let passage: &'a Passage = self.passage;
        let tokens = &passage.tokens;
        let first = &tokens[matches[0]].word_value;
        let uniform = matches.iter().all(|&i| tokens[i].word_value == *first);
        if !uniform && strategy.rejects_mixed_matches() {
            debug!(
                passage = %passage.reference,
                word = target,
                strategy = %strategy,
                candidates = matches.len(),
                "ambiguous partial match"
            );
            return Selection::Mixed;
        }

        if let Some(n) = explicit {
            return match n.checked_sub(1).and_then(|i| matches.get(i)) {
                Some(&idx) => Selection::Chosen(idx),
                None => Selection::Exhausted,
            };
        }

        let key = if uniform {
            first.clone()
        } else {
            norm_target.to_string()
        };
        let used = self.occurrences.entry(key).or_insert(0);
        let chosen = match matches.get(*used) {
            Some(&idx) => Some(idx),
            None => trailing_number(target)
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| matches.get(i).copied()),
        };
        match chosen {
            Some(idx) => {
                *used += 1;
                Selection::Chosen(idx)
            }
            None => Selection::Exhausted,
        }
    }

    /// Best fuzzy score; ties keep the earliest position.
    fn best_fuzzy(&self, norm_target: &str) -> (usize, u8) {
        let scorer = self.resolver.config.scorer;
        let mut best = (0, 0u8);
        for (idx, candidate) in self.comparison.iter().enumerate() {
            let score = fuzzy::score(scorer, norm_target, candidate);
            if score > best.1 {
                best = (idx, score);
            }
        }
        best
    }

    fn from_fallback(&self, form: &str, occurrence: usize) -> Option<usize> {
        let table = self.fallback?;
        let hit = table.lookup(&self.passage.reference, form, occurrence)?;
        let tokens = &self.passage.tokens;
        let idx = match Designation::parse(hit.value) {
            Designation::VeRef(ve_ref) if ve_ref.reference == self.passage.reference => {
                ve_ref.position.checked_sub(1)
            }
            Designation::VeRef(ve_ref) => {
                warn!(key = %hit.key, designated = %ve_ref, "fallback entry points outside its passage");
                None
            }
            Designation::Position(position) => position.checked_sub(1),
            Designation::WordValue(value) => {
                let wanted = normalize_with(value, &self.resolver.normalize);
                tokens
                    .iter()
                    .position(|t| t.word_value == value)
                    .or_else(|| self.comparison.iter().position(|c| *c == wanted))
            }
        };
        let idx = idx.filter(|&i| i < tokens.len());
        if idx.is_none() {
            warn!(key = %hit.key, value = hit.value, "fallback entry does not designate a token");
        }
        idx
    }
}

/// Splits one trailing elision mark off `word`.
fn strip_elision<'w>(word: &'w str, marks: &[char]) -> (&'w str, bool) {
    match word.char_indices().next_back() {
        Some((idx, c)) if marks.contains(&c) => (&word[..idx], true),
        _ => (word, false),
    }
}
