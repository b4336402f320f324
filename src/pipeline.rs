//! Observation-to-document driver.
//!
//! Observations are grouped by passage in first-seen order. Within a passage
//! every word-form side goes through one [`PassageResolver`] per version, so
//! repeated forms walk through their occurrences in row order. Resolved pairs
//! feed a fresh [`Clusterer`]; each resulting cluster becomes one record.

use std::collections::HashMap;

use canonical::{Citation, Corpus, Passage};
use cluster::{ClusterOutcome, Clusterer};
use matcher::{
    FailureReason, FallbackTable, PassageResolver, ResolutionFailure, ResolutionReport, Resolver,
};
use tracing::{debug, info, warn};

use crate::config::AlignConfig;
use crate::document::AlignmentDocument;
use crate::error::PipelineError;
use crate::observation::{Observation, Side};

/// Output of one run.
#[derive(Debug, Clone)]
pub struct Alignment {
    pub document: AlignmentDocument,
    pub report: ResolutionReport,
}

/// Curated fallback tables, one per version. A table only ever resolves
/// forms on its own side.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallbacks<'t> {
    pub a: Option<&'t FallbackTable>,
    pub b: Option<&'t FallbackTable>,
}

impl<'t> Fallbacks<'t> {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Aligns two corpora from a list of observations.
#[derive(Debug, Clone)]
pub struct Aligner {
    config: AlignConfig,
    resolver: Resolver,
}

impl Aligner {
    pub fn new(config: AlignConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let resolver = Resolver::new(config.resolver.clone(), config.normalize.clone())?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Builds the alignment document for `observations`.
    ///
    /// `a` and `b` must carry the version URNs the configuration names.
    pub fn align(
        &self,
        a: &Corpus,
        b: &Corpus,
        observations: &[Observation],
        fallbacks: Fallbacks<'_>,
    ) -> Result<Alignment, PipelineError> {
        let settings = &self.config.alignment;
        for (side, corpus, expected) in [("A", a, &settings.version_a), ("B", b, &settings.version_b)]
        {
            if corpus.version_urn() != expected.as_str() {
                return Err(PipelineError::InvalidAlignment(format!(
                    "corpus {side} has version {:?}, configuration expects {expected:?}",
                    corpus.version_urn()
                )));
            }
        }

        let urn = settings.alignment_urn()?;
        let mut document = AlignmentDocument::new(urn, settings.label.clone(), settings.versions());
        let mut report = ResolutionReport::new();

        for (reference, rows) in group_by_passage(observations) {
            let passage_report = self.align_passage(
                PassageInputs {
                    reference,
                    a: a.get(reference),
                    b: b.get(reference),
                    fallbacks,
                },
                &rows,
                &mut document,
                (a.version_urn(), b.version_urn()),
            );
            report.merge(&passage_report);
        }

        info!(
            urn = %document.urn,
            records = document.len(),
            resolved = report.resolved_total(),
            failed = report.failed_total(),
            "alignment complete"
        );
        Ok(Alignment { document, report })
    }

    fn align_passage(
        &self,
        inputs: PassageInputs<'_>,
        rows: &[&Observation],
        document: &mut AlignmentDocument,
        (version_a, version_b): (&str, &str),
    ) -> ResolutionReport {
        let mut report = ResolutionReport::new();
        report.passages = 1;
        let reference = inputs.reference;

        if let Err(err) = Citation::parse(reference) {
            warn!(passage = reference, rows = rows.len(), error = %err, "skipping rows with malformed reference");
            report.malformed_references += rows.len();
            return report;
        }

        let mut side_a = SideResolver::open(&self.resolver, inputs.a, inputs.fallbacks.a);
        let mut side_b = SideResolver::open(&self.resolver, inputs.b, inputs.fallbacks.b);
        let mut clusterer = Clusterer::with_config(&self.config.cluster);

        for row in rows {
            let a = side_a.locate(reference, row.side_a(), row, &mut report);
            let b = side_b.locate(reference, row.side_b(), row, &mut report);
            let outcome = match (a, b) {
                (Located::Index(a), Located::Index(b)) => clusterer.add_pair(a, b),
                (Located::Index(a), Located::Empty) => {
                    report.seeds += 1;
                    clusterer.seed_a(a)
                }
                (Located::Empty, Located::Index(b)) => {
                    report.seeds += 1;
                    clusterer.seed_b(b)
                }
                (Located::Empty, Located::Empty) => {
                    warn!(passage = reference, line = row.line, "skipping row with two empty sides");
                    report.malformed_references += 1;
                    continue;
                }
                _ => continue,
            };
            match outcome {
                ClusterOutcome::Dropped => report.cluster_drops += 1,
                ClusterOutcome::Merged => report.cluster_merges += 1,
                _ => {}
            }
        }

        let clusters = clusterer.finish();
        debug!(
            passage = reference,
            clusters = clusters.len(),
            one_sided = clusters.iter().filter(|c| c.is_one_sided()).count(),
            "clustered passage"
        );
        for cluster in clusters {
            let ids_a = identifiers(inputs.a, version_a, &cluster.a);
            let ids_b = identifiers(inputs.b, version_b, &cluster.b);
            document.push(ids_a, ids_b);
        }
        report
    }
}

struct PassageInputs<'a> {
    reference: &'a str,
    a: Option<&'a Passage>,
    b: Option<&'a Passage>,
    fallbacks: Fallbacks<'a>,
}

enum Located {
    Index(usize),
    Empty,
    Failed,
}

/// Resolution state for one side of one passage.
struct SideResolver<'a> {
    passage: Option<&'a Passage>,
    handle: Option<PassageResolver<'a>>,
}

impl<'a> SideResolver<'a> {
    fn open(
        resolver: &'a Resolver,
        passage: Option<&'a Passage>,
        fallback: Option<&'a FallbackTable>,
    ) -> Self {
        let handle = passage.and_then(|p| match resolver.passage(p, fallback) {
            Ok(handle) => Some(handle),
            Err(err) => {
                debug!(passage = %p.reference, error = %err, "no resolver for passage");
                None
            }
        });
        Self { passage, handle }
    }

    fn locate(
        &mut self,
        reference: &str,
        side: Side<'_>,
        row: &Observation,
        report: &mut ResolutionReport,
    ) -> Located {
        match side {
            Side::Empty => Located::Empty,
            Side::Position(position) => match self.passage {
                None => {
                    no_citation(reference, &position.to_string(), report);
                    Located::Failed
                }
                Some(passage) if passage.get(position).is_some() => {
                    report.positional += 1;
                    Located::Index(position)
                }
                Some(passage) => {
                    warn!(
                        passage = reference,
                        line = row.line,
                        position,
                        tokens = passage.len(),
                        "position outside passage"
                    );
                    report.malformed_references += 1;
                    Located::Failed
                }
            },
            Side::Word(word) => match self.handle.as_mut() {
                None => {
                    no_citation(reference, word, report);
                    Located::Failed
                }
                Some(handle) => match handle.resolve(word) {
                    Ok(resolved) => {
                        report.record_resolved(&resolved);
                        Located::Index(resolved.position())
                    }
                    Err(failure) => {
                        report.record_failure(&failure);
                        Located::Failed
                    }
                },
            },
        }
    }
}

fn no_citation(reference: &str, target: &str, report: &mut ResolutionReport) {
    let failure = ResolutionFailure {
        target: target.to_string(),
        reference: reference.to_string(),
        reason: FailureReason::NoCitation,
        best_score: None,
    };
    warn!(passage = reference, word = target, "{failure}");
    report.record_failure(&failure);
}

fn identifiers<'i>(
    passage: Option<&Passage>,
    version_urn: &str,
    positions: impl IntoIterator<Item = &'i usize>,
) -> Vec<String> {
    let Some(passage) = passage else {
        return Vec::new();
    };
    positions
        .into_iter()
        .filter_map(|&position| passage.get(position))
        .map(|token| token.identifier(version_urn))
        .collect()
}

/// Observations grouped by passage reference, in first-seen order.
fn group_by_passage(observations: &[Observation]) -> Vec<(&str, Vec<&Observation>)> {
    let mut groups: Vec<(&str, Vec<&Observation>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for observation in observations {
        let reference = observation.reference.as_str();
        let slot = *index.entry(reference).or_insert_with(|| {
            groups.push((reference, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(observation);
    }
    groups
}
