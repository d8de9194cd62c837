//! Fuzzy grouping of label occurrences into canonical tag variants.
//!
//! A grouping pass recomputes the whole vocabulary from the full occurrence
//! set:
//!
//! 1. Tally raw values in first-seen order.
//! 2. Seed a cluster with each unassigned value and absorb every later
//!    unassigned value that directly matches, is a sub/super-phrase of, or is
//!    a word rearrangement of the seed. Only the seed is compared.
//! 3. Merge clusters that hit the same curated [`PatternEntry`] and add its
//!    canonical label to the merged cluster.
//! 4. Pick a canonical label, score coherence, and emit one [`TagVariant`]
//!    per cluster.
//!
//! Identical inputs (and an identical pattern table) always produce identical
//! variants, given the same timestamp.

mod eval;
mod patterns;

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use time::OffsetDateTime;

use crate::{LabelOccurrence, Similarity, TagVariant};

pub use eval::{CorpusEntry, compare_tags, jaccard_similarity, load_corpus, precision_recall};
pub use patterns::{PatternEntry, PatternTable};

/// Lowest confidence a variant can report.
pub const MIN_CONFIDENCE: f64 = 0.1;

/// Width of the confidence bands inside which count decides the order.
pub const CONFIDENCE_BAND: f64 = 0.1;

/// Occurrence count and provenance of one raw value.
#[derive(Debug, Default)]
struct ValueStats {
    count: usize,
    sources: Vec<LabelOccurrence>,
}

type Tally = IndexMap<String, ValueStats>;

/// Clusters label occurrences into tag variants.
///
/// # Examples
///
/// ```
/// use tagnorm::grouping::{PatternTable, TagGrouper};
/// use tagnorm::{LabelOccurrence, Similarity, SourceKind};
/// use time::OffsetDateTime;
///
/// let now = OffsetDateTime::now_utc();
/// let occurrences: Vec<_> = ["dresses", "dress", "dress", "dresed"]
///     .into_iter()
///     .map(|v| LabelOccurrence::new(SourceKind::Filename, v, None, now))
///     .collect();
///
/// let grouper = TagGrouper::new(Similarity::default(), PatternTable::empty());
/// let variants = grouper.group(&occurrences);
///
/// assert_eq!(variants.len(), 1);
/// assert_eq!(variants[0].canonical(), "dress");
/// assert_eq!(variants[0].count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct TagGrouper {
    similarity: Similarity,
    patterns: PatternTable,
}

impl TagGrouper {
    /// Creates a grouper with the given similarity settings and pattern table.
    pub fn new(similarity: Similarity, patterns: PatternTable) -> Self {
        Self {
            similarity,
            patterns,
        }
    }

    /// Returns the similarity settings.
    pub fn similarity(&self) -> &Similarity {
        &self.similarity
    }

    /// Returns the curated pattern table.
    pub fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// Groups `occurrences`, stamping variants with the current time.
    pub fn group(&self, occurrences: &[LabelOccurrence]) -> Vec<TagVariant> {
        self.group_at(occurrences, OffsetDateTime::now_utc())
    }

    /// Groups `occurrences`, stamping variants with `now`.
    pub fn group_at(&self, occurrences: &[LabelOccurrence], now: OffsetDateTime) -> Vec<TagVariant> {
        let tally = tally(occurrences);
        let mut clusters = self.cluster(&tally);
        self.apply_patterns(&mut clusters);

        let mut variants: Vec<TagVariant> = clusters
            .into_iter()
            .map(|members| self.build_variant(members, &tally, now))
            .collect();
        variants.sort_by(compare_by_rank);

        tracing::debug!(
            occurrences = occurrences.len(),
            distinct_values = tally.len(),
            variants = variants.len(),
            "grouped labels"
        );
        variants
    }

    /// Picks the canonical label for a cluster.
    ///
    /// Priority: a curated entry literally present (table order), then the
    /// first member with a user_folder or manual source, then the highest raw
    /// count, then the member with more words. Remaining ties go to the
    /// earlier member.
    fn select_canonical(&self, members: &IndexSet<String>, tally: &Tally) -> String {
        if let Some(entry) = self
            .patterns
            .entries()
            .iter()
            .find(|entry| members.iter().any(|m| entry.literally_matches(m)))
        {
            return entry.canonical.clone();
        }

        let user_chosen = members.iter().find(|m| {
            tally.get(m.as_str()).is_some_and(|stats| {
                stats.sources.iter().any(|o| o.kind().is_user_intent())
            })
        });
        if let Some(member) = user_chosen {
            return member.clone();
        }

        let mut best: Option<(&String, usize, usize)> = None;
        for member in members {
            let count = raw_count(tally, member);
            let words = member.split_whitespace().count();
            let better = match best {
                None => true,
                Some((_, best_count, best_words)) => {
                    count > best_count || (count == best_count && words > best_words)
                }
            };
            if better {
                best = Some((member, count, words));
            }
        }
        best.map(|(member, _, _)| member.clone()).unwrap_or_default()
    }

    fn cluster(&self, tally: &Tally) -> Vec<IndexSet<String>> {
        let values: Vec<&String> = tally.keys().collect();
        let mut assigned = vec![false; values.len()];
        let mut clusters = Vec::new();

        for (i, seed) in values.iter().enumerate() {
            if assigned[i] {
                continue;
            }
            assigned[i] = true;

            let mut members = IndexSet::new();
            members.insert((*seed).clone());
            for (j, candidate) in values.iter().enumerate().skip(i + 1) {
                if !assigned[j] && self.matches_seed(seed, candidate) {
                    assigned[j] = true;
                    members.insert((*candidate).clone());
                }
            }

            tracing::trace!(seed = %seed, members = members.len(), "formed cluster");
            clusters.push(members);
        }
        clusters
    }

    fn matches_seed(&self, seed: &str, candidate: &str) -> bool {
        let sim = &self.similarity;
        sim.is_direct_match(seed, candidate)
            || sim.is_subset(seed, candidate)
            || sim.is_subset(candidate, seed)
            || sim.are_rearrangements(seed, candidate)
    }

    /// Merges every cluster touching a curated entry into the first such
    /// cluster and adds the entry's canonical label to it.
    fn apply_patterns(&self, clusters: &mut Vec<IndexSet<String>>) {
        for entry in self.patterns.entries() {
            let hits: Vec<usize> = clusters
                .iter()
                .enumerate()
                .filter(|(_, members)| members.iter().any(|m| self.hits_entry(entry, m)))
                .map(|(idx, _)| idx)
                .collect();
            let Some((&target, rest)) = hits.split_first() else {
                continue;
            };

            let mut absorbed: Vec<IndexSet<String>> =
                rest.iter().rev().map(|&idx| clusters.remove(idx)).collect();
            absorbed.reverse();
            for members in absorbed {
                clusters[target].extend(members);
            }

            if clusters[target].insert(entry.canonical.clone()) {
                tracing::debug!(canonical = %entry.canonical, "added curated canonical to cluster");
            }
            if !rest.is_empty() {
                tracing::debug!(
                    canonical = %entry.canonical,
                    merged = rest.len(),
                    "merged clusters sharing a curated pattern"
                );
            }
        }
    }

    fn hits_entry(&self, entry: &PatternEntry, member: &str) -> bool {
        member == entry.canonical
            || entry
                .variants
                .iter()
                .any(|variant| self.similarity.is_similar(member, variant))
    }

    /// Mean pairwise similarity of the members, floored at [`MIN_CONFIDENCE`].
    fn confidence(&self, members: &IndexSet<String>) -> f64 {
        if members.len() < 2 {
            return 1.0;
        }

        let mut total = 0.0;
        let mut pairs = 0usize;
        for (i, a) in members.iter().enumerate() {
            for b in members.iter().skip(i + 1) {
                total += self.similarity.similarity(a, b);
                pairs += 1;
            }
        }
        (total / pairs as f64).max(MIN_CONFIDENCE)
    }

    fn build_variant(
        &self,
        members: IndexSet<String>,
        tally: &Tally,
        now: OffsetDateTime,
    ) -> TagVariant {
        let canonical = self.select_canonical(&members, tally);
        let confidence = self.confidence(&members);
        let count = members.iter().map(|m| raw_count(tally, m)).sum();
        let sources = members
            .iter()
            .filter_map(|m| tally.get(m.as_str()))
            .flat_map(|stats| stats.sources.iter().cloned())
            .collect();

        TagVariant::new(canonical, members, count, sources, confidence, now)
    }
}

fn tally(occurrences: &[LabelOccurrence]) -> Tally {
    let mut tally = Tally::new();
    for occurrence in occurrences {
        let stats = tally.entry(occurrence.value().to_string()).or_default();
        stats.count += 1;
        stats.sources.push(occurrence.clone());
    }
    tally
}

fn raw_count(tally: &Tally, value: &str) -> usize {
    tally.get(value).map_or(0, |stats| stats.count)
}

/// Confidence band counted down from 1.0: `[0.9, 1.0]` is band 0,
/// `[0.8, 0.9)` band 1, and so on.
pub fn confidence_band(confidence: f64) -> u32 {
    let steps = ((1.0 - confidence) / CONFIDENCE_BAND - 1e-9).floor();
    steps.max(0.0) as u32
}

/// Vocabulary order: higher confidence band first, then higher count, then
/// higher raw confidence.
///
/// Count only decides between variants in the same fixed band, not between
/// any two confidences within 0.1 of each other: 0.91 with a count of 1 still
/// ranks above 0.89 with a count of 100. Pairwise "within 0.1" is not
/// transitive, so it cannot drive a sort.
pub fn compare_by_rank(a: &TagVariant, b: &TagVariant) -> Ordering {
    confidence_band(a.confidence())
        .cmp(&confidence_band(b.confidence()))
        .then_with(|| b.count().cmp(&a.count()))
        .then_with(|| b.confidence().total_cmp(&a.confidence()))
}
