//! Lookup index over a tag vocabulary.
//!
//! The index keeps three maps (canonical label, alias, word token) pointing
//! into an immutable snapshot of variants. [`SearchIndex::update`] builds a
//! complete new snapshot and publishes it with a single pointer swap, so a
//! concurrent [`SearchIndex::search`] sees either the old or the new
//! vocabulary, never a partially built one.
//!
//! The fuzzy token scan is linear in the number of distinct indexed tokens,
//! which is fine for vocabularies in the thousands.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::{IndexMap, IndexSet};

use crate::grouping::compare_by_rank;
use crate::{Similarity, TagVariant, Tokenizer};

#[derive(Debug, Default)]
struct IndexSnapshot {
    variants: Vec<TagVariant>,
    by_canonical: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    by_token: IndexMap<String, Vec<usize>>,
}

impl IndexSnapshot {
    fn build(variants: Vec<TagVariant>) -> Self {
        let mut by_canonical = HashMap::new();
        let mut by_alias = HashMap::new();
        let mut by_token: IndexMap<String, Vec<usize>> = IndexMap::new();

        for (idx, variant) in variants.iter().enumerate() {
            by_canonical
                .entry(variant.canonical().to_lowercase())
                .or_insert(idx);
            for alias in variant.aliases() {
                by_alias.entry(alias.to_lowercase()).or_insert(idx);
            }
            for member in variant.members() {
                for token in Tokenizer::tokenize(member) {
                    let postings = by_token.entry(token).or_default();
                    if !postings.contains(&idx) {
                        postings.push(idx);
                    }
                }
            }
        }

        Self {
            variants,
            by_canonical,
            by_alias,
            by_token,
        }
    }

    fn ranked(&self, hits: impl IntoIterator<Item = usize>) -> Vec<&TagVariant> {
        let mut ranked: Vec<&TagVariant> = hits.into_iter().map(|idx| &self.variants[idx]).collect();
        ranked.sort_by(|a, b| compare_by_rank(a, b));
        ranked
    }
}

/// Exact and fuzzy lookup over a set of tag variants.
///
/// # Examples
///
/// ```
/// use indexmap::IndexSet;
/// use tagnorm::{SearchIndex, TagVariant};
/// use time::OffsetDateTime;
///
/// let now = OffsetDateTime::now_utc();
/// let latex = TagVariant::new("latex", IndexSet::from(["latx".to_string()]), 3, Vec::new(), 0.8, now);
/// let index = SearchIndex::build(vec![latex]);
///
/// assert_eq!(index.search("latx")[0].canonical(), "latex");
/// assert_eq!(index.search("LATEX")[0].canonical(), "latex");
/// assert!(index.search("harbor").is_empty());
/// ```
pub struct SearchIndex {
    similarity: Similarity,
    snapshot: ArcSwap<IndexSnapshot>,
}

impl SearchIndex {
    /// Builds an index with the default similarity settings.
    pub fn build(variants: Vec<TagVariant>) -> Self {
        Self::with_similarity(variants, Similarity::default())
    }

    /// Builds an index that uses `similarity` for fuzzy token matches.
    pub fn with_similarity(variants: Vec<TagVariant>, similarity: Similarity) -> Self {
        let snapshot = IndexSnapshot::build(variants);
        tracing::debug!(
            variants = snapshot.variants.len(),
            tokens = snapshot.by_token.len(),
            "built search index"
        );
        Self {
            similarity,
            snapshot: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Replaces the whole vocabulary.
    ///
    /// The new maps are built off to the side and swapped in at once.
    pub fn update(&self, variants: Vec<TagVariant>) {
        let snapshot = IndexSnapshot::build(variants);
        tracing::debug!(
            variants = snapshot.variants.len(),
            tokens = snapshot.by_token.len(),
            "rebuilt search index"
        );
        self.snapshot.store(Arc::new(snapshot));
    }

    /// Finds variants matching `query`.
    ///
    /// Exact canonical and alias hits come first; token hits (exact and
    /// fuzzy) follow. Each group is ordered by confidence band, then count.
    pub fn search(&self, query: &str) -> Vec<TagVariant> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return Vec::new();
        }
        let snapshot = self.snapshot.load();

        let mut exact = IndexSet::new();
        if let Some(&idx) = snapshot.by_canonical.get(&normalized) {
            exact.insert(idx);
        }
        if let Some(&idx) = snapshot.by_alias.get(&normalized) {
            exact.insert(idx);
        }

        let mut related = IndexSet::new();
        for token in Tokenizer::tokenize(&normalized) {
            if let Some(postings) = snapshot.by_token.get(&token) {
                related.extend(postings.iter().copied());
            }
            for (indexed, postings) in &snapshot.by_token {
                if *indexed != token && self.similarity.is_similar(&token, indexed) {
                    related.extend(postings.iter().copied());
                }
            }
        }
        related.retain(|idx| !exact.contains(idx));

        tracing::trace!(
            query,
            exact = exact.len(),
            related = related.len(),
            "searched index"
        );

        snapshot
            .ranked(exact)
            .into_iter()
            .chain(snapshot.ranked(related))
            .cloned()
            .collect()
    }

    /// Returns every canonical label, most used first.
    pub fn all_canonical(&self) -> Vec<String> {
        let snapshot = self.snapshot.load();
        let mut variants: Vec<&TagVariant> = snapshot.variants.iter().collect();
        variants.sort_by(|a, b| b.count().cmp(&a.count()));
        variants
            .into_iter()
            .map(|v| v.canonical().to_string())
            .collect()
    }

    /// Returns a copy of the indexed variants.
    pub fn variants(&self) -> Vec<TagVariant> {
        self.snapshot.load().variants.clone()
    }

    /// Returns the number of indexed variants.
    pub fn len(&self) -> usize {
        self.snapshot.load().variants.len()
    }

    /// Returns true if the index holds no variants.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot.load();
        f.debug_struct("SearchIndex")
            .field("similarity", &self.similarity)
            .field("variants", &snapshot.variants.len())
            .field("tokens", &snapshot.by_token.len())
            .finish()
    }
}
