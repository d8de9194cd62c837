//! Entry point tying extraction, grouping, indexing and scoring together.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::EngineConfig;
use crate::extractors::{DEFAULT_MAX_VALUE_LEN, ExtractError, Extractor, Provenance};
use crate::grouping::{PatternTable, TagGrouper};
use crate::{
    EntityId, EntityText, LabelOccurrence, Metadata, RelevanceScorer, SearchIndex, Similarity,
    TagVariant,
};

/// Raw identifying strings of one entity.
///
/// # Examples
///
/// ```
/// use tagnorm::LabelInput;
///
/// let input = LabelInput::new("Sunset_Beach.jpg")
///     .folder("Photos/Hawaii")
///     .user_folder("Vacations")
///     .entity("img-12");
/// assert_eq!(input.folder_name.as_deref(), Some("Photos/Hawaii"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInput {
    pub filename: String,
    pub folder_name: Option<String>,
    pub user_folder_name: Option<String>,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    pub entity_id: Option<EntityId>,
}

impl LabelInput {
    /// Creates input for `filename` with nothing else attached.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Sets the folder path.
    pub fn folder(mut self, path: impl Into<String>) -> Self {
        self.folder_name = Some(path.into());
        self
    }

    /// Sets the folder label the user typed.
    pub fn user_folder(mut self, label: impl Into<String>) -> Self {
        self.user_folder_name = Some(label.into());
        self
    }

    /// Adds a metadata record.
    pub fn metadata(mut self, record: Metadata) -> Self {
        self.metadata.push(record);
        self
    }

    /// Sets the owning entity.
    pub fn entity(mut self, id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(id.into());
        self
    }
}

/// Title and tags derived from one entity's raw strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedLabels {
    pub title: String,
    pub raw_occurrences: Vec<LabelOccurrence>,
    pub canonical_tags: Vec<String>,
    pub variants: Vec<TagVariant>,
}

/// Builder for constructing `TagEngine` instances.
///
/// # Examples
///
/// ```
/// use tagnorm::grouping::PatternTable;
/// use tagnorm::{Similarity, TagEngineBuilder};
///
/// let engine = TagEngineBuilder::new()
///     .similarity(Similarity::new(2, 0.8))
///     .patterns(PatternTable::empty())
///     .max_value_len(128)
///     .build();
/// assert_eq!(engine.extractor().max_value_len(), 128);
/// ```
#[derive(Debug, Default)]
pub struct TagEngineBuilder {
    similarity: Option<Similarity>,
    patterns: Option<PatternTable>,
    max_value_len: Option<usize>,
}

impl TagEngineBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from loaded configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new()
            .similarity(config.similarity())
            .patterns(config.pattern_table())
            .max_value_len(config.max_value_len)
    }

    /// Sets the similarity settings used for grouping, search and scoring.
    pub fn similarity(mut self, similarity: Similarity) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Sets the curated pattern table.
    ///
    /// Defaults to [`PatternTable::builtin`].
    pub fn patterns(mut self, patterns: PatternTable) -> Self {
        self.patterns = Some(patterns);
        self
    }

    /// Sets the longest raw value the extractors accept.
    pub fn max_value_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = Some(max_value_len);
        self
    }

    /// Builds the `TagEngine`.
    pub fn build(self) -> TagEngine {
        let similarity = self.similarity.unwrap_or_default();
        TagEngine {
            extractor: Extractor::new(self.max_value_len.unwrap_or(DEFAULT_MAX_VALUE_LEN)),
            grouper: TagGrouper::new(
                similarity,
                self.patterns.unwrap_or_else(PatternTable::builtin),
            ),
            scorer: RelevanceScorer::new(similarity),
        }
    }
}

/// Stateless tag normalization engine.
///
/// The engine owns configuration only; every call is a pure function of its
/// arguments, so one engine can serve any number of threads.
///
/// # Examples
///
/// ```
/// use tagnorm::{LabelInput, TagEngine};
///
/// let engine = TagEngine::default();
/// let processed = engine
///     .process_labels(&LabelInput::new("Trip Report ,, beach ,, sunset ,, family.jpg"))
///     .unwrap();
///
/// assert_eq!(processed.title, "Trip Report");
/// assert_eq!(processed.raw_occurrences.len(), 3);
/// assert!(processed.canonical_tags.contains(&"beach".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct TagEngine {
    extractor: Extractor,
    grouper: TagGrouper,
    scorer: RelevanceScorer,
}

impl Default for TagEngine {
    fn default() -> Self {
        TagEngineBuilder::new().build()
    }
}

impl TagEngine {
    /// Returns the extractor.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Returns the grouper.
    pub fn grouper(&self) -> &TagGrouper {
        &self.grouper
    }

    /// Derives a title, raw occurrences and grouped tags for one entity.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ValueTooLong`] if any raw input exceeds the
    /// length cap. Nothing is extracted in that case.
    pub fn process_labels(&self, input: &LabelInput) -> Result<ProcessedLabels, ExtractError> {
        let provenance = Provenance::now(input.entity_id.clone());

        let filename = self
            .extractor
            .split_title_and_tags(&input.filename, &provenance)?;
        let mut raw_occurrences = filename.occurrences;

        if input.folder_name.is_some() || input.user_folder_name.is_some() {
            raw_occurrences.extend(self.extractor.extract_folder(
                input.folder_name.as_deref().unwrap_or_default(),
                input.user_folder_name.as_deref(),
                &provenance,
            )?);
        }
        raw_occurrences.extend(
            self.extractor
                .extract_metadata(&input.metadata, &provenance)?,
        );

        let variants = self
            .grouper
            .group_at(&raw_occurrences, provenance.extracted_at);
        let canonical_tags = variants
            .iter()
            .map(|v| v.canonical().to_string())
            .collect();

        tracing::debug!(
            entity = ?input.entity_id,
            occurrences = raw_occurrences.len(),
            "processed labels"
        );

        Ok(ProcessedLabels {
            title: filename.title,
            raw_occurrences,
            canonical_tags,
            variants,
        })
    }

    /// Recomputes the shared vocabulary from every known occurrence.
    pub fn group(&self, occurrences: &[LabelOccurrence]) -> Vec<TagVariant> {
        self.grouper.group(occurrences)
    }

    /// Like [`TagEngine::group`], but stamps variants with `now`.
    pub fn group_at(&self, occurrences: &[LabelOccurrence], now: OffsetDateTime) -> Vec<TagVariant> {
        self.grouper.group_at(occurrences, now)
    }

    /// Builds a search index over `variants` with this engine's similarity settings.
    pub fn build_index(&self, variants: Vec<TagVariant>) -> SearchIndex {
        SearchIndex::with_similarity(variants, *self.grouper.similarity())
    }

    /// Scores an entity for a free-text query.
    pub fn score(&self, entity: &EntityText<'_>, query: &str) -> u32 {
        self.scorer.score(entity, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IptcFields, SourceKind};

    #[test]
    fn process_labels_combines_every_source() {
        let input = LabelInput::new("Sunset_Beach_Family_Vacation_Hawaii.jpg")
            .folder("Photos/Islands")
            .user_folder("Vacations")
            .metadata(Metadata::Iptc(IptcFields {
                keywords: vec!["ocean".to_string()],
                ..Default::default()
            }))
            .entity("img-5");

        let processed = TagEngine::default().process_labels(&input).unwrap();

        assert_eq!(processed.title, "sunset beach");
        let kinds: Vec<_> = processed.raw_occurrences.iter().map(|o| o.kind()).collect();
        assert!(kinds.contains(&SourceKind::Filename));
        assert!(kinds.contains(&SourceKind::Folder));
        assert!(kinds.contains(&SourceKind::UserFolder));
        assert!(kinds.contains(&SourceKind::Metadata));
        assert!(
            processed
                .raw_occurrences
                .iter()
                .all(|o| o.entity_id() == Some(&EntityId::new("img-5")))
        );
        // "vacation" (filename) and "vacation" (user folder) share a variant
        let vacation = processed
            .variants
            .iter()
            .find(|v| v.canonical() == "vacation")
            .unwrap();
        assert_eq!(vacation.count(), 2);
        assert!(processed.canonical_tags.contains(&"ocean".to_string()));
    }

    #[test]
    fn process_labels_without_folder_skips_folder_extraction() {
        let processed = TagEngine::default()
            .process_labels(&LabelInput::new("harbor ,, boats.jpg"))
            .unwrap();

        assert_eq!(processed.title, "harbor");
        assert_eq!(processed.canonical_tags, vec!["boats"]);
    }

    #[test]
    fn process_labels_rejects_oversized_input() {
        let engine = TagEngineBuilder::new().max_value_len(16).build();
        let input = LabelInput::new("short.jpg").folder("a/very/long/folder/path");

        let err = engine.process_labels(&input).unwrap_err();
        assert!(matches!(err, ExtractError::ValueTooLong { field: "folder", .. }));
    }

    #[test]
    fn builder_applies_pattern_table() {
        let engine = TagEngineBuilder::new().patterns(PatternTable::empty()).build();
        assert!(engine.grouper().patterns().is_empty());

        let default_engine = TagEngine::default();
        assert!(!default_engine.grouper().patterns().is_empty());
    }

    #[test]
    fn group_at_is_repeatable_with_fixed_timestamp() {
        let at = time::macros::datetime!(2024-05-02 8:00 UTC);
        let occurrences: Vec<_> = ["latx", "latex", "black and white"]
            .into_iter()
            .map(|v| LabelOccurrence::new(SourceKind::Filename, v, None, at))
            .collect();
        let engine = TagEngine::default();

        let first = engine.group_at(&occurrences, at);
        let second = engine.group_at(&occurrences, at);

        assert_eq!(first, second);
        assert!(first.iter().all(|v| v.last_updated() == at));
        let latex = first.iter().find(|v| v.canonical() == "latex").unwrap();
        assert!(!latex.contains("black and white"));
    }

    #[test]
    fn build_index_uses_engine_similarity() {
        let engine = TagEngineBuilder::new()
            .similarity(Similarity::new(3, 0.95))
            .build();
        let variants = engine.group(&[LabelOccurrence::manual(
            "harbor",
            None,
            time::OffsetDateTime::now_utc(),
        )]);
        let index = engine.build_index(variants);

        assert!(index.search("harbr").is_empty());
        assert_eq!(index.search("harbor").len(), 1);
    }
}
