//! Relevance scoring for ordering search results.

use crate::Similarity;

const TITLE_MATCH: u32 = 100;
const TAG_EXACT: u32 = 80;
const TAG_CONTAINS: u32 = 50;
const FILENAME_MATCH: u32 = 30;
const TAG_FUZZY: u32 = 20;

/// The text of an entity being ranked.
#[derive(Debug, Clone, Copy)]
pub struct EntityText<'a> {
    pub title: &'a str,
    pub tags: &'a [String],
    pub filename: &'a str,
}

/// Additive, case-insensitive relevance score of an entity for a query.
///
/// Scores only compare entities within one query; they are not normalized
/// by entity length.
///
/// | Check                               | Points |
/// |-------------------------------------|--------|
/// | title contains the query            | 100    |
/// | a tag equals the query              | 80     |
/// | a tag contains the query            | 50     |
/// | filename contains the query         | 30     |
/// | a tag is fuzzily similar to query   | 20     |
///
/// The checks are independent, so an exact tag match also collects the
/// contains and fuzzy bonuses.
///
/// # Examples
///
/// ```
/// use tagnorm::{EntityText, RelevanceScorer};
///
/// let tags = vec!["beach".to_string(), "sunset".to_string()];
/// let entity = EntityText { title: "Beach day", tags: &tags, filename: "IMG_0042.jpg" };
///
/// let scorer = RelevanceScorer::default();
/// assert_eq!(scorer.score(&entity, "beach"), 100 + 80 + 50 + 20);
/// assert_eq!(scorer.score(&entity, "volcano"), 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer {
    similarity: Similarity,
}

impl RelevanceScorer {
    /// Creates a scorer using `similarity` for the fuzzy tag bonus.
    pub fn new(similarity: Similarity) -> Self {
        Self { similarity }
    }

    /// Scores `entity` against `query`. An empty query scores 0.
    pub fn score(&self, entity: &EntityText<'_>, query: &str) -> u32 {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return 0;
        }
        let tags: Vec<String> = entity.tags.iter().map(|t| t.to_lowercase()).collect();

        let mut score = 0;
        if entity.title.to_lowercase().contains(&query) {
            score += TITLE_MATCH;
        }
        if tags.iter().any(|tag| *tag == query) {
            score += TAG_EXACT;
        }
        if tags.iter().any(|tag| tag.contains(&query)) {
            score += TAG_CONTAINS;
        }
        if entity.filename.to_lowercase().contains(&query) {
            score += FILENAME_MATCH;
        }
        if tags.iter().any(|tag| self.similarity.is_similar(tag, &query)) {
            score += TAG_FUZZY;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn title_and_filename_matches_are_case_insensitive() {
        let tags = tags(&[]);
        let entity = EntityText {
            title: "Harbor At Dawn",
            tags: &tags,
            filename: "HARBOR_dawn.jpg",
        };

        assert_eq!(RelevanceScorer::default().score(&entity, "harbor"), 100 + 30);
    }

    #[test]
    fn exact_tag_collects_every_tag_bonus() {
        let tags = tags(&["Latex"]);
        let entity = EntityText {
            title: "",
            tags: &tags,
            filename: "",
        };

        assert_eq!(RelevanceScorer::default().score(&entity, "latex"), 80 + 50 + 20);
    }

    #[test]
    fn substring_tag_without_exact_match() {
        let tags = tags(&["latex dress"]);
        let entity = EntityText {
            title: "",
            tags: &tags,
            filename: "",
        };

        assert_eq!(RelevanceScorer::default().score(&entity, "latex"), 50);
    }

    #[test]
    fn long_tag_gets_no_fuzzy_bonus_for_short_query() {
        let tags = tags(&["sunset beach vacation"]);
        let entity = EntityText {
            title: "",
            tags: &tags,
            filename: "",
        };

        // "vaCATion" contains the query, nothing else applies
        assert_eq!(RelevanceScorer::default().score(&entity, "cat"), 50);
    }

    #[test]
    fn fuzzy_tag_only() {
        let tags = tags(&["sunset"]);
        let entity = EntityText {
            title: "Evening",
            tags: &tags,
            filename: "evening.png",
        };

        assert_eq!(RelevanceScorer::default().score(&entity, "sunsett"), 20);
    }

    #[test]
    fn empty_query_scores_zero() {
        let tags = tags(&["beach"]);
        let entity = EntityText {
            title: "beach",
            tags: &tags,
            filename: "beach.jpg",
        };

        assert_eq!(RelevanceScorer::default().score(&entity, "  "), 0);
    }
}
