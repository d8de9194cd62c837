//! Evaluation helpers for tuning the pattern table and thresholds.
//!
//! A corpus lists raw labels together with the canonical tags a good
//! grouping should produce; the metrics compare those against the variants
//! the engine actually emits.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::TagVariant;

/// Test corpus entry structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Raw label values, one occurrence each.
    pub labels: Vec<String>,
    /// Canonical tags the grouping should produce.
    pub expected_canonical: Vec<String>,
    /// Notes about this test case.
    #[serde(default)]
    pub notes: String,
}

/// Loads a corpus file. If `corpus_path` is `None` the bundled
/// `tests/fixtures/grouping_corpus.json` is used.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_corpus(corpus_path: Option<&Path>) -> Result<Vec<CorpusEntry>> {
    let path = corpus_path.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("grouping_corpus.json")
    });

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read corpus: {}", path.display()))?;
    let entries = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus: {}", path.display()))?;
    Ok(entries)
}

/// Calculates Jaccard similarity (intersection over union) between two tag sets.
///
/// Two empty sets are identical (1.0).
///
/// # Examples
///
/// ```
/// use tagnorm::grouping::jaccard_similarity;
/// use std::collections::HashSet;
///
/// let expected: HashSet<String> = ["dress", "beach"].iter().map(|s| s.to_string()).collect();
/// let actual: HashSet<String> = ["dress", "sunset"].iter().map(|s| s.to_string()).collect();
///
/// assert!((jaccard_similarity(&expected, &actual) - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn jaccard_similarity(expected: &HashSet<String>, actual: &HashSet<String>) -> f64 {
    if expected.is_empty() && actual.is_empty() {
        return 1.0;
    }

    let intersection = expected.intersection(actual).count();
    let union = expected.union(actual).count();
    intersection as f64 / union as f64
}

/// Calculates (precision, recall) of `actual` against `expected`.
pub fn precision_recall(expected: &HashSet<String>, actual: &HashSet<String>) -> (f64, f64) {
    let true_positives = expected.intersection(actual).count();

    let precision = if actual.is_empty() {
        if expected.is_empty() { 1.0 } else { 0.0 }
    } else {
        true_positives as f64 / actual.len() as f64
    };

    let recall = if expected.is_empty() {
        if actual.is_empty() { 1.0 } else { 0.0 }
    } else {
        true_positives as f64 / expected.len() as f64
    };

    (precision, recall)
}

/// Compares expected canonical tags with the canonicals of `variants`.
///
/// Returns (jaccard, precision, recall).
pub fn compare_tags(expected: &[String], variants: &[TagVariant]) -> (f64, f64, f64) {
    let expected_set: HashSet<String> = expected.iter().cloned().collect();
    let actual_set: HashSet<String> = variants.iter().map(|v| v.canonical().to_string()).collect();

    let jaccard = jaccard_similarity(&expected_set, &actual_set);
    let (precision, recall) = precision_recall(&expected_set, &actual_set);

    (jaccard, precision, recall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexSet;
    use time::OffsetDateTime;

    fn set(values: &[&str]) -> HashSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_jaccard_similarity_identical() {
        let tags = set(&["dress", "beach"]);
        assert_eq!(jaccard_similarity(&tags, &tags), 1.0);
        assert_eq!(jaccard_similarity(&set(&[]), &set(&[])), 1.0);
    }

    #[test]
    fn test_jaccard_similarity_no_overlap() {
        assert_eq!(jaccard_similarity(&set(&["dress"]), &set(&["beach"])), 0.0);
    }

    #[test]
    fn test_precision_recall_partial() {
        let expected = set(&["dress", "beach", "sunset"]);
        let actual = set(&["dress", "beach", "harbor"]);

        let (precision, recall) = precision_recall(&expected, &actual);
        assert!((precision - 0.667).abs() < 0.01);
        assert!((recall - 0.667).abs() < 0.01);
    }

    #[test]
    fn test_precision_recall_empty_sides() {
        assert_eq!(precision_recall(&set(&["dress"]), &set(&[])), (0.0, 0.0));
        assert_eq!(precision_recall(&set(&[]), &set(&["dress"])), (0.0, 0.0));
        assert_eq!(precision_recall(&set(&[]), &set(&[])), (1.0, 1.0));
    }

    #[test]
    fn test_compare_tags_uses_canonicals() {
        let now = OffsetDateTime::now_utc();
        let variants = vec![
            TagVariant::new("dress", IndexSet::from(["dresses".to_string()]), 3, Vec::new(), 0.9, now),
            TagVariant::new("harbor", IndexSet::new(), 1, Vec::new(), 1.0, now),
        ];
        let expected = vec!["dress".to_string(), "beach".to_string()];

        let (jaccard, precision, recall) = compare_tags(&expected, &variants);
        assert!((jaccard - 1.0 / 3.0).abs() < 0.01);
        assert!((precision - 0.5).abs() < 0.01);
        assert!((recall - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_bundled_corpus_loads() {
        let entries = load_corpus(None).expect("bundled corpus should parse");
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|e| !e.labels.is_empty()));
    }

    #[test]
    fn test_missing_corpus_reports_path() {
        let err = load_corpus(Some(Path::new("/nonexistent/corpus.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/corpus.json"));
    }
}
