use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::LabelOccurrence;

/// A clustered, canonicalized tag: the unit of the vocabulary.
///
/// `canonical` is the preferred label and `aliases` hold the other members of
/// the same equivalence class. Variants are rebuilt from scratch on every
/// grouping pass and are never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagVariant {
    canonical: String,
    aliases: IndexSet<String>,
    count: usize,
    sources: Vec<LabelOccurrence>,
    confidence: f64,
    #[serde(with = "time::serde::rfc3339")]
    last_updated: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_override: Option<bool>,
}

impl TagVariant {
    /// Creates a new variant.
    ///
    /// The canonical label is removed from `aliases` if present and
    /// `confidence` is clamped to `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use indexmap::IndexSet;
    /// use tagnorm::TagVariant;
    /// use time::OffsetDateTime;
    ///
    /// let aliases: IndexSet<String> = ["latx".to_string(), "latex".to_string()].into();
    /// let variant = TagVariant::new("latex", aliases, 4, Vec::new(), 0.9, OffsetDateTime::now_utc());
    ///
    /// assert_eq!(variant.canonical(), "latex");
    /// assert_eq!(variant.aliases().len(), 1);
    /// assert!(variant.aliases().contains("latx"));
    /// ```
    pub fn new(
        canonical: impl Into<String>,
        mut aliases: IndexSet<String>,
        count: usize,
        sources: Vec<LabelOccurrence>,
        confidence: f64,
        last_updated: OffsetDateTime,
    ) -> Self {
        let canonical = canonical.into();
        aliases.shift_remove(&canonical);
        Self {
            canonical,
            aliases,
            count,
            sources,
            confidence: confidence.clamp(0.0, 1.0),
            last_updated,
            user_override: None,
        }
    }

    /// Marks the variant as confirmed (`true`) or rejected (`false`) by the user.
    #[must_use]
    pub fn with_user_override(mut self, user_override: bool) -> Self {
        self.user_override = Some(user_override);
        self
    }

    /// Returns the preferred label.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Returns the other labels of the class, in member order.
    pub fn aliases(&self) -> &IndexSet<String> {
        &self.aliases
    }

    /// Returns the canonical label followed by every alias.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Returns true if `label` is the canonical label or one of the aliases.
    pub fn contains(&self, label: &str) -> bool {
        self.canonical == label || self.aliases.contains(label)
    }

    /// Returns the number of raw occurrences that fell into this class.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the occurrences this variant was built from.
    pub fn sources(&self) -> &[LabelOccurrence] {
        &self.sources
    }

    /// Returns the cluster coherence score (0.0-1.0).
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns when this variant was computed.
    pub fn last_updated(&self) -> OffsetDateTime {
        self.last_updated
    }

    /// Returns the user's verdict on this variant, if any.
    pub fn user_override(&self) -> Option<bool> {
        self.user_override
    }
}
