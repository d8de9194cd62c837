use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{EntityId, SourceKind};

/// One raw label extracted from one source, with provenance.
///
/// Occurrences are immutable once created. The grouping engine keeps them
/// unmodified inside the `TagVariant` that subsumes their value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOccurrence {
    kind: SourceKind,
    value: String,
    entity_id: Option<EntityId>,
    #[serde(with = "time::serde::rfc3339")]
    extracted_at: OffsetDateTime,
}

impl LabelOccurrence {
    /// Creates a new occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagnorm::{EntityId, LabelOccurrence, SourceKind};
    /// use time::OffsetDateTime;
    ///
    /// let now = OffsetDateTime::now_utc();
    /// let occurrence = LabelOccurrence::new(
    ///     SourceKind::Folder,
    ///     "beach",
    ///     Some(EntityId::new("img-1")),
    ///     now,
    /// );
    ///
    /// assert_eq!(occurrence.kind(), SourceKind::Folder);
    /// assert_eq!(occurrence.value(), "beach");
    /// assert_eq!(occurrence.entity_id().map(EntityId::as_str), Some("img-1"));
    /// ```
    pub fn new(
        kind: SourceKind,
        value: impl Into<String>,
        entity_id: Option<EntityId>,
        extracted_at: OffsetDateTime,
    ) -> Self {
        Self {
            kind,
            value: value.into(),
            entity_id,
            extracted_at,
        }
    }

    /// Creates a manual-kind occurrence for a tag the user entered by hand.
    pub fn manual(
        value: impl Into<String>,
        entity_id: Option<EntityId>,
        extracted_at: OffsetDateTime,
    ) -> Self {
        Self::new(SourceKind::Manual, value, entity_id, extracted_at)
    }

    /// Returns the source kind.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Returns the raw label value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the owning entity, if known.
    pub fn entity_id(&self) -> Option<&EntityId> {
        self.entity_id.as_ref()
    }

    /// Returns when the label was extracted.
    pub fn extracted_at(&self) -> OffsetDateTime {
        self.extracted_at
    }
}

impl fmt::Display for LabelOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.value, self.kind)?;
        if let Some(entity_id) = &self.entity_id {
            write!(f, " of {entity_id}")?;
        }
        write!(f, ")")
    }
}
