//! Source extractors turning raw identifying strings into label occurrences.
//!
//! Three independent producers share one [`Extractor`]:
//!
//! - [`Extractor::split_title_and_tags`] splits a filename into a title and
//!   filename-kind labels
//! - [`Extractor::extract_folder`] reads folder path segments and the user's
//!   own folder label
//! - [`Extractor::extract_metadata`] reads EXIF, IPTC and XMP fields
//!
//! Every occurrence carries the same [`Provenance`]. Raw values longer than
//! the configured cap are rejected with [`ExtractError::ValueTooLong`] so the
//! caller can decide whether to truncate or drop them.

mod filename;
mod folder;
mod metadata;

use thiserror::Error;
use time::OffsetDateTime;

use crate::{EntityId, LabelOccurrence, SourceKind};

pub use filename::FilenameLabels;

/// Longest raw value accepted by default, in characters.
pub const DEFAULT_MAX_VALUE_LEN: usize = 256;

/// Errors raised at the extractor boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A raw value exceeded the length cap.
    #[error("{field} is {len} characters long (limit {max})")]
    ValueTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Owning entity and extraction time attached to every occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub entity_id: Option<EntityId>,
    pub extracted_at: OffsetDateTime,
}

impl Provenance {
    /// Creates provenance for `entity_id` stamped with the current time.
    pub fn now(entity_id: Option<EntityId>) -> Self {
        Self {
            entity_id,
            extracted_at: OffsetDateTime::now_utc(),
        }
    }

    pub(crate) fn occurrence(&self, kind: SourceKind, value: impl Into<String>) -> LabelOccurrence {
        LabelOccurrence::new(kind, value, self.entity_id.clone(), self.extracted_at)
    }
}

/// Extracts label occurrences from filenames, folders and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extractor {
    max_value_len: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VALUE_LEN)
    }
}

impl Extractor {
    /// Creates an extractor rejecting values longer than `max_value_len` characters.
    pub fn new(max_value_len: usize) -> Self {
        Self { max_value_len }
    }

    /// Returns the length cap.
    pub fn max_value_len(&self) -> usize {
        self.max_value_len
    }

    fn check_len(&self, field: &'static str, value: &str) -> Result<(), ExtractError> {
        let len = value.chars().count();
        if len > self.max_value_len {
            tracing::warn!(field, len, max = self.max_value_len, "rejecting oversized raw value");
            return Err(ExtractError::ValueTooLong {
                field,
                len,
                max: self.max_value_len,
            });
        }
        Ok(())
    }
}
