use serde::{Deserialize, Serialize};

use super::{ExtractError, Extractor, Provenance};
use crate::{LabelOccurrence, SourceKind, Tokenizer};

/// Separates the title from explicit tags, e.g. `Trip ,, beach ,, sunset.jpg`.
const TAG_MARKER: &str = ",,";

/// Most tokens a derived title may take.
const MAX_TITLE_TOKENS: usize = 3;

/// Longest suffix treated as a file extension.
const MAX_EXTENSION_LEN: usize = 5;

/// A filename split into its display title and filename-kind labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameLabels {
    pub title: String,
    pub occurrences: Vec<LabelOccurrence>,
}

impl Extractor {
    /// Splits `filename` into a title and filename-kind occurrences.
    ///
    /// With the `,,` marker the first segment is the title and every other
    /// non-empty segment becomes an occurrence verbatim. Without it the
    /// filename is tokenized and the first `min(3, ceil(n / 3))` tokens form
    /// the title.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ValueTooLong`] if `filename` exceeds the cap.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagnorm::extractors::{Extractor, Provenance};
    ///
    /// let extractor = Extractor::default();
    /// let labels = extractor
    ///     .split_title_and_tags("Trip Report ,, beach ,, sunset ,, family.jpg", &Provenance::now(None))
    ///     .unwrap();
    ///
    /// assert_eq!(labels.title, "Trip Report");
    /// let values: Vec<_> = labels.occurrences.iter().map(|o| o.value()).collect();
    /// assert_eq!(values, vec!["beach", "sunset", "family"]);
    /// ```
    pub fn split_title_and_tags(
        &self,
        filename: &str,
        provenance: &Provenance,
    ) -> Result<FilenameLabels, ExtractError> {
        self.check_len("filename", filename)?;
        let stem = strip_extension(filename);

        if stem.contains(TAG_MARKER) {
            let mut segments = stem.split(TAG_MARKER);
            let title = segments.next().unwrap_or_default().trim().to_string();
            let occurrences = segments
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(|tag| provenance.occurrence(SourceKind::Filename, tag))
                .collect();
            return Ok(FilenameLabels { title, occurrences });
        }

        let mut tokens = Tokenizer::tokenize(stem);
        for bracketed in Tokenizer::extract_bracket_content(stem) {
            tokens.extend(bracketed);
        }

        if tokens.is_empty() {
            return Ok(FilenameLabels {
                title: stem.trim().to_string(),
                occurrences: Vec::new(),
            });
        }

        let title_len = MAX_TITLE_TOKENS.min(tokens.len().div_ceil(3));
        let title = tokens
            .iter()
            .take(title_len)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let occurrences = tokens
            .iter()
            .skip(title_len)
            .map(|token| provenance.occurrence(SourceKind::Filename, token.as_str()))
            .collect();

        tracing::trace!(filename, %title, "split filename");
        Ok(FilenameLabels { title, occurrences })
    }
}

/// Removes a trailing `.ext` of up to five alphanumeric characters.
fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => filename,
    }
}
