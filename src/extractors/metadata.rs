use super::{ExtractError, Extractor, Provenance};
use crate::{LabelOccurrence, Metadata, SourceKind, Tokenizer};

impl Extractor {
    /// Tokenizes the populated fields of every metadata record into
    /// metadata-kind occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ValueTooLong`] if a field value (list fields
    /// joined with spaces) exceeds the cap.
    pub fn extract_metadata(
        &self,
        records: &[Metadata],
        provenance: &Provenance,
    ) -> Result<Vec<LabelOccurrence>, ExtractError> {
        let mut occurrences = Vec::new();
        for record in records {
            for (field, text) in record.field_values() {
                self.check_len(field, &text)?;
                occurrences.extend(
                    Tokenizer::tokenize(&text)
                        .into_iter()
                        .map(|token| provenance.occurrence(SourceKind::Metadata, token)),
                );
            }
        }
        Ok(occurrences)
    }
}
