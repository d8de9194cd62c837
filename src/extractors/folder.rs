use super::{ExtractError, Extractor, Provenance};
use crate::{LabelOccurrence, SourceKind, Tokenizer};

impl Extractor {
    /// Tokenizes every `/`-separated segment of `path` into folder-kind
    /// occurrences, then the optional `user_folder` label into
    /// user_folder-kind occurrences.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::ValueTooLong`] if either input exceeds the cap.
    pub fn extract_folder(
        &self,
        path: &str,
        user_folder: Option<&str>,
        provenance: &Provenance,
    ) -> Result<Vec<LabelOccurrence>, ExtractError> {
        self.check_len("folder", path)?;
        if let Some(label) = user_folder {
            self.check_len("user_folder", label)?;
        }

        let mut occurrences: Vec<LabelOccurrence> = path
            .split('/')
            .filter(|segment| !segment.trim().is_empty())
            .flat_map(Tokenizer::tokenize)
            .map(|token| provenance.occurrence(SourceKind::Folder, token))
            .collect();

        if let Some(label) = user_folder {
            occurrences.extend(
                Tokenizer::tokenize(label)
                    .into_iter()
                    .map(|token| provenance.occurrence(SourceKind::UserFolder, token)),
            );
        }

        Ok(occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(occurrences: &[LabelOccurrence]) -> Vec<(SourceKind, &str)> {
        occurrences.iter().map(|o| (o.kind(), o.value())).collect()
    }

    #[test]
    fn path_segments_become_folder_occurrences() {
        let occurrences = Extractor::default()
            .extract_folder("/Photos/2023/Summer Trips/", None, &Provenance::now(None))
            .unwrap();

        assert_eq!(
            summary(&occurrences),
            vec![
                (SourceKind::Folder, "photo"),
                (SourceKind::Folder, "summer"),
                (SourceKind::Folder, "trip"),
            ]
        );
    }

    #[test]
    fn repeated_tokens_across_segments_are_kept() {
        let occurrences = Extractor::default()
            .extract_folder("beach/beach_day", None, &Provenance::now(None))
            .unwrap();

        assert_eq!(
            summary(&occurrences),
            vec![
                (SourceKind::Folder, "beach"),
                (SourceKind::Folder, "beach"),
                (SourceKind::Folder, "day"),
            ]
        );
    }

    #[test]
    fn user_folder_gets_its_own_kind() {
        let occurrences = Extractor::default()
            .extract_folder("inbox", Some("Red Dresses"), &Provenance::now(None))
            .unwrap();

        assert_eq!(
            summary(&occurrences),
            vec![
                (SourceKind::Folder, "inbox"),
                (SourceKind::UserFolder, "red"),
                (SourceKind::UserFolder, "dress"),
            ]
        );
    }

    #[test]
    fn empty_path_yields_nothing() {
        let occurrences = Extractor::default()
            .extract_folder("", None, &Provenance::now(None))
            .unwrap();
        assert!(occurrences.is_empty());
    }

    #[test]
    fn oversized_user_folder_is_rejected() {
        let label = "x".repeat(20);
        let result = Extractor::new(10).extract_folder("ok", Some(&label), &Provenance::now(None));

        assert!(matches!(
            result,
            Err(ExtractError::ValueTooLong { field: "user_folder", .. })
        ));
    }
}
