use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a raw label was extracted from.
///
/// `UserFolder` and `Manual` carry user intent and are preferred when a
/// cluster's canonical label is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Token from the entity's filename.
    Filename,
    /// Token from a segment of the entity's folder path.
    Folder,
    /// Token from a folder label the user typed.
    UserFolder,
    /// Token from embedded EXIF/IPTC/XMP metadata.
    Metadata,
    /// Tag entered by hand.
    Manual,
}

impl SourceKind {
    /// Returns true for kinds that reflect an explicit user choice.
    pub fn is_user_intent(self) -> bool {
        matches!(self, Self::UserFolder | Self::Manual)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filename => write!(f, "filename"),
            Self::Folder => write!(f, "folder"),
            Self::UserFolder => write!(f, "user_folder"),
            Self::Metadata => write!(f, "metadata"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_serializes_to_snake_case() {
        let json = serde_json::to_string(&SourceKind::UserFolder).unwrap();
        assert_eq!(json, r#""user_folder""#);

        let deserialized: SourceKind = serde_json::from_str(r#""metadata""#).unwrap();
        assert_eq!(deserialized, SourceKind::Metadata);
    }

    #[test]
    fn test_source_kind_deserialization_fails_on_unknown_variant() {
        let result: Result<SourceKind, _> = serde_json::from_str(r#""llm""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_kind_display_matches_serialized_form() {
        for kind in [
            SourceKind::Filename,
            SourceKind::Folder,
            SourceKind::UserFolder,
            SourceKind::Metadata,
            SourceKind::Manual,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json.trim_matches('"'), kind.to_string());
        }
    }

    #[test]
    fn test_only_user_folder_and_manual_carry_user_intent() {
        assert!(SourceKind::UserFolder.is_user_intent());
        assert!(SourceKind::Manual.is_user_intent());
        assert!(!SourceKind::Filename.is_user_intent());
        assert!(!SourceKind::Folder.is_user_intent());
        assert!(!SourceKind::Metadata.is_user_intent());
    }
}
