use serde::{Deserialize, Serialize};

/// Embedded image metadata, one record per namespace.
///
/// Each namespace exposes a fixed list of fields the metadata extractor reads.
/// Keys outside that list are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "namespace", rename_all = "lowercase")]
pub enum Metadata {
    Exif(ExifFields),
    Iptc(IptcFields),
    Xmp(XmpFields),
}

/// EXIF fields consulted for labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExifFields {
    pub image_description: Option<String>,
    pub user_comment: Option<String>,
    pub xp_title: Option<String>,
    pub xp_subject: Option<String>,
    pub xp_keywords: Vec<String>,
}

/// IPTC fields consulted for labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IptcFields {
    pub object_name: Option<String>,
    pub headline: Option<String>,
    pub caption: Option<String>,
    pub category: Option<String>,
    pub keywords: Vec<String>,
    pub supplemental_categories: Vec<String>,
}

/// XMP fields consulted for labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmpFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub subject: Vec<String>,
    pub hierarchical_subject: Vec<String>,
}

impl Metadata {
    /// Returns the namespace name.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Exif(_) => "exif",
            Self::Iptc(_) => "iptc",
            Self::Xmp(_) => "xmp",
        }
    }

    /// Returns `(field, text)` for every populated field, in field-list order.
    ///
    /// List fields are joined with single spaces.
    pub fn field_values(&self) -> Vec<(&'static str, String)> {
        let mut values = Vec::new();
        match self {
            Self::Exif(f) => {
                push_text(&mut values, "image_description", &f.image_description);
                push_text(&mut values, "user_comment", &f.user_comment);
                push_text(&mut values, "xp_title", &f.xp_title);
                push_text(&mut values, "xp_subject", &f.xp_subject);
                push_list(&mut values, "xp_keywords", &f.xp_keywords);
            }
            Self::Iptc(f) => {
                push_text(&mut values, "object_name", &f.object_name);
                push_text(&mut values, "headline", &f.headline);
                push_text(&mut values, "caption", &f.caption);
                push_text(&mut values, "category", &f.category);
                push_list(&mut values, "keywords", &f.keywords);
                push_list(&mut values, "supplemental_categories", &f.supplemental_categories);
            }
            Self::Xmp(f) => {
                push_text(&mut values, "title", &f.title);
                push_text(&mut values, "description", &f.description);
                push_text(&mut values, "label", &f.label);
                push_list(&mut values, "subject", &f.subject);
                push_list(&mut values, "hierarchical_subject", &f.hierarchical_subject);
            }
        }
        values
    }
}

fn push_text(values: &mut Vec<(&'static str, String)>, field: &'static str, text: &Option<String>) {
    if let Some(text) = text
        && !text.trim().is_empty()
    {
        values.push((field, text.clone()));
    }
}

fn push_list(values: &mut Vec<(&'static str, String)>, field: &'static str, list: &[String]) {
    if !list.is_empty() {
        values.push((field, list.join(" ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_values_joins_list_fields() {
        let metadata = Metadata::Iptc(IptcFields {
            headline: Some("Summer trip".to_string()),
            keywords: vec!["beach".to_string(), "sunset".to_string()],
            ..Default::default()
        });

        assert_eq!(
            metadata.field_values(),
            vec![
                ("headline", "Summer trip".to_string()),
                ("keywords", "beach sunset".to_string()),
            ]
        );
    }

    #[test]
    fn field_values_skips_blank_text() {
        let metadata = Metadata::Xmp(XmpFields {
            title: Some("   ".to_string()),
            ..Default::default()
        });

        assert!(metadata.field_values().is_empty());
    }

    #[test]
    fn deserialization_ignores_unknown_keys() {
        let json = r#"{
            "namespace": "exif",
            "image_description": "Harbor at dawn",
            "camera_serial": "XYZ-123",
            "xp_keywords": ["boats", "harbor"]
        }"#;

        let metadata: Metadata = serde_json::from_str(json).unwrap();

        assert_eq!(metadata.namespace(), "exif");
        assert_eq!(
            metadata.field_values(),
            vec![
                ("image_description", "Harbor at dawn".to_string()),
                ("xp_keywords", "boats harbor".to_string()),
            ]
        );
    }

    #[test]
    fn deserialization_fails_on_unknown_namespace() {
        let result: Result<Metadata, _> = serde_json::from_str(r#"{"namespace": "id3"}"#);
        assert!(result.is_err());
    }
}
