//! Tag normalization and fuzzy grouping.
//!
//! Turns noisy labels taken from filenames, folder names and embedded
//! metadata into a deduplicated canonical tag vocabulary with provenance and
//! confidence scores, plus a lookup index over that vocabulary.
//!
//! ```
//! use tagnorm::{LabelInput, TagEngine};
//!
//! let engine = TagEngine::default();
//! let processed = engine
//!     .process_labels(&LabelInput::new("Red_Dresses_Studio.jpg").user_folder("Dress"))
//!     .unwrap();
//!
//! let index = engine.build_index(processed.variants);
//! assert_eq!(index.search("Dress")[0].canonical(), "dress");
//! assert_eq!(index.search("studo")[0].canonical(), "studio");
//! ```

pub mod config;
pub mod engine;
pub mod extractors;
pub mod grouping;
pub mod index;
pub mod models;
pub mod scorer;
pub mod similarity;
pub mod tokenizer;
pub mod tracing_setup;

pub use engine::{LabelInput, ProcessedLabels, TagEngine, TagEngineBuilder};
pub use extractors::ExtractError;
pub use index::SearchIndex;
pub use models::{
    EntityId, ExifFields, IptcFields, LabelOccurrence, Metadata, SourceKind, TagVariant, XmpFields,
};
pub use scorer::{EntityText, RelevanceScorer};
pub use similarity::Similarity;
pub use tokenizer::Tokenizer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_accessible_from_crate_root() {
        let engine = TagEngine::default();
        let variants = engine.group(&[]);
        assert!(variants.is_empty());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        use time::OffsetDateTime;

        let source = SourceKind::UserFolder;
        assert_eq!(format!("{}", source), "user_folder");

        let occurrence = LabelOccurrence::manual("beach", None, OffsetDateTime::now_utc());
        assert_eq!(occurrence.value(), "beach");

        let tokens = Tokenizer::tokenize("Beach_Day");
        assert_eq!(tokens.len(), 2);

        assert_eq!(Similarity::default().similarity("a", "a"), 1.0);
    }
}
