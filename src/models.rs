mod ids;
mod label_occurrence;
mod metadata;
mod source_kind;
mod tag_variant;

pub use ids::EntityId;
pub use label_occurrence::LabelOccurrence;
pub use metadata::{ExifFields, IptcFields, Metadata, XmpFields};
pub use source_kind::SourceKind;
pub use tag_variant::TagVariant;
