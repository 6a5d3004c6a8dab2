//! Content resolution: candidate sources → complete narrative record.

mod fields;
mod library;
mod resolver;
mod sources;

pub use fields::ContentField;
pub use library::{ContentLibrary, ContentProvider};
pub use resolver::{
    first_non_blank, resolve_content, resolve_field, resolve_label, ContentRecord, LabelSource,
    Provenance, ProvenanceSummary, DEFAULT_PERSONA_LABEL,
};
pub use sources::{ContentSource, ContentSources, Insights, OverrideRow, SnapshotRow};
