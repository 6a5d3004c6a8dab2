//! Field-by-field precedence resolution.
//!
//! For every field: override → insights → snapshot → placeholder. The label
//! runs its own chain: override → snapshot → name table → default label.
//! Blank and absent are the same thing; nothing here can fail.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fields::ContentField;
use super::sources::ContentSources;
use crate::persona::{PersonaCode, PersonaNames};

/// Label used when every other label source is blank.
pub const DEFAULT_PERSONA_LABEL: &str = "Quantum Profile";

/// Which tier produced a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Override,
    Insights,
    Snapshot,
    Default,
}

impl Provenance {
    /// Snapshot and default values count as fallback content.
    pub fn is_fallback(self) -> bool {
        matches!(self, Self::Snapshot | Self::Default)
    }
}

/// Which tier produced the persona label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    Override,
    Snapshot,
    NameTable,
    Default,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceSummary {
    /// An override row was supplied, whatever it contained.
    pub table_used: bool,
    /// At least one field came from the snapshot or the placeholder.
    pub used_fallback: bool,
}

/// Fully resolved narrative content for one persona. Every field is present
/// and non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub persona_code: PersonaCode,
    pub persona_label: String,
    pub label_provenance: LabelSource,
    pub fields: BTreeMap<ContentField, String>,
    pub field_provenance: BTreeMap<ContentField, Provenance>,
    pub provenance: ProvenanceSummary,
}

impl ContentRecord {
    pub fn field(&self, field: ContentField) -> &str {
        self.fields
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.default_text())
    }

    pub fn provenance_of(&self, field: ContentField) -> Provenance {
        self.field_provenance
            .get(&field)
            .copied()
            .unwrap_or(Provenance::Default)
    }

    /// Fields still served from the snapshot or the placeholder.
    pub fn fallback_fields(&self) -> Vec<ContentField> {
        ContentField::ALL
            .into_iter()
            .filter(|f| self.provenance_of(*f).is_fallback())
            .collect()
    }
}

/// First candidate whose value is non-blank after trimming, returned trimmed
/// with its tag.
pub fn first_non_blank<'a, T: Copy>(candidates: &[(T, Option<&'a str>)]) -> Option<(T, &'a str)> {
    candidates.iter().find_map(|&(tag, value)| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| (tag, v))
    })
}

pub fn resolve_field(field: ContentField, sources: &ContentSources) -> (Provenance, String) {
    let candidates = [
        (
            Provenance::Override,
            sources.override_row.as_ref().and_then(|r| r.field(field)),
        ),
        (
            Provenance::Insights,
            sources.insights.as_ref().and_then(|i| i.field(field)),
        ),
        (
            Provenance::Snapshot,
            sources.snapshot.as_ref().and_then(|s| s.field(field)),
        ),
    ];
    let (tag, text) =
        first_non_blank(&candidates).unwrap_or((Provenance::Default, field.default_text()));
    (tag, text.to_string())
}

pub fn resolve_label(
    code: PersonaCode,
    sources: &ContentSources,
    names: &PersonaNames,
    default_label: &str,
) -> (LabelSource, String) {
    let candidates = [
        (
            LabelSource::Override,
            sources
                .override_row
                .as_ref()
                .and_then(|r| r.persona_label.as_deref()),
        ),
        (
            LabelSource::Snapshot,
            sources
                .snapshot
                .as_ref()
                .and_then(|s| s.persona_name.as_deref()),
        ),
        (LabelSource::NameTable, names.get(code)),
        (LabelSource::Default, Some(default_label)),
    ];
    let (tag, label) =
        first_non_blank(&candidates).unwrap_or((LabelSource::Default, DEFAULT_PERSONA_LABEL));
    (tag, label.to_string())
}

/// Merge the candidate sources for `code` into a complete record.
pub fn resolve_content(
    code: PersonaCode,
    sources: &ContentSources,
    names: &PersonaNames,
    default_label: &str,
) -> ContentRecord {
    let mut fields = BTreeMap::new();
    let mut field_provenance = BTreeMap::new();
    for field in ContentField::ALL {
        let (tag, text) = resolve_field(field, sources);
        fields.insert(field, text);
        field_provenance.insert(field, tag);
    }

    let (label_provenance, persona_label) = resolve_label(code, sources, names, default_label);
    let provenance = ProvenanceSummary {
        table_used: sources.override_row.is_some(),
        used_fallback: field_provenance.values().any(|p| p.is_fallback()),
    };

    ContentRecord {
        persona_code: code,
        persona_label,
        label_provenance,
        fields,
        field_provenance,
        provenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Mindset, Personality};
    use crate::content::sources::{Insights, OverrideRow, SnapshotRow};
    use crate::persona::persona_code;

    fn b3() -> PersonaCode {
        persona_code(Personality::Flow, Mindset::Vector)
    }

    #[test]
    fn first_non_blank_skips_blank_and_absent() {
        let picked =
            first_non_blank(&[(1, None), (2, Some("   ")), (3, Some(" x ")), (4, Some("y"))]);
        assert_eq!(picked, Some((3, "x")));
        assert_eq!(first_non_blank::<u8>(&[(1, Some(""))]), None);
    }

    #[test]
    fn no_sources_gives_placeholders_everywhere() {
        let record = resolve_content(
            b3(),
            &ContentSources::new(),
            &PersonaNames::builtin(),
            DEFAULT_PERSONA_LABEL,
        );
        for field in ContentField::ALL {
            assert_eq!(record.field(field), field.default_text());
            assert_eq!(record.provenance_of(field), Provenance::Default);
        }
        assert!(record.provenance.used_fallback);
        assert!(!record.provenance.table_used);
        assert_eq!(record.persona_label, "Flow Vector");
        assert_eq!(record.label_provenance, LabelSource::NameTable);
    }

    #[test]
    fn blank_override_does_not_block_insights() {
        let sources = ContentSources::new()
            .with_override(OverrideRow::default().with_field(ContentField::Motivators, "  "))
            .with_insights(Insights::new().with_field(ContentField::Motivators, "Progress."));
        let record =
            resolve_content(b3(), &sources, &PersonaNames::builtin(), DEFAULT_PERSONA_LABEL);
        assert_eq!(record.field(ContentField::Motivators), "Progress.");
        assert_eq!(
            record.provenance_of(ContentField::Motivators),
            Provenance::Insights
        );
        assert!(record.provenance.table_used);
    }

    #[test]
    fn label_falls_back_to_default_without_a_name() {
        let sources = ContentSources::new().with_snapshot(SnapshotRow {
            persona_name: Some(" ".into()),
            ..SnapshotRow::default()
        });
        let (tag, label) =
            resolve_label(b3(), &sources, &PersonaNames::empty(), DEFAULT_PERSONA_LABEL);
        assert_eq!((tag, label.as_str()), (LabelSource::Default, "Quantum Profile"));

        let (tag, label) = resolve_label(b3(), &sources, &PersonaNames::empty(), "   ");
        assert_eq!((tag, label.as_str()), (LabelSource::Default, DEFAULT_PERSONA_LABEL));
    }

    #[test]
    fn record_serializes_with_camel_case_summary() {
        let record = resolve_content(
            b3(),
            &ContentSources::new().with_override(OverrideRow::default()),
            &PersonaNames::builtin(),
            DEFAULT_PERSONA_LABEL,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["personaCode"], "B3");
        assert_eq!(json["provenance"]["tableUsed"], true);
        assert_eq!(json["provenance"]["usedFallback"], true);
        assert_eq!(json["fieldProvenance"]["decision_style"], "default");
    }
}
