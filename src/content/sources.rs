//! Candidate content sources, one type per kind.
//!
//! - **Override**: per-persona row with one column per field.
//! - **Insights**: structured blob keyed by field name.
//! - **Snapshot**: persona-level row sharing a subset of fields under
//!   its own column names.
//!
//! Rows may carry extra columns (ids, timestamps); they are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::fields::ContentField;
use crate::error::{json_kind, SourceError};

// =============================================================================
// Override
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRow {
    #[serde(default)]
    pub persona_label: Option<String>,
    #[serde(default)]
    pub how_to_communicate: Option<String>,
    #[serde(default)]
    pub decision_style: Option<String>,
    #[serde(default)]
    pub core_problems: Option<String>,
    #[serde(default)]
    pub trust_signals: Option<String>,
    #[serde(default)]
    pub motivators: Option<String>,
    #[serde(default)]
    pub objections: Option<String>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub blind_spots: Option<String>,
    #[serde(default)]
    pub growth_path: Option<String>,
    #[serde(default)]
    pub messaging_hooks: Option<String>,
}

impl OverrideRow {
    fn slot(&self, field: ContentField) -> &Option<String> {
        match field {
            ContentField::HowToCommunicate => &self.how_to_communicate,
            ContentField::DecisionStyle => &self.decision_style,
            ContentField::CoreProblems => &self.core_problems,
            ContentField::TrustSignals => &self.trust_signals,
            ContentField::Motivators => &self.motivators,
            ContentField::Objections => &self.objections,
            ContentField::Strengths => &self.strengths,
            ContentField::BlindSpots => &self.blind_spots,
            ContentField::GrowthPath => &self.growth_path,
            ContentField::MessagingHooks => &self.messaging_hooks,
        }
    }

    fn slot_mut(&mut self, field: ContentField) -> &mut Option<String> {
        match field {
            ContentField::HowToCommunicate => &mut self.how_to_communicate,
            ContentField::DecisionStyle => &mut self.decision_style,
            ContentField::CoreProblems => &mut self.core_problems,
            ContentField::TrustSignals => &mut self.trust_signals,
            ContentField::Motivators => &mut self.motivators,
            ContentField::Objections => &mut self.objections,
            ContentField::Strengths => &mut self.strengths,
            ContentField::BlindSpots => &mut self.blind_spots,
            ContentField::GrowthPath => &mut self.growth_path,
            ContentField::MessagingHooks => &mut self.messaging_hooks,
        }
    }

    pub fn field(&self, field: ContentField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn with_field(mut self, field: ContentField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.persona_label = Some(label.into());
        self
    }
}

// =============================================================================
// Snapshot
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(default)]
    pub persona_name: Option<String>,
    #[serde(default)]
    pub communication_style: Option<String>,
    #[serde(default)]
    pub decision_making: Option<String>,
    #[serde(default)]
    pub pain_points: Option<String>,
    #[serde(default)]
    pub trust_builders: Option<String>,
    #[serde(default)]
    pub key_strengths: Option<String>,
    #[serde(default)]
    pub watch_outs: Option<String>,
}

impl SnapshotRow {
    /// The snapshot column backing `field`, if the snapshot has one.
    pub fn field(&self, field: ContentField) -> Option<&str> {
        let column = match field {
            ContentField::HowToCommunicate => &self.communication_style,
            ContentField::DecisionStyle => &self.decision_making,
            ContentField::CoreProblems => &self.pain_points,
            ContentField::TrustSignals => &self.trust_builders,
            ContentField::Strengths => &self.key_strengths,
            ContentField::BlindSpots => &self.watch_outs,
            ContentField::Motivators
            | ContentField::Objections
            | ContentField::GrowthPath
            | ContentField::MessagingHooks => return None,
        };
        column.as_deref()
    }
}

// =============================================================================
// Insights
// =============================================================================

/// Validated insights blob.
///
/// Each known key holds a string, an array of strings (rendered as `- item`
/// lines), or null. Unknown keys are not an error but are recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Insights {
    fields: BTreeMap<ContentField, String>,
    ignored_keys: Vec<String>,
}

impl Insights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: &Value) -> Result<Self, SourceError> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(SourceError::NotAnObject {
                    found: json_kind(other),
                })
            }
        };

        let mut out = Self::default();
        for (key, raw) in map {
            let Some(field) = ContentField::from_key(key) else {
                out.ignored_keys.push(key.clone());
                continue;
            };
            let text = match raw {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                Value::Array(items) => bullet_lines(field, items)?,
                other => {
                    return Err(SourceError::WrongShape {
                        field: field.key().to_string(),
                        found: json_kind(other),
                    })
                }
            };
            out.fields.insert(field, text);
        }
        Ok(out)
    }

    pub fn with_field(mut self, field: ContentField, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    pub fn field(&self, field: ContentField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Keys present in the blob that name no content field.
    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored_keys
    }
}

fn bullet_lines(field: ContentField, items: &[Value]) -> Result<String, SourceError> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) if s.trim().is_empty() => {}
            Value::String(s) => lines.push(format!("- {}", s.trim())),
            other => {
                return Err(SourceError::WrongShape {
                    field: field.key().to_string(),
                    found: json_kind(other),
                })
            }
        }
    }
    Ok(lines.join("\n"))
}

impl Serialize for Insights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Insights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Insights::from_value(&value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Source set
// =============================================================================

/// One candidate source, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentSource {
    Override(OverrideRow),
    Insights { fields: Insights },
    Snapshot(SnapshotRow),
}

impl ContentSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::Insights { .. } => "insights",
            Self::Snapshot(_) => "snapshot",
        }
    }

    /// Decode one tagged source, keeping insights shape errors intact.
    pub fn from_value(value: &Value) -> Result<Self, SourceError> {
        if value.get("kind").and_then(Value::as_str) == Some("insights") {
            let fields = Insights::from_value(value.get("fields").unwrap_or(&Value::Null))?;
            return Ok(Self::Insights { fields });
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// Up to one source of each kind for a single persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSources {
    #[serde(default, rename = "override")]
    pub override_row: Option<OverrideRow>,
    #[serde(default)]
    pub insights: Option<Insights>,
    #[serde(default)]
    pub snapshot: Option<SnapshotRow>,
}

impl ContentSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, row: OverrideRow) -> Self {
        self.override_row = Some(row);
        self
    }

    pub fn with_insights(mut self, insights: Insights) -> Self {
        self.insights = Some(insights);
        self
    }

    pub fn with_snapshot(mut self, row: SnapshotRow) -> Self {
        self.snapshot = Some(row);
        self
    }

    /// Decode the keyed form: `{"override": .., "insights": .., "snapshot": ..}`.
    ///
    /// Absent and null keys are `None`; other keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, SourceError> {
        let map = value.as_object().ok_or_else(|| SourceError::NotAnObject {
            found: json_kind(value),
        })?;
        let present = |key: &str| map.get(key).filter(|v| !v.is_null());

        let mut out = Self::default();
        if let Some(row) = present("override") {
            out.override_row = Some(serde_json::from_value(row.clone())?);
        }
        if let Some(blob) = present("insights") {
            out.insights = Some(Insights::from_value(blob)?);
        }
        if let Some(row) = present("snapshot") {
            out.snapshot = Some(serde_json::from_value(row.clone())?);
        }
        Ok(out)
    }

    /// Gather tagged sources; two sources of the same kind is an error.
    pub fn collect(
        sources: impl IntoIterator<Item = ContentSource>,
    ) -> Result<Self, SourceError> {
        let mut out = Self::default();
        for source in sources {
            let kind = source.kind();
            let duplicate = match source {
                ContentSource::Override(row) => out.override_row.replace(row).is_some(),
                ContentSource::Insights { fields } => out.insights.replace(fields).is_some(),
                ContentSource::Snapshot(row) => out.snapshot.replace(row).is_some(),
            };
            if duplicate {
                return Err(SourceError::DuplicateSource { kind });
            }
        }
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.override_row.is_none() && self.insights.is_none() && self.snapshot.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insights_accept_strings_arrays_and_null() {
        let insights = Insights::from_value(&json!({
            "how_to_communicate": "Lead with the headline.",
            "strengths": ["Pattern spotting", "  ", "Calm under load"],
            "objections": null,
            "tone": "ignored"
        }))
        .unwrap();

        assert_eq!(
            insights.field(ContentField::HowToCommunicate),
            Some("Lead with the headline.")
        );
        assert_eq!(
            insights.field(ContentField::Strengths),
            Some("- Pattern spotting\n- Calm under load")
        );
        assert_eq!(insights.field(ContentField::Objections), None);
        assert_eq!(insights.ignored_keys(), ["tone".to_string()]);
    }

    #[test]
    fn insights_reject_wrong_shapes() {
        let err = Insights::from_value(&json!({ "motivators": 42 })).unwrap_err();
        assert!(matches!(
            err,
            SourceError::WrongShape { ref field, found: "number" } if field == "motivators"
        ));

        let err = Insights::from_value(&json!({ "motivators": ["ok", {"x": 1}] })).unwrap_err();
        assert!(matches!(err, SourceError::WrongShape { found: "object", .. }));

        let err = Insights::from_value(&json!(["not", "a", "map"])).unwrap_err();
        assert!(matches!(err, SourceError::NotAnObject { found: "array" }));
    }

    #[test]
    fn snapshot_maps_its_own_column_names() {
        let row: SnapshotRow = serde_json::from_value(json!({
            "id": 7,
            "persona_name": "The Navigator",
            "pain_points": "Too many open loops.",
            "watch_outs": "Over-commits."
        }))
        .unwrap();
        assert_eq!(row.field(ContentField::CoreProblems), Some("Too many open loops."));
        assert_eq!(row.field(ContentField::BlindSpots), Some("Over-commits."));
        assert_eq!(row.field(ContentField::GrowthPath), None);
    }

    #[test]
    fn tagged_sources_collect_once_per_kind() {
        let raw = json!([
            { "kind": "override", "decision_style": "Fast." },
            { "kind": "insights", "fields": { "motivators": "Momentum." } },
            { "kind": "snapshot", "persona_name": "Flow Vector" }
        ]);
        let tagged: Vec<ContentSource> = serde_json::from_value(raw).unwrap();
        let sources = ContentSources::collect(tagged).unwrap();
        assert_eq!(
            sources.override_row.as_ref().and_then(|r| r.field(ContentField::DecisionStyle)),
            Some("Fast.")
        );
        assert_eq!(
            sources.insights.as_ref().and_then(|i| i.field(ContentField::Motivators)),
            Some("Momentum.")
        );
        assert!(sources.snapshot.is_some());

        let dup = ContentSources::collect(vec![
            ContentSource::Snapshot(SnapshotRow::default()),
            ContentSource::Snapshot(SnapshotRow::default()),
        ])
        .unwrap_err();
        assert!(matches!(dup, SourceError::DuplicateSource { kind: "snapshot" }));
    }

    #[test]
    fn bad_insights_fail_source_decoding() {
        let raw = json!({ "insights": { "growth_path": true } });
        assert!(serde_json::from_value::<ContentSources>(raw).is_err());
    }
}
