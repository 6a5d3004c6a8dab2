//! Report assembly for a scored submission.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::content::{ContentField, ContentRecord};
use crate::engine::{Audience, AxisScore, Scorecard, Submission};
use crate::persona::PersonaResolution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaReport {
    pub attempt_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    pub audience: Audience,
    /// blake3 of the serialized submission; stable across resubmissions.
    pub request_hash: String,
    pub scorecard: Scorecard,
    pub persona: PersonaResolution,
    pub content: ContentRecord,
}

pub fn build_report(
    submission: &Submission,
    scorecard: Scorecard,
    persona: PersonaResolution,
    content: ContentRecord,
) -> PersonaReport {
    PersonaReport {
        attempt_id: submission.attempt_id.clone(),
        test_id: submission.test_id.clone(),
        audience: submission.audience,
        request_hash: hash_submission(submission),
        scorecard,
        persona,
        content,
    }
}

pub fn hash_submission(submission: &Submission) -> String {
    let bytes = serde_json::to_vec(submission).unwrap_or_default();
    blake3::hash(&bytes).to_hex().to_string()
}

/// Markdown for a resolved content record alone.
pub fn render_content_markdown(record: &ContentRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# {} ({})\n",
        record.persona_label, record.persona_code
    ));
    push_fields(&mut out, record, "##");
    out
}

fn push_fields(out: &mut String, record: &ContentRecord, heading: &str) {
    if record.provenance.used_fallback {
        out.push_str("\n> Some sections are not yet authored for this profile.\n");
    }
    for field in ContentField::ALL {
        out.push_str(&format!(
            "\n{} {}\n\n{}\n",
            heading,
            field.title(),
            record.field(field)
        ));
    }
}

pub fn render_report_markdown(report: &PersonaReport) -> String {
    let mut out = String::new();
    out.push_str("# Persona Report\n\n");
    out.push_str(&format!("- Attempt: {}\n", report.attempt_id));
    if let Some(test_id) = &report.test_id {
        out.push_str(&format!("- Test: {}\n", test_id));
    }
    out.push_str(&format!("- Audience: {}\n", report.audience));
    out.push_str(&format!("- Request hash: `{}`\n", report.request_hash));
    out.push_str(&format!(
        "- Persona: {} ({})\n",
        report.content.persona_label, report.persona.persona_code
    ));
    if report.scorecard.skipped_selections > 0 {
        out.push_str(&format!(
            "- Skipped selections: {}\n",
            report.scorecard.skipped_selections
        ));
    }

    out.push_str("\n## Personality\n\n");
    push_axis(&mut out, &report.scorecard.personality);
    out.push_str("\n## Mindset\n\n");
    push_axis(&mut out, &report.scorecard.mindset);

    out.push_str(&format!("\n## {}\n", report.content.persona_label));
    push_fields(&mut out, &report.content, "###");
    out
}

fn push_axis<C: Category>(out: &mut String, axis: &AxisScore<C>) {
    let label = |c: Option<C>| c.map(|c| c.display_name()).unwrap_or("-");
    out.push_str(&format!(
        "- Primary: {}\n- Secondary: {}\n",
        label(axis.primary),
        label(axis.secondary)
    ));
    for (category, pct) in axis.percentages.iter() {
        out.push_str(&format!("- {}: {}%\n", category.display_name(), pct));
    }
}
