use persona_matrix::content::{OverrideRow, SnapshotRow};
use persona_matrix::{
    render_report_markdown, AnswerSelection, Audience, ContentField, ContentLibrary,
    ContentSources, Engine, EngineConfig, Mindset, OptionCatalog, PersonaNames, PersonaReport,
    Personality, ReportRequest, ResolutionError, ScoringOption, Scorecard, StoredScores,
    Submission,
};

fn catalog() -> OptionCatalog {
    OptionCatalog::new([
        ScoringOption::new("p1", "q1", 30).with_personality(Personality::Flow),
        ScoringOption::new("p2", "q1", 10).with_personality(Personality::Field),
        ScoringOption::new("p3", "q2", 20).with_personality(Personality::Form),
        ScoringOption::new("m1", "q3", 25).with_mindset(Mindset::Vector),
        ScoringOption::new("m2", "q4", 15).with_mindset(Mindset::Momentum),
        ScoringOption::new("seg", "q5", 0),
    ])
}

fn submission(audience: Audience) -> Submission {
    Submission {
        attempt_id: "attempt-42".to_string(),
        test_id: Some("frequency-v2".to_string()),
        audience,
        answers: vec![
            AnswerSelection::choice("q1", "p1"),
            AnswerSelection::choice("q2", "p3"),
            AnswerSelection::choice("q3", "m1"),
            AnswerSelection::choice("q4", "m2"),
            AnswerSelection::choice("q5", "seg"),
            AnswerSelection::free_text("q6", "Anything else?"),
        ],
    }
}

fn library() -> ContentLibrary {
    let code = "B3".parse().unwrap();
    ContentLibrary::new().with_entry(
        code,
        ContentSources::new()
            .with_override(
                OverrideRow::default()
                    .with_label("The Navigator")
                    .with_field(ContentField::Strengths, "Sees the whole route."),
            )
            .with_snapshot(SnapshotRow {
                watch_outs: Some("Can over-plan.".into()),
                ..SnapshotRow::default()
            }),
    )
}

#[test]
fn report_runs_the_whole_pipeline() {
    let engine = Engine::default();
    let request = ReportRequest {
        audience: Audience::Individual,
    };
    let report = engine
        .report(&request, &submission(Audience::Individual), &catalog(), &library())
        .unwrap();

    assert_eq!(report.attempt_id, "attempt-42");
    assert_eq!(report.persona.persona_code.to_string(), "B3");
    assert_eq!(report.scorecard.personality.primary, Some(Personality::Flow));
    assert_eq!(report.scorecard.personality.secondary, Some(Personality::Form));
    assert_eq!(report.scorecard.mindset.secondary, Some(Mindset::Momentum));
    assert_eq!(report.scorecard.free_text_ignored, 1);
    assert_eq!(report.content.persona_label, "The Navigator");
    assert_eq!(
        report.content.field(ContentField::Strengths),
        "Sees the whole route."
    );
    assert_eq!(report.content.field(ContentField::BlindSpots), "Can over-plan.");
    assert!(report.content.provenance.table_used);
    assert!(report.content.provenance.used_fallback);

    let again = engine
        .report(&request, &submission(Audience::Individual), &catalog(), &library())
        .unwrap();
    assert_eq!(report.request_hash, again.request_hash);

    let md = render_report_markdown(&report);
    assert!(md.contains("- Persona: The Navigator (B3)"));
    assert!(md.contains("### Strengths\n\nSees the whole route."));
    assert!(md.contains("- Flow: 60%"));
}

#[test]
fn audience_mismatch_is_rejected_before_scoring() {
    let err = Engine::default()
        .report(
            &ReportRequest {
                audience: Audience::Organization,
            },
            &submission(Audience::Individual),
            &OptionCatalog::default(),
            &ContentLibrary::new(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ResolutionError::WrongAudience {
            requested: "organization".into(),
            declared: "individual".into(),
        }
    );
    assert_eq!(err.code(), "wrong_audience");
}

#[test]
fn missing_library_entry_is_unresolvable_persona() {
    let engine = Engine::default();
    let err = engine
        .report(
            &ReportRequest {
                audience: Audience::Organization,
            },
            &submission(Audience::Organization),
            &catalog(),
            &ContentLibrary::new(),
        )
        .unwrap_err();
    assert_eq!(err, ResolutionError::UnresolvablePersona { code: "B3".into() });
}

#[test]
fn unanswered_axis_surfaces_before_content_lookup() {
    let mut sub = submission(Audience::Individual);
    sub.answers.retain(|a| !matches!(a.question_id(), "q3" | "q4"));
    let err = Engine::default()
        .report(
            &ReportRequest {
                audience: Audience::Individual,
            },
            &sub,
            &catalog(),
            &library(),
        )
        .unwrap_err();
    assert_eq!(err.code(), "unresolvable_axis");
    assert_eq!(err.axis(), Some(persona_matrix::Axis::Mindset));
}

#[test]
fn stored_scores_reclassify_and_fall_back_to_hints() {
    let stored: StoredScores = serde_json::from_value(serde_json::json!({
        "personality": {
            "percentages": { "spark": 10.0, "flow": 45.0, "form": 45.0, "field": 0.0 },
            "primary": "form"
        },
        "mindset": {
            "percentages": { "origin": 0.0, "momentum": 0.0 },
            "primary": "vector"
        }
    }))
    .unwrap();
    let engine = Engine::default();
    let card = engine.score_stored(&stored);

    // Tie between Flow and Form goes to the earlier category, not the stored hint.
    assert_eq!(card.personality.primary, Some(Personality::Flow));
    assert_eq!(card.personality.secondary, Some(Personality::Form));
    // All-zero live percentages beat the stored primary.
    assert_eq!(card.mindset.primary, None);
    assert!(engine.resolve_persona(&card).is_err());

    let hinted: StoredScores = serde_json::from_value(serde_json::json!({
        "personality": { "primary": "field", "secondary": "spark" },
        "mindset": { "primary": "quantum" }
    }))
    .unwrap();
    let card = engine.score_stored(&hinted);
    assert_eq!(
        engine.resolve_persona(&card).unwrap().persona_code.to_string(),
        "D5"
    );
}

#[test]
fn configured_names_and_label_flow_into_content() {
    let engine = Engine::new(EngineConfig {
        persona_names: [("B3".to_string(), "Wayfinder".to_string())].into_iter().collect(),
        ..EngineConfig::default()
    })
    .unwrap();
    let code = "B3".parse().unwrap();
    let library = ContentLibrary::new().with_entry(code, ContentSources::new());
    let record = engine.content_for(code, &library).unwrap();
    assert_eq!(record.persona_label, "Wayfinder");

    let engine = Engine::new(EngineConfig {
        default_persona_label: "Unnamed Persona".to_string(),
        ..EngineConfig::default()
    })
    .unwrap()
    .with_names(PersonaNames::empty());
    let record = engine.content_for(code, &library).unwrap();
    assert_eq!(record.persona_label, "Unnamed Persona");
}

#[test]
fn scorecard_and_report_read_back_from_json() {
    let engine = Engine::default();
    let card = engine.score(&submission(Audience::Individual).answers, &catalog());
    let json = serde_json::to_string(&card).unwrap();
    let back: Scorecard = serde_json::from_str(&json).unwrap();
    assert_eq!(back, card);

    let report = engine
        .report(
            &ReportRequest {
                audience: Audience::Individual,
            },
            &submission(Audience::Individual),
            &catalog(),
            &library(),
        )
        .unwrap();
    let back: PersonaReport =
        serde_json::from_value(serde_json::to_value(&report).unwrap()).unwrap();
    assert_eq!(back, report);
}
