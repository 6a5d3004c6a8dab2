//! Answer aggregation: selections → per-category point totals.
//!
//! One pass over the submission feeds both axes. An option may carry a
//! personality category, a mindset category, both, or neither (segmentation
//! options); each axis accumulates independently.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::category::{Category, Mindset, Personality};

// ---------------------------------------------------------------------
//  Authored options
// ---------------------------------------------------------------------

/// An answer choice as authored in the test store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOption {
    pub id: String,
    pub question_id: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub personality: Option<Personality>,
    #[serde(default)]
    pub mindset: Option<Mindset>,
}

impl ScoringOption {
    pub fn new(id: impl Into<String>, question_id: impl Into<String>, points: u32) -> Self {
        Self {
            id: id.into(),
            question_id: question_id.into(),
            points,
            personality: None,
            mindset: None,
        }
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = Some(personality);
        self
    }

    pub fn with_mindset(mut self, mindset: Mindset) -> Self {
        self.mindset = Some(mindset);
        self
    }

    /// Segmentation options carry no category and score nothing.
    pub fn is_segmentation(&self) -> bool {
        self.personality.is_none() && self.mindset.is_none()
    }
}

/// Lookup from option id to its authored scoring data.
#[derive(Debug, Clone, Default)]
pub struct OptionCatalog {
    options: HashMap<String, ScoringOption>,
}

impl OptionCatalog {
    pub fn new(options: impl IntoIterator<Item = ScoringOption>) -> Self {
        let options = options
            .into_iter()
            .map(|opt| (opt.id.clone(), opt))
            .collect();
        Self { options }
    }

    pub fn get(&self, option_id: &str) -> Option<&ScoringOption> {
        self.options.get(option_id)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

// ---------------------------------------------------------------------
//  Submissions
// ---------------------------------------------------------------------

/// A choice answer: the option the test-taker selected for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceAnswer {
    pub question_id: String,
    pub selected_option_id: String,
}

/// A free-text answer. Never carries a scoring category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTextAnswer {
    pub question_id: String,
    pub text: String,
}

/// One entry of a submission, in either wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerSelection {
    Choice(ChoiceAnswer),
    FreeText(FreeTextAnswer),
}

impl AnswerSelection {
    pub fn choice(question_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self::Choice(ChoiceAnswer {
            question_id: question_id.into(),
            selected_option_id: option_id.into(),
        })
    }

    pub fn free_text(question_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::FreeText(FreeTextAnswer {
            question_id: question_id.into(),
            text: text.into(),
        })
    }

    pub fn question_id(&self) -> &str {
        match self {
            Self::Choice(c) => &c.question_id,
            Self::FreeText(t) => &t.question_id,
        }
    }
}

// ---------------------------------------------------------------------
//  Totals
// ---------------------------------------------------------------------

/// Point totals for every category on one axis (zero-filled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct CategoryTotals<C: Category> {
    points: BTreeMap<C, u64>,
}

impl<C: Category> Default for CategoryTotals<C> {
    fn default() -> Self {
        Self {
            points: C::ALL.iter().map(|&c| (c, 0)).collect(),
        }
    }
}

impl<C: Category> CategoryTotals<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build totals from explicit values; categories not listed are zero.
    pub fn from_points(points: impl IntoIterator<Item = (C, u64)>) -> Self {
        let mut totals = Self::default();
        for (c, pts) in points {
            totals.add(c, pts);
        }
        totals
    }

    pub fn add(&mut self, category: C, points: u64) {
        *self.points.entry(category).or_insert(0) += points;
    }

    pub fn get(&self, category: C) -> u64 {
        self.points.get(&category).copied().unwrap_or(0)
    }

    pub fn sum(&self) -> u64 {
        self.points.values().sum()
    }

    pub fn is_all_zero(&self) -> bool {
        self.sum() == 0
    }

    /// Categories and totals in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, u64)> + '_ {
        self.points.iter().map(|(&c, &p)| (c, p))
    }
}

/// Why a selection contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The option id is not in the catalog.
    UnknownOption,
    /// The option exists but belongs to a different question.
    QuestionMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSelection {
    pub question_id: String,
    pub option_id: String,
    pub reason: SkipReason,
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    pub personality: CategoryTotals<Personality>,
    pub mindset: CategoryTotals<Mindset>,
    /// Selections that referenced options the catalog could not score.
    pub skipped: Vec<SkippedSelection>,
    pub free_text_ignored: usize,
}

/// Reduce a submission to per-axis totals.
///
/// Unknown options are skipped and recorded, not treated as errors.
pub fn aggregate(selections: &[AnswerSelection], catalog: &OptionCatalog) -> Aggregation {
    let mut out = Aggregation::default();

    for selection in selections {
        let choice = match selection {
            AnswerSelection::Choice(choice) => choice,
            AnswerSelection::FreeText(_) => {
                out.free_text_ignored += 1;
                continue;
            }
        };

        let Some(option) = catalog.get(&choice.selected_option_id) else {
            out.skipped.push(SkippedSelection {
                question_id: choice.question_id.clone(),
                option_id: choice.selected_option_id.clone(),
                reason: SkipReason::UnknownOption,
            });
            continue;
        };

        if option.question_id != choice.question_id {
            out.skipped.push(SkippedSelection {
                question_id: choice.question_id.clone(),
                option_id: choice.selected_option_id.clone(),
                reason: SkipReason::QuestionMismatch,
            });
            continue;
        }

        let points = u64::from(option.points);
        if let Some(p) = option.personality {
            out.personality.add(p, points);
        }
        if let Some(m) = option.mindset {
            out.mindset.add(m, points);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> OptionCatalog {
        OptionCatalog::new(vec![
            ScoringOption::new("q1a", "q1", 40).with_personality(Personality::Spark),
            ScoringOption::new("q1b", "q1", 30)
                .with_personality(Personality::Flow)
                .with_mindset(Mindset::Vector),
            ScoringOption::new("q2a", "q2", 20).with_mindset(Mindset::Orbit),
            ScoringOption::new("seg", "q3", 0),
        ])
    }

    #[test]
    fn dual_axis_option_feeds_both_totals() {
        let agg = aggregate(&[AnswerSelection::choice("q1", "q1b")], &catalog());
        assert_eq!(agg.personality.get(Personality::Flow), 30);
        assert_eq!(agg.mindset.get(Mindset::Vector), 30);
        assert_eq!(agg.personality.sum(), 30);
        assert_eq!(agg.mindset.sum(), 30);
    }

    #[test]
    fn segmentation_and_free_text_contribute_nothing() {
        let agg = aggregate(
            &[
                AnswerSelection::choice("q3", "seg"),
                AnswerSelection::free_text("q4", "I like maps"),
            ],
            &catalog(),
        );
        assert!(agg.personality.is_all_zero());
        assert!(agg.mindset.is_all_zero());
        assert!(agg.skipped.is_empty());
        assert_eq!(agg.free_text_ignored, 1);
        assert!(catalog().get("seg").unwrap().is_segmentation());
    }

    #[test]
    fn unknown_and_mismatched_options_are_skipped() {
        let agg = aggregate(
            &[
                AnswerSelection::choice("q1", "missing"),
                AnswerSelection::choice("q2", "q1a"),
                AnswerSelection::choice("q2", "q2a"),
            ],
            &catalog(),
        );
        assert_eq!(agg.skipped.len(), 2);
        assert_eq!(agg.skipped[0].reason, SkipReason::UnknownOption);
        assert_eq!(agg.skipped[1].reason, SkipReason::QuestionMismatch);
        assert_eq!(agg.mindset.get(Mindset::Orbit), 20);
        assert!(agg.personality.is_all_zero());
    }

    #[test]
    fn totals_are_zero_filled_in_declaration_order() {
        let totals: CategoryTotals<Mindset> = CategoryTotals::new();
        let order: Vec<Mindset> = totals.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Mindset::ALL.to_vec());
    }

    #[test]
    fn selections_deserialize_from_both_wire_shapes() {
        let raw = r#"[
            {"questionId": "q1", "selectedOptionId": "q1a"},
            {"questionId": "q9", "text": "free answer"}
        ]"#;
        let parsed: Vec<AnswerSelection> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed[0], AnswerSelection::choice("q1", "q1a"));
        assert_eq!(parsed[1], AnswerSelection::free_text("q9", "free answer"));
        assert_eq!(parsed[1].question_id(), "q9");
    }
}
