//! Caller-facing pipeline for one submission.
//!
//! Aggregator → Normalizer → Classifier → Mapper → Resolver, with the
//! configured rounding, separator and names. Each call is independent; the
//! engine holds no per-submission state.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, AnswerSelection, CategoryTotals, OptionCatalog};
use crate::category::{Category, Mindset, Personality};
use crate::classify::{classify, classify_or_hint, AxisResult};
use crate::config::EngineConfig;
use crate::content::{resolve_content, ContentProvider, ContentRecord};
use crate::error::{ConfigError, ResolutionError};
use crate::normalize::{Distribution, Precision};
use crate::persona::{persona_code, PersonaCode, PersonaNames, PersonaResolution};
use crate::report::{build_report, PersonaReport};

// =============================================================================
// Requests
// =============================================================================

/// Who a report is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Individual,
    Organization,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "organization" | "organisation" => Ok(Self::Organization),
            other => Err(format!(
                "unknown audience '{other}' (expected individual or organization)"
            )),
        }
    }
}

/// One test attempt's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub attempt_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    pub audience: Audience,
    pub answers: Vec<AnswerSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub audience: Audience,
}

/// Previously persisted scores for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StoredAxis<C: Category> {
    #[serde(default)]
    pub percentages: Option<BTreeMap<C, f64>>,
    #[serde(default)]
    pub primary: Option<C>,
    #[serde(default)]
    pub secondary: Option<C>,
}

impl<C: Category> Default for StoredAxis<C> {
    fn default() -> Self {
        Self {
            percentages: None,
            primary: None,
            secondary: None,
        }
    }
}

impl<C: Category> StoredAxis<C> {
    fn hint(&self) -> Option<AxisResult<C>> {
        if self.primary.is_none() && self.secondary.is_none() {
            return None;
        }
        Some(AxisResult {
            primary: self.primary,
            secondary: self.secondary,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredScores {
    #[serde(default)]
    pub personality: StoredAxis<Personality>,
    #[serde(default)]
    pub mindset: StoredAxis<Mindset>,
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AxisScore<C: Category> {
    /// Absent when rebuilt from stored percentages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<CategoryTotals<C>>,
    pub percentages: Distribution<C>,
    pub primary: Option<C>,
    pub secondary: Option<C>,
}

impl<C: Category> AxisScore<C> {
    fn new(
        totals: Option<CategoryTotals<C>>,
        percentages: Distribution<C>,
        result: AxisResult<C>,
    ) -> Self {
        Self {
            totals,
            percentages,
            primary: result.primary,
            secondary: result.secondary,
        }
    }

    pub fn result(&self) -> AxisResult<C> {
        AxisResult {
            primary: self.primary,
            secondary: self.secondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub personality: AxisScore<Personality>,
    pub mindset: AxisScore<Mindset>,
    pub skipped_selections: usize,
    pub free_text_ignored: usize,
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    names: PersonaNames,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            names: PersonaNames::builtin(),
        }
    }
}

impl Engine {
    /// Validate `config` and apply its name overrides.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let names = config.names()?;
        Ok(Self { config, names })
    }

    /// Replace the display name table wholesale.
    pub fn with_names(mut self, names: PersonaNames) -> Self {
        self.names = names;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn names(&self) -> &PersonaNames {
        &self.names
    }

    /// Score a live answer set.
    pub fn score(&self, answers: &[AnswerSelection], catalog: &OptionCatalog) -> Scorecard {
        let agg = aggregate(answers, catalog);
        for skip in &agg.skipped {
            debug!(
                question_id = %skip.question_id,
                option_id = %skip.option_id,
                reason = ?skip.reason,
                "skipped selection"
            );
        }

        // Rounded values are for display only; ranking uses exact shares.
        let precision = self.config.precision;
        let personality_pct = Distribution::from_totals(&agg.personality, precision);
        let mindset_pct = Distribution::from_totals(&agg.mindset, precision);
        let personality_exact = Distribution::from_totals(&agg.personality, Precision::Exact);
        let mindset_exact = Distribution::from_totals(&agg.mindset, Precision::Exact);
        let personality = classify(&personality_exact);
        let mindset = classify(&mindset_exact);

        Scorecard {
            personality: AxisScore::new(Some(agg.personality), personality_pct, personality),
            mindset: AxisScore::new(Some(agg.mindset), mindset_pct, mindset),
            skipped_selections: agg.skipped.len(),
            free_text_ignored: agg.free_text_ignored,
        }
    }

    /// Rebuild a scorecard from persisted values.
    ///
    /// Stored percentages are re-classified; stored primary/secondary are
    /// only used for an axis with no percentages at all.
    pub fn score_stored(&self, stored: &StoredScores) -> Scorecard {
        Scorecard {
            personality: self.stored_axis(&stored.personality),
            mindset: self.stored_axis(&stored.mindset),
            skipped_selections: 0,
            free_text_ignored: 0,
        }
    }

    fn stored_axis<C: Category>(&self, stored: &StoredAxis<C>) -> AxisScore<C> {
        let threshold = self.config.fraction_threshold;
        match &stored.percentages {
            Some(values) => {
                let dist = Distribution::from_stored(values, threshold);
                let result = classify_or_hint(Some(&dist), stored.hint());
                AxisScore::new(None, dist, result)
            }
            None => {
                let result = classify_or_hint(None, stored.hint());
                if result.primary.is_some() {
                    let axis = C::AXIS;
                    debug!(%axis, "using stored primary/secondary");
                }
                AxisScore::new(None, Distribution::zero(), result)
            }
        }
    }

    /// Map a scorecard to its persona code.
    pub fn resolve_persona(
        &self,
        scorecard: &Scorecard,
    ) -> Result<PersonaResolution, ResolutionError> {
        let personality = scorecard.personality.result().require_primary()?;
        let mindset = scorecard.mindset.result().require_primary()?;
        let code = persona_code(personality, mindset);
        info!(persona = %code, "resolved persona");
        Ok(PersonaResolution::from(code))
    }

    /// Parse a stored code or legacy identifier with the configured separator.
    pub fn resolve_identifier(&self, raw: &str) -> Result<PersonaResolution, ResolutionError> {
        crate::persona::resolve_identifier(raw, self.config.legacy_separator)
            .map(PersonaResolution::from)
    }

    pub fn content_for<P: ContentProvider + ?Sized>(
        &self,
        code: PersonaCode,
        provider: &P,
    ) -> Result<ContentRecord, ResolutionError> {
        let Some(sources) = provider.sources_for(code) else {
            warn!(persona = %code, "no content configured");
            return Err(ResolutionError::UnresolvablePersona {
                code: code.to_string(),
            });
        };
        let record = resolve_content(
            code,
            &sources,
            &self.names,
            &self.config.default_persona_label,
        );
        if record.provenance.used_fallback {
            warn!(
                persona = %code,
                fallback_fields = record.fallback_fields().len(),
                "content fell back to snapshot or placeholders"
            );
        }
        Ok(record)
    }

    /// Score, resolve and assemble the full report for one submission.
    pub fn report<P: ContentProvider + ?Sized>(
        &self,
        request: &ReportRequest,
        submission: &Submission,
        catalog: &OptionCatalog,
        provider: &P,
    ) -> Result<PersonaReport, ResolutionError> {
        if request.audience != submission.audience {
            return Err(ResolutionError::WrongAudience {
                requested: request.audience.to_string(),
                declared: submission.audience.to_string(),
            });
        }
        let scorecard = self.score(&submission.answers, catalog);
        let persona = self.resolve_persona(&scorecard)?;
        let content = self.content_for(persona.persona_code, provider)?;
        Ok(build_report(submission, scorecard, persona, content))
    }
}
