//! The closed set of narrative content fields.

use serde::{Deserialize, Serialize};

/// A named narrative field of a persona report.
///
/// Adding a field means adding a variant here; the resolver iterates
/// [`ContentField::ALL`] and never discovers fields from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentField {
    HowToCommunicate,
    DecisionStyle,
    CoreProblems,
    TrustSignals,
    Motivators,
    Objections,
    Strengths,
    BlindSpots,
    GrowthPath,
    MessagingHooks,
}

impl ContentField {
    pub const ALL: [ContentField; 10] = [
        Self::HowToCommunicate,
        Self::DecisionStyle,
        Self::CoreProblems,
        Self::TrustSignals,
        Self::Motivators,
        Self::Objections,
        Self::Strengths,
        Self::BlindSpots,
        Self::GrowthPath,
        Self::MessagingHooks,
    ];

    /// Column name in override rows and key in insights blobs.
    pub fn key(self) -> &'static str {
        match self {
            Self::HowToCommunicate => "how_to_communicate",
            Self::DecisionStyle => "decision_style",
            Self::CoreProblems => "core_problems",
            Self::TrustSignals => "trust_signals",
            Self::Motivators => "motivators",
            Self::Objections => "objections",
            Self::Strengths => "strengths",
            Self::BlindSpots => "blind_spots",
            Self::GrowthPath => "growth_path",
            Self::MessagingHooks => "messaging_hooks",
        }
    }

    /// Case-insensitive key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(key))
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::HowToCommunicate => "How to Communicate",
            Self::DecisionStyle => "Decision Style",
            Self::CoreProblems => "Core Problems",
            Self::TrustSignals => "Trust Signals",
            Self::Motivators => "Motivators",
            Self::Objections => "Objections",
            Self::Strengths => "Strengths",
            Self::BlindSpots => "Blind Spots",
            Self::GrowthPath => "Growth Path",
            Self::MessagingHooks => "Messaging Hooks",
        }
    }

    /// Placeholder used when no source supplies the field.
    pub fn default_text(self) -> &'static str {
        match self {
            Self::HowToCommunicate => {
                "How to Communicate content has not been authored for this profile yet."
            }
            Self::DecisionStyle => {
                "Decision Style content has not been authored for this profile yet."
            }
            Self::CoreProblems => {
                "Core Problems content has not been authored for this profile yet."
            }
            Self::TrustSignals => {
                "Trust Signals content has not been authored for this profile yet."
            }
            Self::Motivators => "Motivators content has not been authored for this profile yet.",
            Self::Objections => "Objections content has not been authored for this profile yet.",
            Self::Strengths => "Strengths content has not been authored for this profile yet.",
            Self::BlindSpots => "Blind Spots content has not been authored for this profile yet.",
            Self::GrowthPath => "Growth Path content has not been authored for this profile yet.",
            Self::MessagingHooks => {
                "Messaging Hooks content has not been authored for this profile yet."
            }
        }
    }
}
