//! The two fixed scoring axes and their categories.
//!
//! Two axes, nine categories, defined once per deployment:
//!
//! - **Personality** ("frequency"): Spark, Flow, Form, Field, lettered A–D
//! - **Mindset**: Origin, Momentum, Vector, Orbit, Quantum, levels 1–5
//!
//! Declaration order is significant. It is the tie-break order for the
//! classifier and the remainder order for the normalizer, so variants must
//! never be reordered. The derived `Ord` follows declaration order.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

// =============================================================================
// Axis
// =============================================================================

/// One of the two independent scoring axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Personality,
    Mindset,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personality => write!(f, "personality"),
            Self::Mindset => write!(f, "mindset"),
        }
    }
}

/// A category on one axis.
///
/// The scoring stages are generic over this trait so the same ranking and
/// normalization rules apply to both the 4-valued and the 5-valued axis.
pub trait Category:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + Serialize
    + for<'de> Deserialize<'de>
    + Send
    + Sync
    + 'static
{
    /// Axis this category set belongs to.
    const AXIS: Axis;
    /// Every category, in declaration order.
    const ALL: &'static [Self];

    /// Upper-case name used by legacy combined identifiers.
    fn name(self) -> &'static str;

    /// Human-readable name.
    fn display_name(self) -> &'static str;

    /// Look up a category by legacy name (case-insensitive, trimmed).
    fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim();
        if needle.is_empty() {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(needle))
    }
}

// =============================================================================
// Personality (4 categories)
// =============================================================================

/// Behavioral/energetic style. Letters are assigned once and never reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Spark,
    Flow,
    Form,
    Field,
}

impl Personality {
    /// Single-letter code used in persona codes.
    pub fn letter(self) -> char {
        match self {
            Self::Spark => 'A',
            Self::Flow => 'B',
            Self::Form => 'C',
            Self::Field => 'D',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::Spark),
            'B' => Some(Self::Flow),
            'C' => Some(Self::Form),
            'D' => Some(Self::Field),
            _ => None,
        }
    }
}

impl Category for Personality {
    const AXIS: Axis = Axis::Personality;
    const ALL: &'static [Self] = &[Self::Spark, Self::Flow, Self::Form, Self::Field];

    fn name(self) -> &'static str {
        match self {
            Self::Spark => "SPARK",
            Self::Flow => "FLOW",
            Self::Form => "FORM",
            Self::Field => "FIELD",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Spark => "Spark",
            Self::Flow => "Flow",
            Self::Form => "Form",
            Self::Field => "Field",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// =============================================================================
// Mindset (5 levels)
// =============================================================================

/// Developmental stage, ordered by increasing maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mindset {
    Origin,
    Momentum,
    Vector,
    Orbit,
    Quantum,
}

impl Mindset {
    /// Maturity rank, 1 through 5.
    pub fn level(self) -> u8 {
        match self {
            Self::Origin => 1,
            Self::Momentum => 2,
            Self::Vector => 3,
            Self::Orbit => 4,
            Self::Quantum => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Origin),
            2 => Some(Self::Momentum),
            3 => Some(Self::Vector),
            4 => Some(Self::Orbit),
            5 => Some(Self::Quantum),
            _ => None,
        }
    }
}

impl Category for Mindset {
    const AXIS: Axis = Axis::Mindset;
    const ALL: &'static [Self] = &[
        Self::Origin,
        Self::Momentum,
        Self::Vector,
        Self::Orbit,
        Self::Quantum,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Origin => "ORIGIN",
            Self::Momentum => "MOMENTUM",
            Self::Vector => "VECTOR",
            Self::Orbit => "ORBIT",
            Self::Quantum => "QUANTUM",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Origin => "Origin",
            Self::Momentum => "Momentum",
            Self::Vector => "Vector",
            Self::Orbit => "Orbit",
            Self::Quantum => "Quantum",
        }
    }
}

impl fmt::Display for Mindset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
