//! Persona codes: the 4×5 matrix addressed by (personality, mindset).
//!
//! A code is the personality letter followed by the mindset level, so
//! `(Flow, Vector)` is `"B3"`. The mapping is total and injective over the
//! twenty cells. The inverse accepts either a code or a legacy combined
//! identifier such as `"FLOW_VECTOR"`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::{Axis, Category, Mindset, Personality};
use crate::error::ResolutionError;

/// Separator used by legacy combined identifiers unless configured otherwise.
pub const DEFAULT_LEGACY_SEPARATOR: char = '_';

/// One cell of the persona matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonaCode {
    personality: Personality,
    mindset: Mindset,
}

impl PersonaCode {
    pub fn new(personality: Personality, mindset: Mindset) -> Self {
        Self {
            personality,
            mindset,
        }
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn mindset(&self) -> Mindset {
        self.mindset
    }

    /// Every cell, personality-major.
    pub fn all() -> impl Iterator<Item = PersonaCode> {
        Personality::ALL
            .iter()
            .flat_map(|&p| Mindset::ALL.iter().map(move |&m| PersonaCode::new(p, m)))
    }

    /// Default display form, e.g. "Flow Vector".
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.personality.display_name(),
            self.mindset.display_name()
        )
    }
}

impl fmt::Display for PersonaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.personality.letter(), self.mindset.level())
    }
}

impl FromStr for PersonaCode {
    type Err = ResolutionError;

    /// One letter A–D and one digit 1–5, case-insensitive, surrounding
    /// whitespace ignored. Anything else is malformed.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.trim().chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ResolutionError::malformed(raw));
        };
        let personality = Personality::from_letter(letter);
        let mindset = digit
            .to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(Mindset::from_level);
        match (personality, mindset) {
            (Some(p), Some(m)) => Ok(Self::new(p, m)),
            _ => Err(ResolutionError::malformed(raw)),
        }
    }
}

impl TryFrom<String> for PersonaCode {
    type Error = ResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PersonaCode> for String {
    fn from(code: PersonaCode) -> Self {
        code.to_string()
    }
}

/// Forward mapping.
pub fn persona_code(personality: Personality, mindset: Mindset) -> PersonaCode {
    PersonaCode::new(personality, mindset)
}

/// Parse a legacy `PERSONALITY<sep>MINDSET` identifier.
///
/// The split must yield exactly two non-empty parts, and both names must be
/// known. Nothing is guessed.
pub fn parse_legacy(raw: &str, separator: char) -> Result<PersonaCode, ResolutionError> {
    let parts: Vec<&str> = raw.trim().split(separator).map(str::trim).collect();
    let [left, right] = parts.as_slice() else {
        return Err(ResolutionError::malformed(raw));
    };
    if left.is_empty() || right.is_empty() {
        return Err(ResolutionError::malformed(raw));
    }

    let personality = Personality::from_name(left)
        .ok_or_else(|| ResolutionError::unknown_name(Axis::Personality, *left))?;
    let mindset = Mindset::from_name(right)
        .ok_or_else(|| ResolutionError::unknown_name(Axis::Mindset, *right))?;
    Ok(persona_code(personality, mindset))
}

/// Resolve a stored identifier: code format first, then the legacy format.
pub fn resolve_identifier(raw: &str, separator: char) -> Result<PersonaCode, ResolutionError> {
    match raw.parse::<PersonaCode>() {
        Ok(code) => Ok(code),
        Err(_) => parse_legacy(raw, separator),
    }
}

/// Caller-facing shape of a resolved persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaResolution {
    pub persona_code: PersonaCode,
    pub personality_category: Personality,
    pub mindset_level: u8,
}

impl From<PersonaCode> for PersonaResolution {
    fn from(code: PersonaCode) -> Self {
        Self {
            persona_code: code,
            personality_category: code.personality(),
            mindset_level: code.mindset().level(),
        }
    }
}

// ---------------------------------------------------------------------
//  Display names
// ---------------------------------------------------------------------

/// Persona display names, keyed by code.
///
/// Supplied by the caller; [`PersonaNames::builtin`] fills every cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaNames {
    names: BTreeMap<PersonaCode, String>,
}

impl PersonaNames {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let names = PersonaCode::all()
            .map(|code| (code, code.display_name()))
            .collect();
        Self { names }
    }

    pub fn get(&self, code: PersonaCode) -> Option<&str> {
        self.names.get(&code).map(String::as_str)
    }

    pub fn insert(&mut self, code: PersonaCode, name: impl Into<String>) {
        self.names.insert(code, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_across_the_matrix() {
        let codes: HashSet<String> = PersonaCode::all().map(|c| c.to_string()).collect();
        assert_eq!(codes.len(), 20);
    }

    #[test]
    fn code_format_is_letter_then_level() {
        assert_eq!(persona_code(Personality::Flow, Mindset::Vector).to_string(), "B3");
        assert_eq!(persona_code(Personality::Spark, Mindset::Origin).to_string(), "A1");
        assert_eq!(persona_code(Personality::Field, Mindset::Quantum).to_string(), "D5");
    }

    #[test]
    fn parse_accepts_lowercase_and_whitespace() {
        let code: PersonaCode = " c4 ".parse().unwrap();
        assert_eq!(code, persona_code(Personality::Form, Mindset::Orbit));
    }

    #[test]
    fn parse_rejects_out_of_range_and_extra_characters() {
        for raw in ["", "B", "B0", "B6", "E3", "B33", "3B", "B-3", "BB"] {
            let err = raw.parse::<PersonaCode>().unwrap_err();
            assert_eq!(err.code(), "unresolvable_axis", "input {raw:?}");
        }
    }

    #[test]
    fn legacy_identifier_maps_through_name_tables() {
        let code = parse_legacy("FLOW_VECTOR", DEFAULT_LEGACY_SEPARATOR).unwrap();
        assert_eq!(code.to_string(), "B3");
        let code = parse_legacy("  spark _ quantum ", DEFAULT_LEGACY_SEPARATOR).unwrap();
        assert_eq!(code.to_string(), "A5");
    }

    #[test]
    fn legacy_identifier_failures_name_the_axis() {
        let err = parse_legacy("WAVE_VECTOR", '_').unwrap_err();
        assert_eq!(err.axis(), Some(Axis::Personality));
        let err = parse_legacy("FLOW_DRIFT", '_').unwrap_err();
        assert_eq!(err.axis(), Some(Axis::Mindset));
    }

    #[test]
    fn legacy_identifier_requires_two_non_empty_parts() {
        for raw in ["FLOW", "FLOW_", "_VECTOR", "FLOW_VECTOR_ORBIT", "", "__"] {
            let err = parse_legacy(raw, '_').unwrap_err();
            assert!(
                matches!(err, ResolutionError::MalformedIdentifier { .. }),
                "input {raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn resolve_identifier_prefers_code_format() {
        assert_eq!(resolve_identifier("d2", '_').unwrap().to_string(), "D2");
        assert_eq!(
            resolve_identifier("FIELD_MOMENTUM", '_').unwrap().to_string(),
            "D2"
        );
    }

    #[test]
    fn code_serializes_as_string() {
        let code = persona_code(Personality::Flow, Mindset::Vector);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"B3\"");
        let back: PersonaCode = serde_json::from_str("\"b3\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<PersonaCode>("\"Z9\"").is_err());
    }

    #[test]
    fn builtin_names_cover_every_cell() {
        let names = PersonaNames::builtin();
        assert_eq!(names.len(), 20);
        assert_eq!(
            names.get(persona_code(Personality::Flow, Mindset::Vector)),
            Some("Flow Vector")
        );
    }
}
