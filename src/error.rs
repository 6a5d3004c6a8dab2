//! Error types for persona resolution, content sources and configuration.

use std::fmt;

use thiserror::Error;

use crate::category::Axis;

/// Why an axis could not produce a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisFailure {
    /// Every percentage on the axis is zero.
    NoSignal,
    /// A legacy identifier named a category this axis does not know.
    UnknownName(String),
}

impl fmt::Display for AxisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSignal => write!(f, "no scored answers on this axis"),
            Self::UnknownName(name) => write!(f, "unknown category name '{name}'"),
        }
    }
}

/// Errors returned to callers when a submission cannot be turned into a persona
/// or a persona cannot be turned into content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Percentages are all zero or a legacy name is unknown.
    #[error("unresolvable {axis} axis: {reason}")]
    UnresolvableAxis { axis: Axis, reason: AxisFailure },

    /// Neither a persona code nor a two-part legacy identifier.
    #[error("malformed persona identifier '{raw}'")]
    MalformedIdentifier { raw: String },

    /// The code is valid but nothing is configured for its matrix cell.
    #[error("no content configured for persona {code}")]
    UnresolvablePersona { code: String },

    /// Report requested for a different audience than the submission declared.
    #[error("report requested for {requested} audience but submission declared {declared}")]
    WrongAudience { requested: String, declared: String },
}

impl ResolutionError {
    pub fn no_signal(axis: Axis) -> Self {
        Self::UnresolvableAxis {
            axis,
            reason: AxisFailure::NoSignal,
        }
    }

    pub fn unknown_name(axis: Axis, name: impl Into<String>) -> Self {
        Self::UnresolvableAxis {
            axis,
            reason: AxisFailure::UnknownName(name.into()),
        }
    }

    pub fn malformed(raw: impl Into<String>) -> Self {
        Self::MalformedIdentifier { raw: raw.into() }
    }

    /// Short stable code for logging and branching.
    ///
    /// Malformed identifiers fall under `unresolvable_axis`: the input was bad,
    /// as opposed to `unresolvable_persona`, where configuration is missing.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnresolvableAxis { .. } => "unresolvable_axis",
            Self::MalformedIdentifier { .. } => "unresolvable_axis",
            Self::UnresolvablePersona { .. } => "unresolvable_persona",
            Self::WrongAudience { .. } => "wrong_audience",
        }
    }

    /// The axis that failed, when one can be named.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Self::UnresolvableAxis { axis, .. } => Some(*axis),
            _ => None,
        }
    }
}

/// Errors decoding content source rows.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("insights field '{field}' has unsupported shape: {found}")]
    WrongShape { field: String, found: &'static str },

    #[error("content source must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("duplicate {kind} source")]
    DuplicateSource { kind: &'static str },

    #[error("library key '{key}' is not a persona: {reason}")]
    InvalidKey {
        key: String,
        #[source]
        reason: ResolutionError,
    },

    #[error("library has more than one entry for persona {code}")]
    DuplicateEntry { code: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Name of a JSON value's type, for shape errors.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
