//! Engine configuration.
//!
//! Every field has a default, so `{}` is a valid config file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::DEFAULT_PERSONA_LABEL;
use crate::error::ConfigError;
use crate::normalize::{Precision, DEFAULT_FRACTION_THRESHOLD};
use crate::persona::{PersonaCode, PersonaNames, DEFAULT_LEGACY_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rounding applied to percentages computed from totals.
    pub precision: Precision,
    /// Stored percentages whose maximum is at or below this are fractions.
    pub fraction_threshold: f64,
    /// Separator in legacy `PERSONALITY_MINDSET` identifiers.
    pub legacy_separator: char,
    /// Label used when no source or name table supplies one.
    pub default_persona_label: String,
    /// Display name overrides, keyed by persona code.
    pub persona_names: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            fraction_threshold: DEFAULT_FRACTION_THRESHOLD,
            legacy_separator: DEFAULT_LEGACY_SEPARATOR,
            default_persona_label: DEFAULT_PERSONA_LABEL.to_string(),
            persona_names: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fraction_threshold.is_finite() || self.fraction_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fraction_threshold must be finite and > 0 (got {})",
                self.fraction_threshold
            )));
        }
        let sep = self.legacy_separator;
        if sep.is_alphanumeric() || sep == '-' || sep.is_whitespace() {
            return Err(ConfigError::Invalid(format!(
                "legacy_separator {sep:?} would split category names"
            )));
        }
        if self.default_persona_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_persona_label must be non-empty".to_string(),
            ));
        }
        for (key, name) in &self.persona_names {
            key.parse::<PersonaCode>().map_err(|e| {
                ConfigError::Invalid(format!("persona_names key '{key}': {e}"))
            })?;
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "persona_names['{key}'] must be non-empty"
                )));
            }
        }
        Ok(())
    }

    /// Built-in display names with this config's overrides applied.
    pub fn names(&self) -> Result<PersonaNames, ConfigError> {
        let mut names = PersonaNames::builtin();
        for (key, name) in &self.persona_names {
            let code = key.parse::<PersonaCode>().map_err(|e| {
                ConfigError::Invalid(format!("persona_names key '{key}': {e}"))
            })?;
            names.insert(code, name.trim());
        }
        Ok(names)
    }
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<EngineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let config: EngineConfig = serde_json::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}
