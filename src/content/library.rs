//! Content lookup by persona code.
//!
//! The engine stays storage-agnostic: callers implement [`ContentProvider`]
//! over whatever holds their rows. [`ContentLibrary`] is the in-memory
//! implementation, loadable from a JSON file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::sources::{ContentSource, ContentSources};
use crate::error::SourceError;
use crate::persona::{resolve_identifier, PersonaCode};

/// Supplies the candidate sources for a persona.
///
/// `None` means nothing is configured for the code at all, which callers
/// surface as an unresolvable persona. `Some` with every source absent is a
/// configured persona that will resolve to placeholders.
pub trait ContentProvider {
    fn sources_for(&self, code: PersonaCode) -> Option<ContentSources>;
}

impl<P: ContentProvider + ?Sized> ContentProvider for &P {
    fn sources_for(&self, code: PersonaCode) -> Option<ContentSources> {
        (**self).sources_for(code)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContentLibrary {
    entries: BTreeMap<PersonaCode, ContentSources>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: PersonaCode, sources: ContentSources) {
        self.entries.insert(code, sources);
    }

    pub fn with_entry(mut self, code: PersonaCode, sources: ContentSources) -> Self {
        self.insert(code, sources);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = PersonaCode> + '_ {
        self.entries.keys().copied()
    }

    /// Parse a library document.
    ///
    /// Keys may be persona codes or legacy identifiers joined by
    /// `legacy_separator`; two keys naming the same persona are rejected.
    pub fn from_json_str(raw: &str, legacy_separator: char) -> Result<Self, SourceError> {
        let doc: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let mut library = Self::new();
        for (key, entry) in doc {
            let code = resolve_identifier(&key, legacy_separator)
                .map_err(|reason| SourceError::InvalidKey {
                    key: key.clone(),
                    reason,
                })?;
            // An entry is either a list of tagged sources or the keyed form.
            let sources = match entry.as_array() {
                Some(list) => ContentSources::collect(
                    list.iter()
                        .map(ContentSource::from_value)
                        .collect::<Result<Vec<_>, _>>()?,
                )?,
                None => ContentSources::from_value(&entry)?,
            };
            if library.entries.insert(code, sources).is_some() {
                return Err(SourceError::DuplicateEntry {
                    code: code.to_string(),
                });
            }
        }
        Ok(library)
    }

    pub fn load_from_path(
        path: impl AsRef<Path>,
        legacy_separator: char,
    ) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw, legacy_separator)
    }
}

impl ContentProvider for ContentLibrary {
    fn sources_for(&self, code: PersonaCode) -> Option<ContentSources> {
        self.entries.get(&code).cloned()
    }
}
