#![forbid(unsafe_code)]

//! # persona-matrix
//!
//! Turns assessment answers into a persona on a fixed 4×5 matrix and
//! assembles that persona's narrative content.
//!
//! Answers are summed into per-category point totals on two axes
//! (personality: Spark/Flow/Form/Field; mindset: Origin through Quantum),
//! normalized to percentages, and classified into a primary and secondary
//! category per axis. The two primaries address one cell of the matrix, the
//! persona code (e.g. `B3`). Report content for that code is merged field by
//! field from layered sources, and every field records which layer supplied it.
//!
//! Everything here is synchronous and deterministic: the same submission
//! always yields the same scores, persona and request hash.

pub mod aggregate;
pub mod category;
pub mod classify;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod persona;
pub mod report;

pub use aggregate::{aggregate, AnswerSelection, CategoryTotals, OptionCatalog, ScoringOption};
pub use category::{Axis, Category, Mindset, Personality};
pub use classify::{classify, classify_or_hint, AxisResult};
pub use config::{load_config_from_path, EngineConfig};
pub use content::{
    resolve_content, ContentField, ContentLibrary, ContentProvider, ContentRecord, ContentSources,
    Provenance,
};
pub use engine::{
    Audience, AxisScore, Engine, ReportRequest, Scorecard, StoredAxis, StoredScores, Submission,
};
pub use error::{ConfigError, ResolutionError, SourceError};
pub use normalize::{Distribution, Precision};
pub use persona::{persona_code, PersonaCode, PersonaNames, PersonaResolution};
pub use report::{build_report, render_content_markdown, render_report_markdown, PersonaReport};
