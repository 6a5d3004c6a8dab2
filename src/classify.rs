//! Axis classification: distribution → primary/secondary category.
//!
//! The rule is axis-agnostic. Categories are ranked by percentage, descending,
//! with ties broken by declaration order. The top two ranks become primary and
//! secondary, but only if their percentage is strictly positive.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::ResolutionError;
use crate::normalize::Distribution;

/// Primary and secondary category for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisResult<C> {
    pub primary: Option<C>,
    pub secondary: Option<C>,
}

impl<C> Default for AxisResult<C> {
    fn default() -> Self {
        Self {
            primary: None,
            secondary: None,
        }
    }
}

impl<C: Category> AxisResult<C> {
    /// The primary category, or `UnresolvableAxis` for this axis.
    pub fn require_primary(&self) -> Result<C, ResolutionError> {
        self.primary.ok_or_else(|| ResolutionError::no_signal(C::AXIS))
    }
}

/// Rank `categories` (given in declaration order) by `percentage`.
///
/// NaN is treated as 0.
pub fn rank_over<C: Copy>(categories: &[C], percentage: impl Fn(C) -> f64) -> Vec<(C, f64)> {
    let mut ranked: Vec<(C, f64)> = categories
        .iter()
        .map(|&c| {
            let p = percentage(c);
            (c, if p.is_nan() { 0.0 } else { p })
        })
        .collect();
    // `sort_by` is stable, so equal percentages keep declaration order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
}

/// Rank a distribution over its axis's full category set.
pub fn rank<C: Category>(distribution: &Distribution<C>) -> Vec<(C, f64)> {
    rank_over(C::ALL, |c| distribution.get(c))
}

/// Classify an arbitrary category set.
pub fn classify_over<C: Copy>(categories: &[C], percentage: impl Fn(C) -> f64) -> AxisResult<C> {
    let ranked = rank_over(categories, percentage);
    let pick = |idx: usize| {
        ranked
            .get(idx)
            .filter(|(_, pct)| *pct > 0.0)
            .map(|(c, _)| *c)
    };
    AxisResult {
        primary: pick(0),
        secondary: pick(1),
    }
}

/// Classify a distribution over its axis's full category set.
pub fn classify<C: Category>(distribution: &Distribution<C>) -> AxisResult<C> {
    classify_over(C::ALL, |c| distribution.get(c))
}

/// Classify from live percentages when available, otherwise fall back to a
/// stored primary/secondary pair.
///
/// A supplied distribution always wins, even when it is all zero.
pub fn classify_or_hint<C: Category>(
    distribution: Option<&Distribution<C>>,
    stored: Option<AxisResult<C>>,
) -> AxisResult<C> {
    match distribution {
        Some(dist) => classify(dist),
        None => stored.map(sanitize_hint).unwrap_or_default(),
    }
}

/// A stored secondary without a primary, or equal to it, is dropped.
fn sanitize_hint<C: Category>(hint: AxisResult<C>) -> AxisResult<C> {
    match hint.primary {
        None => AxisResult::default(),
        Some(primary) => AxisResult {
            primary: Some(primary),
            secondary: hint.secondary.filter(|s| *s != primary),
        },
    }
}
