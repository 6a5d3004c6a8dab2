//! Percentage normalization: totals → 0–100 distribution per axis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::CategoryTotals;
use crate::category::Category;

/// Stored values whose maximum is at or below this are read as fractions.
pub const DEFAULT_FRACTION_THRESHOLD: f64 = 1.5;

/// How percentages derived from totals are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Nearest integer; the distribution still sums to exactly 100.
    #[default]
    Whole,
    /// One decimal place; sums to exactly 100.0.
    Tenths,
    /// Unrounded `100 * t / sum`, for further computation.
    Exact,
}

impl Precision {
    /// Rounding units per 100 percent, `None` for exact.
    fn units(self) -> Option<u64> {
        match self {
            Self::Whole => Some(100),
            Self::Tenths => Some(1000),
            Self::Exact => None,
        }
    }
}

/// Percentages in [0, 100] for every category on one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Distribution<C: Category> {
    values: BTreeMap<C, f64>,
}

impl<C: Category> Distribution<C> {
    /// All categories at 0.
    pub fn zero() -> Self {
        Self {
            values: C::ALL.iter().map(|&c| (c, 0.0)).collect(),
        }
    }

    /// Normalize point totals. An all-zero axis yields all-zero percentages.
    pub fn from_totals(totals: &CategoryTotals<C>, precision: Precision) -> Self {
        let sum = totals.sum();
        if sum == 0 {
            return Self::zero();
        }

        let Some(units) = precision.units() else {
            let values = C::ALL
                .iter()
                .map(|&c| (c, 100.0 * totals.get(c) as f64 / sum as f64))
                .collect();
            return Self { values };
        };

        // Largest-remainder apportionment in exact integer arithmetic.
        let mut shares: Vec<(C, u64, u64)> = C::ALL
            .iter()
            .map(|&c| {
                let scaled = u128::from(totals.get(c)) * u128::from(units);
                let floor = (scaled / u128::from(sum)) as u64;
                let rem = (scaled % u128::from(sum)) as u64;
                (c, floor, rem)
            })
            .collect();

        let assigned: u64 = shares.iter().map(|(_, floor, _)| floor).sum();
        let mut deficit = units.saturating_sub(assigned);

        let mut order: Vec<usize> = (0..shares.len()).collect();
        // Stable sort keeps declaration order among equal remainders.
        order.sort_by(|&a, &b| shares[b].2.cmp(&shares[a].2));
        for idx in order {
            if deficit == 0 {
                break;
            }
            if shares[idx].2 > 0 {
                shares[idx].1 += 1;
                deficit -= 1;
            }
        }

        let per_percent = (units / 100) as f64;
        let values = shares
            .into_iter()
            .map(|(c, count, _)| (c, count as f64 / per_percent))
            .collect();
        Self { values }
    }

    /// Read a previously persisted distribution.
    ///
    /// If the largest value is at most `fraction_threshold`, the values are taken
    /// as fractions and scaled by 100. Non-finite and negative values count as 0;
    /// categories missing from `stored` are 0. Values above 100 are kept as
    /// stored.
    pub fn from_stored(stored: &BTreeMap<C, f64>, fraction_threshold: f64) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let max = stored.values().copied().map(clean).fold(0.0_f64, f64::max);
        let scale = if max <= fraction_threshold { 100.0 } else { 1.0 };

        let values = C::ALL
            .iter()
            .map(|&c| {
                let v = stored.get(&c).copied().map(clean).unwrap_or(0.0);
                (c, v * scale)
            })
            .collect();
        Self { values }
    }

    pub fn get(&self, category: C) -> f64 {
        self.values.get(&category).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.values.values().sum()
    }

    pub fn is_all_zero(&self) -> bool {
        self.values.values().all(|v| *v == 0.0)
    }

    /// Categories and percentages in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (C, f64)> + '_ {
        self.values.iter().map(|(&c, &v)| (c, v))
    }
}
