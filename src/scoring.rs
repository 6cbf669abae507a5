// ABOUTME: Nutrition-based health-star scoring on a simplified nutrient profile
// ABOUTME: Banded penalties for negative nutrients, bonuses for fiber and protein
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Health-Star Scorer
//!
//! Computes a 0.5-5.0 star rating from a recipe's nutrition record, modeled
//! after simplified nutrient-profiling schemes. Thresholds are per 100g/ml
//! and inclusive on the upper bound of each band.
//!
//! Baseline penalty (0-3 points each): saturated fat, sugar, sodium.
//! Modifying bonus (0-2 points each): fiber, protein.
//!
//! `score = 5 - penalties + bonuses`, rounded to the nearest half star and
//! clamped to [0.5, 5.0]. A nutrient that is absent or zero contributes
//! nothing; a record with no usable nutrients scores the full 5.0.

use std::collections::HashMap;

use crate::models::{Nutrition, Recipe};

/// Lowest representable star rating
pub const MIN_STARS: f64 = 0.5;

/// Highest representable star rating
pub const MAX_STARS: f64 = 5.0;

/// Default threshold for "healthy" recipe selection
pub const HEALTHY_MIN_STARS: f64 = 3.5;

/// Treat an absent or zero nutrient as not present.
///
/// Inherited behavior: the source data uses both empty fields and literal
/// zeros for "not measured", so both are suppressed here. Nullability is
/// still stored explicitly on [`Nutrition`].
fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn saturated_fat_points(value: Option<f64>) -> u32 {
    match usable(value) {
        None => 0,
        Some(v) if v <= 1.0 => 0,
        Some(v) if v <= 3.0 => 1,
        Some(v) if v <= 5.0 => 2,
        Some(_) => 3,
    }
}

fn sugar_points(value: Option<f64>) -> u32 {
    match usable(value) {
        None => 0,
        Some(v) if v <= 5.0 => 0,
        Some(v) if v <= 10.0 => 1,
        Some(v) if v <= 15.0 => 2,
        Some(_) => 3,
    }
}

fn sodium_points(value: Option<f64>) -> u32 {
    match usable(value) {
        None => 0,
        Some(v) if v <= 120.0 => 0,
        Some(v) if v <= 200.0 => 1,
        Some(v) if v <= 400.0 => 2,
        Some(_) => 3,
    }
}

fn fiber_bonus(value: Option<f64>) -> u32 {
    match usable(value) {
        Some(v) if v >= 8.0 => 2,
        Some(v) if v >= 4.0 => 1,
        _ => 0,
    }
}

fn protein_bonus(value: Option<f64>) -> u32 {
    match usable(value) {
        Some(v) if v >= 10.0 => 2,
        Some(v) if v >= 5.0 => 1,
        _ => 0,
    }
}

/// Compute the health-star rating for a nutrition record.
///
/// Deterministic and total: every record maps to a rating in
/// `{0.5, 1.0, ..., 5.0}`. Rounding happens before clamping, matching the
/// reference behavior; the raw score is always an integer here so the
/// half-star grid comes entirely from the clamp floor.
#[must_use]
pub fn compute_health_stars(nutrition: &Nutrition) -> f64 {
    let baseline = saturated_fat_points(nutrition.saturated_fat)
        + sugar_points(nutrition.sugar)
        + sodium_points(nutrition.sodium);
    let modifying = fiber_bonus(nutrition.fiber) + protein_bonus(nutrition.protein);

    let score = 5.0 - f64::from(baseline) + f64::from(modifying);
    let rounded = (score * 2.0).round() / 2.0;
    rounded.clamp(MIN_STARS, MAX_STARS)
}

/// Null-propagating form: `None` iff there is no nutrition record at all.
#[must_use]
pub fn health_stars(nutrition: Option<&Nutrition>) -> Option<f64> {
    nutrition.map(compute_health_stars)
}

/// Select recipes whose star rating is at least `min_stars`.
///
/// Recipes without a nutrition record have no rating and are excluded.
/// Shared by both repository backends so their notion of "healthy" cannot
/// diverge.
#[must_use]
pub fn filter_healthy(
    recipes: &[Recipe],
    nutrition: &HashMap<i64, Nutrition>,
    min_stars: f64,
) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|recipe| {
            health_stars(nutrition.get(&recipe.id)).is_some_and(|stars| stars >= min_stars)
        })
        .cloned()
        .collect()
}

/// Order recipes by star rating with unscored recipes last, id ascending as
/// the tiebreak. Shared by both repository backends.
#[must_use]
pub fn sort_by_health_stars(
    recipes: &[Recipe],
    nutrition: &HashMap<i64, Nutrition>,
    descending: bool,
) -> Vec<Recipe> {
    let mut scored: Vec<(Option<f64>, Recipe)> = recipes
        .iter()
        .map(|recipe| (health_stars(nutrition.get(&recipe.id)), recipe.clone()))
        .collect();

    scored.sort_by(|(a_stars, a), (b_stars, b)| {
        let ordering = match (a_stars, b_stars) {
            (Some(a_val), Some(b_val)) => {
                let cmp = a_val.total_cmp(b_val);
                if descending {
                    cmp.reverse()
                } else {
                    cmp
                }
            }
            // Unscored recipes go last regardless of direction
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });

    scored.into_iter().map(|(_, recipe)| recipe).collect()
}
