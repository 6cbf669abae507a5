// ABOUTME: Recipe detail aggregation - nutrition, stars, reviews, favourite status
// ABOUTME: A missing recipe is a recoverable None, never an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Recipe detail view

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Nutrition, Recipe};
use crate::repository::factory::Repository;
use crate::repository::RecipeRepository;
use crate::scoring;

/// Everything the detail view needs for one recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// The recipe with its reviews populated
    pub recipe: Recipe,
    /// Nutrition facts, when a record exists
    pub nutrition: Option<Nutrition>,
    /// Health stars, `None` without nutrition data
    pub health_stars: Option<f64>,
    /// Whether the requesting user has bookmarked this recipe; `false`
    /// for anonymous requests
    pub is_favorited: bool,
}

/// Fetch the detail view for a recipe.
///
/// `username` is the already-authenticated caller, if any; it only affects
/// the favourite flag.
///
/// # Errors
///
/// Returns an error only when the repository fails; an unknown recipe id
/// yields `Ok(None)`.
pub async fn get_recipe_detail(
    repo: &Repository,
    recipe_id: i64,
    username: Option<&str>,
) -> Result<Option<RecipeDetail>> {
    let Some(recipe) = repo.get_recipe_by_id(recipe_id).await? else {
        return Ok(None);
    };

    let nutrition = repo.get_nutrition_by_recipe_id(recipe_id).await?;
    let health_stars = scoring::health_stars(nutrition.as_ref());

    let is_favorited = match username {
        Some(username) => repo
            .get_user_favorites(username)
            .await?
            .iter()
            .any(|favourite| favourite.recipe_id == recipe_id),
        None => false,
    };

    Ok(Some(RecipeDetail {
        recipe,
        nutrition,
        health_stars,
        is_favorited,
    }))
}
