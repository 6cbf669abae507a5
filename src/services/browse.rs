// ABOUTME: Browse and home page aggregation over the recipe corpus
// ABOUTME: Name-sorted listing pages with category cover images and star annotations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Browse and home listings
//!
//! The browse view pages through the corpus sorted by name and shows one
//! cover image per category - the first image of the first recipe in that
//! category, or a placeholder when the recipe has no images. The home view
//! is the first handful of recipes in corpus order.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Nutrition, Recipe};
use crate::pagination::Pagination;
use crate::repository::factory::Repository;
use crate::repository::RecipeRepository;
use crate::scoring;

/// Recipes per browse page
pub const BROWSE_PAGE_SIZE: u32 = 12;

/// Number of recipes featured on the home page
pub const HOME_RECIPE_COUNT: usize = 6;

/// Cover image for categories whose first recipe has no images
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

/// One page of the browse listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowsePage {
    /// The recipes on this page, sorted by name
    pub recipes: Vec<Recipe>,
    /// All categories, sorted by name
    pub categories: Vec<Category>,
    /// Cover image URL per category name; categories without recipes have
    /// no entry
    pub category_images: HashMap<String, String>,
    /// Health stars for the whole corpus, keyed by recipe id
    pub health_stars: HashMap<i64, Option<f64>>,
    /// Page metadata
    pub pagination: Pagination,
}

/// The home page selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    /// The first [`HOME_RECIPE_COUNT`] recipes in corpus order
    pub recipes: Vec<Recipe>,
    /// All categories, sorted by name
    pub categories: Vec<Category>,
    /// Health stars for the featured recipes
    pub health_stars: HashMap<i64, Option<f64>>,
}

async fn stars_for(
    repo: &Repository,
    recipes: &[Recipe],
) -> Result<HashMap<i64, Option<f64>>> {
    let mut health_stars = HashMap::with_capacity(recipes.len());
    for recipe in recipes {
        let nutrition: Option<Nutrition> = repo.get_nutrition_by_recipe_id(recipe.id).await?;
        health_stars.insert(recipe.id, scoring::health_stars(nutrition.as_ref()));
    }
    Ok(health_stars)
}

fn sorted_categories(repo_categories: HashMap<String, Category>) -> Vec<Category> {
    let mut categories: Vec<Category> = repo_categories.into_values().collect();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    categories
}

/// Assemble one browse page.
///
/// # Errors
///
/// Returns an error only when the repository fails; any page number is
/// clamped into range.
pub async fn browse(repo: &Repository, page: u32) -> Result<BrowsePage> {
    let all_recipes = repo.get_all_recipes().await?;
    let categories = sorted_categories(repo.get_categories().await?);

    let mut sorted_recipes = all_recipes;
    sorted_recipes.sort_by_cached_key(|recipe| (recipe.name.to_lowercase(), recipe.id));

    let mut category_images = HashMap::new();
    for category in &categories {
        if let Some(first) = sorted_recipes
            .iter()
            .find(|recipe| recipe.category.name == category.name)
        {
            let url = first
                .images
                .first()
                .map_or(PLACEHOLDER_IMAGE, String::as_str);
            category_images.insert(category.name.clone(), url.to_owned());
        }
    }

    let health_stars = stars_for(repo, &sorted_recipes).await?;

    let pagination = Pagination::compute(sorted_recipes.len(), page, BROWSE_PAGE_SIZE);
    let (start, end) = pagination.slice_bounds(sorted_recipes.len(), BROWSE_PAGE_SIZE);
    let recipes = sorted_recipes[start..end].to_vec();

    Ok(BrowsePage {
        recipes,
        categories,
        category_images,
        health_stars,
        pagination,
    })
}

/// Assemble the home page: the first few recipes with their stars.
///
/// # Errors
///
/// Returns an error only when the repository fails.
pub async fn home(repo: &Repository) -> Result<HomePage> {
    let all_recipes = repo.get_all_recipes().await?;
    let recipes: Vec<Recipe> = all_recipes.into_iter().take(HOME_RECIPE_COUNT).collect();
    let categories = sorted_categories(repo.get_categories().await?);
    let health_stars = stars_for(repo, &recipes).await?;

    Ok(HomePage {
        recipes,
        categories,
        health_stars,
    })
}
