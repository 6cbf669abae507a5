// ABOUTME: Repository abstraction for the recipe corpus and user activity
// ABOUTME: One async contract implemented by the in-memory and SQLite backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Repository contract
//!
//! Every storage backend implements [`RecipeRepository`]; the service layer
//! only ever sees this trait (usually through the
//! [`factory::Repository`](factory::Repository) wrapper). The two backends
//! must be observably identical for identical inputs - the integration suite
//! runs each contract test against both.
//!
//! Conventions shared by all implementations:
//!
//! - Lookup misses return `Ok(None)`, never an error.
//! - Every `add_*` is idempotent on the entity's identity: re-adding merges
//!   or is a no-op, never a duplicate.
//! - Listing operations (`get_recipes`, `get_all_recipes`) leave each
//!   recipe's `reviews` empty; `get_recipe_by_id` populates them.
//! - Name ordering is ASCII-case-insensitive with an id-ascending tiebreak.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{
    Author, Category, Favourite, NewFavourite, NewReview, Nutrition, Recipe, RecipeSort, Review,
    User,
};

pub mod factory;
pub mod memory;
pub mod sqlite;

/// Default page size for paged recipe listings when the caller passes an
/// invalid (zero) size
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Core storage abstraction for recipes, users, reviews and favourites.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    // ================================
    // Users
    // ================================

    /// Add a user, or update the stored password hash if the username is
    /// already taken
    async fn add_user(&self, user: &User) -> Result<()>;

    /// Get a user by username with reviews and favourites populated
    async fn get_user(&self, username: &str) -> Result<Option<User>>;

    // ================================
    // Recipes
    // ================================

    /// Add or replace a recipe. The recipe's author and category are
    /// registered as well if they have not been seen before (first write
    /// wins), so insertion order does not matter.
    async fn add_recipe(&self, recipe: &Recipe) -> Result<()>;

    /// Get a recipe by id with its reviews populated
    async fn get_recipe_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>>;

    /// Get one page of recipes. Invalid inputs are normalized: page 0
    /// becomes 1 and page size 0 becomes [`DEFAULT_PAGE_SIZE`].
    async fn get_recipes(&self, page: u32, page_size: u32, sort: RecipeSort)
        -> Result<Vec<Recipe>>;

    /// Get the complete corpus in no particular order
    async fn get_all_recipes(&self) -> Result<Vec<Recipe>>;

    /// All authors keyed by id
    async fn get_authors(&self) -> Result<HashMap<i64, Author>>;

    /// All categories keyed by name
    async fn get_categories(&self) -> Result<HashMap<String, Category>>;

    /// Add an author; an existing id is updated in place
    async fn add_author(&self, author: &Author) -> Result<()>;

    /// Add a category; an existing name is updated in place
    async fn add_category(&self, category: &Category) -> Result<()>;

    // ================================
    // Nutrition
    // ================================

    /// Add a nutrition record; an existing recipe id is updated in place
    async fn add_nutrition(&self, nutrition: &Nutrition) -> Result<()>;

    /// Nutrition facts for one recipe
    async fn get_nutrition_by_recipe_id(&self, recipe_id: i64) -> Result<Option<Nutrition>>;

    /// Recipes rated at least `min_stars`, unscored recipes excluded
    async fn get_healthy_recipes(&self, min_stars: f64) -> Result<Vec<Recipe>>;

    /// Corpus ordered by health stars, unscored recipes last
    async fn get_recipes_sorted_by_nutrition(&self, descending: bool) -> Result<Vec<Recipe>>;

    // ================================
    // Reviews
    // ================================

    /// Store a review, assign its id and recompute the recipe's aggregate
    /// rating as the running average over all of its reviews
    async fn add_review(&self, review: &NewReview) -> Result<Review>;

    /// Remove a review by id and recompute the recipe's aggregate rating;
    /// removing an unknown id is a no-op
    async fn remove_review(&self, review_id: i64) -> Result<()>;

    // ================================
    // Favourites
    // ================================

    /// Store a favourite. At most one exists per (username, recipe id); the
    /// existing favourite is returned if the pair is already bookmarked.
    async fn add_favorite_recipe(&self, favourite: &NewFavourite) -> Result<Favourite>;

    /// Remove a favourite by its natural key; unknown pairs are a no-op
    async fn remove_favorite_recipe(&self, username: &str, recipe_id: i64) -> Result<()>;

    /// All favourites owned by a user; an unknown user has none
    async fn get_user_favorites(&self, username: &str) -> Result<Vec<Favourite>>;
}

/// Normalize page and page size the way every backend must: zero values
/// fall back to the first page and the default size.
#[must_use]
pub fn normalize_paging(page: u32, page_size: u32) -> (u32, u32) {
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    (page, page_size)
}
