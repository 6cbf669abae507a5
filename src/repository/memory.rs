// ABOUTME: In-memory repository backend over a single RwLock-guarded state
// ABOUTME: Read-modify-write sequences hold the write guard so invariants stay atomic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! In-memory repository backend
//!
//! All state lives behind one `tokio::sync::RwLock`, so check-then-insert
//! sequences (favourite uniqueness, review append plus rating recompute)
//! are atomic with respect to concurrent callers. Reviews and favourites
//! are stored canonically in their own collections and merged into the
//! owning [`User`]/[`Recipe`] values on read, which keeps "both collections"
//! consistent by construction.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{normalize_paging, RecipeRepository};
use crate::models::{
    Author, Category, Favourite, NewFavourite, NewReview, Nutrition, Recipe, RecipeSort, Review,
    User,
};
use crate::scoring;

struct Inner {
    recipes: Vec<Recipe>,
    authors: HashMap<i64, Author>,
    categories: HashMap<String, Category>,
    nutrition: HashMap<i64, Nutrition>,
    users: HashMap<String, User>,
    reviews: Vec<Review>,
    favourites: Vec<Favourite>,
    next_review_id: i64,
    next_favourite_id: i64,
}

impl Inner {
    fn new() -> Self {
        Self {
            recipes: Vec::new(),
            authors: HashMap::new(),
            categories: HashMap::new(),
            nutrition: HashMap::new(),
            users: HashMap::new(),
            reviews: Vec::new(),
            favourites: Vec::new(),
            next_review_id: 1,
            next_favourite_id: 1,
        }
    }

    /// Recompute a recipe's aggregate rating as the running average of all
    /// reviews currently attached to it.
    fn recompute_rating(&mut self, recipe_id: i64) {
        let ratings: Vec<i32> = self
            .reviews
            .iter()
            .filter(|review| review.recipe_id == recipe_id)
            .map(|review| review.rating)
            .collect();
        if let Some(recipe) = self.recipes.iter_mut().find(|r| r.id == recipe_id) {
            recipe.rating = if ratings.is_empty() {
                None
            } else {
                Some(f64::from(ratings.iter().sum::<i32>()) / ratings.len() as f64)
            };
        }
    }
}

/// In-memory repository backend
#[derive(Clone)]
pub struct MemoryRepository {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::new())),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeRepository for MemoryRepository {
    async fn add_user(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user.username) {
            Some(existing) => existing.password_hash = user.password_hash.clone(),
            None => {
                inner.users.insert(
                    user.username.clone(),
                    User::new(user.username.clone(), user.password_hash.clone()),
                );
            }
        }
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(username).map(|stored| {
            let mut user = stored.clone();
            user.reviews = inner
                .reviews
                .iter()
                .filter(|review| review.username == username)
                .cloned()
                .collect();
            user.favourites = inner
                .favourites
                .iter()
                .filter(|favourite| favourite.username == username)
                .cloned()
                .collect();
            user
        }))
    }

    async fn add_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut inner = self.inner.write().await;

        inner
            .authors
            .entry(recipe.author.id)
            .or_insert_with(|| recipe.author.clone());
        inner
            .categories
            .entry(recipe.category.name.clone())
            .or_insert_with(|| recipe.category.clone());

        // Derived collections are never stored on the recipe itself
        let mut stored = recipe.clone();
        stored.reviews = Vec::new();

        if let Some(existing) = inner.recipes.iter_mut().find(|r| r.id == recipe.id) {
            *existing = stored;
        } else {
            inner.recipes.push(stored);
        }

        if inner.reviews.iter().any(|r| r.recipe_id == recipe.id) {
            inner.recompute_rating(recipe.id);
        }
        Ok(())
    }

    async fn get_recipe_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .iter()
            .find(|recipe| recipe.id == recipe_id)
            .map(|found| {
                let mut recipe = found.clone();
                recipe.reviews = inner
                    .reviews
                    .iter()
                    .filter(|review| review.recipe_id == recipe_id)
                    .cloned()
                    .collect();
                recipe
            }))
    }

    async fn get_recipes(
        &self,
        page: u32,
        page_size: u32,
        sort: RecipeSort,
    ) -> Result<Vec<Recipe>> {
        let (page, page_size) = normalize_paging(page, page_size);
        let inner = self.inner.read().await;

        let mut recipes = inner.recipes.clone();
        match sort {
            RecipeSort::NameAsc => recipes.sort_by(|a, b| {
                a.name
                    .to_ascii_lowercase()
                    .cmp(&b.name.to_ascii_lowercase())
                    .then(a.id.cmp(&b.id))
            }),
            RecipeSort::NameDesc => recipes.sort_by(|a, b| {
                b.name
                    .to_ascii_lowercase()
                    .cmp(&a.name.to_ascii_lowercase())
                    .then(a.id.cmp(&b.id))
            }),
            RecipeSort::IdAsc => recipes.sort_by_key(|recipe| recipe.id),
            RecipeSort::IdDesc => recipes.sort_by_key(|recipe| std::cmp::Reverse(recipe.id)),
        }

        let start = (page as usize - 1) * page_size as usize;
        let end = (start + page_size as usize).min(recipes.len());
        if start >= recipes.len() {
            return Ok(Vec::new());
        }
        Ok(recipes[start..end].to_vec())
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner.recipes.clone())
    }

    async fn get_authors(&self) -> Result<HashMap<i64, Author>> {
        let inner = self.inner.read().await;
        Ok(inner.authors.clone())
    }

    async fn get_categories(&self) -> Result<HashMap<String, Category>> {
        let inner = self.inner.read().await;
        Ok(inner.categories.clone())
    }

    async fn add_author(&self, author: &Author) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.authors.insert(author.id, author.clone());
        Ok(())
    }

    async fn add_category(&self, category: &Category) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.categories.insert(category.name.clone(), category.clone());
        Ok(())
    }

    async fn add_nutrition(&self, nutrition: &Nutrition) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.nutrition.insert(nutrition.recipe_id, nutrition.clone());
        Ok(())
    }

    async fn get_nutrition_by_recipe_id(&self, recipe_id: i64) -> Result<Option<Nutrition>> {
        let inner = self.inner.read().await;
        Ok(inner.nutrition.get(&recipe_id).cloned())
    }

    async fn get_healthy_recipes(&self, min_stars: f64) -> Result<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(scoring::filter_healthy(
            &inner.recipes,
            &inner.nutrition,
            min_stars,
        ))
    }

    async fn get_recipes_sorted_by_nutrition(&self, descending: bool) -> Result<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(scoring::sort_by_health_stars(
            &inner.recipes,
            &inner.nutrition,
            descending,
        ))
    }

    async fn add_review(&self, review: &NewReview) -> Result<Review> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&review.username) {
            return Err(anyhow!("user {} was not found", review.username));
        }
        if !inner.recipes.iter().any(|r| r.id == review.recipe_id) {
            return Err(anyhow!("recipe {} was not found", review.recipe_id));
        }

        let stored = Review {
            id: inner.next_review_id,
            username: review.username.clone(),
            recipe_id: review.recipe_id,
            rating: review.rating,
            body: review.body.clone(),
            created_at: review.created_at,
        };
        inner.next_review_id += 1;
        inner.reviews.push(stored.clone());
        inner.recompute_rating(review.recipe_id);
        Ok(stored)
    }

    async fn remove_review(&self, review_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(position) = inner.reviews.iter().position(|r| r.id == review_id) {
            let removed = inner.reviews.remove(position);
            inner.recompute_rating(removed.recipe_id);
        }
        Ok(())
    }

    async fn add_favorite_recipe(&self, favourite: &NewFavourite) -> Result<Favourite> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner
            .favourites
            .iter()
            .find(|f| f.username == favourite.username && f.recipe_id == favourite.recipe_id)
        {
            return Ok(existing.clone());
        }

        let stored = Favourite {
            id: inner.next_favourite_id,
            username: favourite.username.clone(),
            recipe_id: favourite.recipe_id,
        };
        inner.next_favourite_id += 1;
        inner.favourites.push(stored.clone());
        Ok(stored)
    }

    async fn remove_favorite_recipe(&self, username: &str, recipe_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .favourites
            .retain(|f| !(f.username == username && f.recipe_id == recipe_id));
        Ok(())
    }

    async fn get_user_favorites(&self, username: &str) -> Result<Vec<Favourite>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favourites
            .iter()
            .filter(|favourite| favourite.username == username)
            .cloned()
            .collect())
    }
}
