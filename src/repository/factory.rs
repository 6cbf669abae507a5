// ABOUTME: Repository factory with URL-based backend selection
// ABOUTME: Wraps the in-memory and SQLite backends behind one delegating enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Repository factory
//!
//! Detects the backend from a connection URL and hands out a [`Repository`]
//! that delegates every contract call to the selected implementation.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::memory::MemoryRepository;
use super::sqlite::SqliteRepository;
use super::RecipeRepository;
use crate::models::{
    Author, Category, Favourite, NewFavourite, NewReview, Nutrition, Recipe, RecipeSort, Review,
    User,
};

/// Supported repository backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Volatile in-process storage
    Memory,
    /// SQLite-backed relational storage
    Sqlite,
}

/// Repository instance wrapper that delegates to the selected backend
#[derive(Clone)]
pub enum Repository {
    /// In-memory backend
    Memory(MemoryRepository),
    /// SQLite backend
    Sqlite(SqliteRepository),
}

impl Repository {
    /// Get a descriptive string for the current backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Memory(_) => "Memory (volatile, in-process)",
            Self::Sqlite(_) => "SQLite (embedded relational)",
        }
    }

    /// Get the backend type enum
    #[must_use]
    pub const fn repository_type(&self) -> RepositoryType {
        match self {
            Self::Memory(_) => RepositoryType::Memory,
            Self::Sqlite(_) => RepositoryType::Sqlite,
        }
    }

    /// Create a repository from a connection URL.
    ///
    /// `memory://` selects the in-memory backend; any `sqlite:` URL selects
    /// the SQLite backend (use `sqlite::memory:` for a throwaway database).
    /// The SQLite backend runs its schema migration before it is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported or the SQLite
    /// connection or migration fails.
    pub async fn new(url: &str) -> Result<Self> {
        debug!("Detecting repository backend from URL: {}", url);
        let backend = detect_repository_type(url)?;
        info!("Detected repository backend: {:?}", backend);

        match backend {
            RepositoryType::Memory => Ok(Self::Memory(MemoryRepository::new())),
            RepositoryType::Sqlite => {
                let repository = SqliteRepository::new(url).await?;
                repository.migrate().await?;
                info!("SQLite repository initialized successfully");
                Ok(Self::Sqlite(repository))
            }
        }
    }
}

/// Detect the backend type from a connection URL
///
/// # Errors
///
/// Returns an error for URL schemes no backend supports.
pub fn detect_repository_type(url: &str) -> Result<RepositoryType> {
    if url == "memory" || url.starts_with("memory:") {
        Ok(RepositoryType::Memory)
    } else if url.starts_with("sqlite:") {
        Ok(RepositoryType::Sqlite)
    } else {
        Err(anyhow!(
            "Unsupported repository URL: {url}. Use memory:// or sqlite:..."
        ))
    }
}

#[async_trait]
impl RecipeRepository for Repository {
    async fn add_user(&self, user: &User) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.add_user(user).await,
            Self::Sqlite(repo) => repo.add_user(user).await,
        }
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        match self {
            Self::Memory(repo) => repo.get_user(username).await,
            Self::Sqlite(repo) => repo.get_user(username).await,
        }
    }

    async fn add_recipe(&self, recipe: &Recipe) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.add_recipe(recipe).await,
            Self::Sqlite(repo) => repo.add_recipe(recipe).await,
        }
    }

    async fn get_recipe_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>> {
        match self {
            Self::Memory(repo) => repo.get_recipe_by_id(recipe_id).await,
            Self::Sqlite(repo) => repo.get_recipe_by_id(recipe_id).await,
        }
    }

    async fn get_recipes(
        &self,
        page: u32,
        page_size: u32,
        sort: RecipeSort,
    ) -> Result<Vec<Recipe>> {
        match self {
            Self::Memory(repo) => repo.get_recipes(page, page_size, sort).await,
            Self::Sqlite(repo) => repo.get_recipes(page, page_size, sort).await,
        }
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        match self {
            Self::Memory(repo) => repo.get_all_recipes().await,
            Self::Sqlite(repo) => repo.get_all_recipes().await,
        }
    }

    async fn get_authors(&self) -> Result<HashMap<i64, Author>> {
        match self {
            Self::Memory(repo) => repo.get_authors().await,
            Self::Sqlite(repo) => repo.get_authors().await,
        }
    }

    async fn get_categories(&self) -> Result<HashMap<String, Category>> {
        match self {
            Self::Memory(repo) => repo.get_categories().await,
            Self::Sqlite(repo) => repo.get_categories().await,
        }
    }

    async fn add_author(&self, author: &Author) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.add_author(author).await,
            Self::Sqlite(repo) => repo.add_author(author).await,
        }
    }

    async fn add_category(&self, category: &Category) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.add_category(category).await,
            Self::Sqlite(repo) => repo.add_category(category).await,
        }
    }

    async fn add_nutrition(&self, nutrition: &Nutrition) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.add_nutrition(nutrition).await,
            Self::Sqlite(repo) => repo.add_nutrition(nutrition).await,
        }
    }

    async fn get_nutrition_by_recipe_id(&self, recipe_id: i64) -> Result<Option<Nutrition>> {
        match self {
            Self::Memory(repo) => repo.get_nutrition_by_recipe_id(recipe_id).await,
            Self::Sqlite(repo) => repo.get_nutrition_by_recipe_id(recipe_id).await,
        }
    }

    async fn get_healthy_recipes(&self, min_stars: f64) -> Result<Vec<Recipe>> {
        match self {
            Self::Memory(repo) => repo.get_healthy_recipes(min_stars).await,
            Self::Sqlite(repo) => repo.get_healthy_recipes(min_stars).await,
        }
    }

    async fn get_recipes_sorted_by_nutrition(&self, descending: bool) -> Result<Vec<Recipe>> {
        match self {
            Self::Memory(repo) => repo.get_recipes_sorted_by_nutrition(descending).await,
            Self::Sqlite(repo) => repo.get_recipes_sorted_by_nutrition(descending).await,
        }
    }

    async fn add_review(&self, review: &NewReview) -> Result<Review> {
        match self {
            Self::Memory(repo) => repo.add_review(review).await,
            Self::Sqlite(repo) => repo.add_review(review).await,
        }
    }

    async fn remove_review(&self, review_id: i64) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.remove_review(review_id).await,
            Self::Sqlite(repo) => repo.remove_review(review_id).await,
        }
    }

    async fn add_favorite_recipe(&self, favourite: &NewFavourite) -> Result<Favourite> {
        match self {
            Self::Memory(repo) => repo.add_favorite_recipe(favourite).await,
            Self::Sqlite(repo) => repo.add_favorite_recipe(favourite).await,
        }
    }

    async fn remove_favorite_recipe(&self, username: &str, recipe_id: i64) -> Result<()> {
        match self {
            Self::Memory(repo) => repo.remove_favorite_recipe(username, recipe_id).await,
            Self::Sqlite(repo) => repo.remove_favorite_recipe(username, recipe_id).await,
        }
    }

    async fn get_user_favorites(&self, username: &str) -> Result<Vec<Favourite>> {
        match self {
            Self::Memory(repo) => repo.get_user_favorites(username).await,
            Self::Sqlite(repo) => repo.get_user_favorites(username).await,
        }
    }
}
