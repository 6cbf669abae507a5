// ABOUTME: Favourite operations - bookmark recipes per user with uniqueness
// ABOUTME: Validates user and recipe existence before touching the repository
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Favourite operations
//!
//! A favourite is a (username, recipe) bookmark; at most one exists per
//! pair, enforced by the repository. Both sides must exist or the operation
//! fails with [`FavouriteError`].

use crate::errors::FavouriteError;
use crate::models::{Favourite, NewFavourite, Recipe};
use crate::repository::factory::Repository;
use crate::repository::RecipeRepository;

async fn ensure_user_and_recipe(
    repo: &Repository,
    username: &str,
    recipe_id: i64,
) -> Result<(), FavouriteError> {
    if repo.get_user(username).await?.is_none() {
        return Err(FavouriteError::UserNotFound(username.to_owned()));
    }
    if repo.get_recipe_by_id(recipe_id).await?.is_none() {
        return Err(FavouriteError::RecipeNotFound(recipe_id));
    }
    Ok(())
}

/// Add a recipe to a user's favourites.
///
/// Adding an already-bookmarked recipe returns the existing favourite.
///
/// # Errors
///
/// Returns [`FavouriteError::UserNotFound`]/[`FavouriteError::RecipeNotFound`]
/// when either side does not exist.
pub async fn add_favorite_recipe(
    repo: &Repository,
    username: &str,
    recipe_id: i64,
) -> Result<Favourite, FavouriteError> {
    ensure_user_and_recipe(repo, username, recipe_id).await?;
    let favourite = NewFavourite {
        username: username.to_owned(),
        recipe_id,
    };
    Ok(repo.add_favorite_recipe(&favourite).await?)
}

/// Remove a recipe from a user's favourites.
///
/// # Errors
///
/// Returns [`FavouriteError::UserNotFound`]/[`FavouriteError::RecipeNotFound`]
/// when either side does not exist.
pub async fn remove_favorite_recipe(
    repo: &Repository,
    username: &str,
    recipe_id: i64,
) -> Result<(), FavouriteError> {
    ensure_user_and_recipe(repo, username, recipe_id).await?;
    repo.remove_favorite_recipe(username, recipe_id).await?;
    Ok(())
}

/// Whether the recipe is already in the user's favourites.
///
/// # Errors
///
/// Returns [`FavouriteError::Storage`] when the backend fails.
pub async fn is_favorited(
    repo: &Repository,
    username: &str,
    recipe_id: i64,
) -> Result<bool, FavouriteError> {
    let favourites = repo.get_user_favorites(username).await?;
    Ok(favourites
        .iter()
        .any(|favourite| favourite.recipe_id == recipe_id))
}

/// Resolve a user's favourites to the bookmarked recipes.
///
/// Favourites pointing at recipes that no longer exist are skipped.
///
/// # Errors
///
/// Returns [`FavouriteError::UserNotFound`] for an unknown user.
pub async fn get_favourite_recipes(
    repo: &Repository,
    username: &str,
) -> Result<Vec<Recipe>, FavouriteError> {
    if repo.get_user(username).await?.is_none() {
        return Err(FavouriteError::UserNotFound(username.to_owned()));
    }
    let mut recipes = Vec::new();
    for favourite in repo.get_user_favorites(username).await? {
        if let Some(recipe) = repo.get_recipe_by_id(favourite.recipe_id).await? {
            recipes.push(recipe);
        }
    }
    Ok(recipes)
}
