// ABOUTME: Review operations with existence and ownership validation
// ABOUTME: Aggregate recipe rating is recomputed by the repository on every change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Review operations
//!
//! Domain rules live here, storage lives in the repository: a review may
//! only be written against an existing user and recipe, and only its owner
//! may remove it. Violations surface as [`ReviewError`] for the calling
//! layer to translate.

use chrono::{DateTime, Utc};

use crate::errors::ReviewError;
use crate::models::{NewReview, Review};
use crate::repository::factory::Repository;
use crate::repository::RecipeRepository;

/// Add a review and rating to a recipe.
///
/// # Errors
///
/// Returns [`ReviewError::InvalidRating`] for a rating outside [1, 5],
/// [`ReviewError::RecipeNotFound`]/[`ReviewError::UserNotFound`] when either
/// side of the review does not exist, and [`ReviewError::Storage`] when the
/// backend fails.
pub async fn add_review(
    repo: &Repository,
    username: &str,
    recipe_id: i64,
    body: &str,
    rating: i32,
    date: DateTime<Utc>,
) -> Result<Review, ReviewError> {
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::InvalidRating(rating));
    }

    let recipe = repo.get_recipe_by_id(recipe_id).await?;
    if recipe.is_none() {
        return Err(ReviewError::RecipeNotFound(recipe_id));
    }
    let user = repo.get_user(username).await?;
    if user.is_none() {
        return Err(ReviewError::UserNotFound(username.to_owned()));
    }

    let review = NewReview {
        username: username.to_owned(),
        recipe_id,
        rating,
        body: body.to_owned(),
        created_at: date,
    };
    Ok(repo.add_review(&review).await?)
}

/// Remove a review if it belongs to the given user.
///
/// # Errors
///
/// Returns [`ReviewError::RecipeNotFound`] for an unknown recipe and
/// [`ReviewError::NotFound`] when the review does not exist on the recipe
/// or is owned by somebody else; the review is left intact in that case.
pub async fn remove_review(
    repo: &Repository,
    username: &str,
    recipe_id: i64,
    review_id: i64,
) -> Result<Review, ReviewError> {
    let recipe = repo
        .get_recipe_by_id(recipe_id)
        .await?
        .ok_or(ReviewError::RecipeNotFound(recipe_id))?;

    let to_remove = recipe
        .reviews
        .iter()
        .find(|review| review.id == review_id && review.username == username)
        .cloned()
        .ok_or_else(|| ReviewError::NotFound {
            review_id,
            recipe_id,
            username: username.to_owned(),
        })?;

    repo.remove_review(to_remove.id).await?;
    Ok(to_remove)
}

/// All reviews for a recipe, in insertion order.
///
/// # Errors
///
/// Returns [`ReviewError::RecipeNotFound`] for an unknown recipe.
pub async fn get_reviews_for_recipe(
    repo: &Repository,
    recipe_id: i64,
) -> Result<Vec<Review>, ReviewError> {
    let recipe = repo
        .get_recipe_by_id(recipe_id)
        .await?
        .ok_or(ReviewError::RecipeNotFound(recipe_id))?;
    Ok(recipe.reviews)
}
