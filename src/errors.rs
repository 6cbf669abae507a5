// ABOUTME: Domain error taxonomy for review and favourite operations
// ABOUTME: Typed violations for callers to translate, storage failures passed through
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! # Error Handling
//!
//! Two kinds of failure leave this crate:
//!
//! - **Domain-rule violations** - reviewing or favoriting against a missing
//!   user or recipe, removing a review the caller does not own, an
//!   out-of-range rating. These are the typed enums below; the calling layer
//!   catches them and turns them into user feedback.
//! - **Storage failures** - a backend query or commit failing. These pass
//!   through as the generic `Storage` variant and are not retried here.
//!
//! Plain lookup misses are not errors at all: repository getters return
//! `Ok(None)` for an unknown id or username.

use thiserror::Error;

/// Failures raised by the review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The reviewed recipe does not exist
    #[error("recipe {0} was not found")]
    RecipeNotFound(i64),

    /// The reviewing user does not exist
    #[error("user {0} was not found")]
    UserNotFound(String),

    /// No review with this id exists on the recipe, or it belongs to
    /// somebody else; the two cases are deliberately indistinguishable
    #[error("review {review_id} on recipe {recipe_id} was not found or is not owned by {username}")]
    NotFound {
        /// Review the caller asked to remove
        review_id: i64,
        /// Recipe the review was expected on
        recipe_id: i64,
        /// User who made the request
        username: String,
    },

    /// Rating outside the accepted [1, 5] range
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    /// Backend failure while reading or writing
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Failures raised by the favourite operations.
#[derive(Debug, Error)]
pub enum FavouriteError {
    /// The bookmarked recipe does not exist
    #[error("recipe {0} was not found")]
    RecipeNotFound(i64),

    /// The bookmarking user does not exist
    #[error("user {0} was not found")]
    UserNotFound(String),

    /// Backend failure while reading or writing
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
