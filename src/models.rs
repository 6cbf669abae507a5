// ABOUTME: Core domain model for the recipe browsing platform
// ABOUTME: Defines Recipe, Author, Category, Nutrition, User, Review and Favourite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! # Data Models
//!
//! Core data structures shared by the repository backends and the service
//! layer. The presentation layer consumes these through JSON serialization.
//!
//! ## Design Principles
//!
//! - **Backend Agnostic**: the same structs round-trip through the in-memory
//!   and the SQLite backend
//! - **Explicit Nullability**: optional nutrient values are `Option<f64>`,
//!   never sentinel zeros
//! - **Derived Collections**: `Recipe::reviews`, `User::reviews` and
//!   `User::favourites` are populated by the repository on read from the
//!   canonical per-kind storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recipe author.
///
/// Recipes hold the authoritative author reference; the set of recipes per
/// author is a derived index owned by the repository, not by this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Unique author identifier
    pub id: i64,
    /// Author display name
    pub name: String,
}

impl Author {
    /// Create a new author
    #[must_use]
    pub const fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}

/// A recipe category.
///
/// The category name is the natural key; the integer id exists for storage
/// and is assigned in first-seen order during corpus population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Storage identifier, assigned at ingestion
    pub id: i64,
    /// Category name, the natural key
    pub name: String,
}

impl Category {
    /// Create a new category
    #[must_use]
    pub const fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}

/// Per-recipe nutrition facts, keyed 1:1 by recipe id.
///
/// Every nutrient is optional; an absent value is distinct from zero even
/// though the scorer currently treats both the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    /// Recipe this record belongs to
    pub recipe_id: i64,
    /// Calories (kcal)
    pub calories: Option<f64>,
    /// Total fat (g)
    pub fat: Option<f64>,
    /// Saturated fat (g)
    pub saturated_fat: Option<f64>,
    /// Cholesterol (mg)
    pub cholesterol: Option<f64>,
    /// Sodium (mg)
    pub sodium: Option<f64>,
    /// Carbohydrates (g)
    pub carbohydrates: Option<f64>,
    /// Dietary fiber (g)
    pub fiber: Option<f64>,
    /// Sugar (g)
    pub sugar: Option<f64>,
    /// Protein (g)
    pub protein: Option<f64>,
}

impl Nutrition {
    /// Create an empty record for the given recipe
    #[must_use]
    pub fn new(recipe_id: i64) -> Self {
        Self {
            recipe_id,
            ..Self::default()
        }
    }
}

/// A single recipe with its resolved references and derived collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier, immutable after creation
    pub id: i64,
    /// Recipe name
    pub name: String,
    /// Resolved author reference
    pub author: Author,
    /// Resolved category reference
    pub category: Category,
    /// Ordered ingredient names
    pub ingredients: Vec<String>,
    /// Ordered ingredient quantities, parallel to `ingredients`
    pub ingredient_quantities: Vec<String>,
    /// Ordered preparation steps
    pub instructions: Vec<String>,
    /// Ordered image URLs
    pub images: Vec<String>,
    /// Aggregate rating, the running average over `reviews`
    pub rating: Option<f64>,
    /// Reviews for this recipe, populated by the repository on read
    pub reviews: Vec<Review>,
}

impl Recipe {
    /// Create a recipe with empty collections and no rating
    #[must_use]
    pub const fn new(id: i64, name: String, author: Author, category: Category) -> Self {
        Self {
            id,
            name,
            author,
            category,
            ingredients: Vec::new(),
            ingredient_quantities: Vec::new(),
            instructions: Vec::new(),
            images: Vec::new(),
            rating: None,
            reviews: Vec::new(),
        }
    }

    /// First ingredient name, or the empty string when there are none.
    ///
    /// This is the sort key used when searching by ingredients.
    #[must_use]
    pub fn first_ingredient(&self) -> &str {
        self.ingredients.first().map_or("", String::as_str)
    }
}

/// A registered user.
///
/// Password verification happens in the authentication layer; this crate
/// only stores the hash it is handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique username
    pub username: String,
    /// Hashed password supplied by the authentication layer
    pub password_hash: String,
    /// Reviews written by this user, populated by the repository on read
    pub reviews: Vec<Review>,
    /// The user's favourites, populated by the repository on read
    pub favourites: Vec<Favourite>,
}

impl User {
    /// Create a new user with empty collections
    #[must_use]
    pub const fn new(username: String, password_hash: String) -> Self {
        Self {
            username,
            password_hash,
            reviews: Vec::new(),
            favourites: Vec::new(),
        }
    }
}

/// A stored review with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned positive identifier
    pub id: i64,
    /// Username of the review author
    pub username: String,
    /// Recipe being reviewed
    pub recipe_id: i64,
    /// Rating in [1, 5]
    pub rating: i32,
    /// Free-text review body
    pub body: String,
    /// When the review was written
    pub created_at: DateTime<Utc>,
}

/// A review before the store has assigned it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    /// Username of the review author
    pub username: String,
    /// Recipe being reviewed
    pub recipe_id: i64,
    /// Rating in [1, 5]
    pub rating: i32,
    /// Free-text review body
    pub body: String,
    /// When the review was written
    pub created_at: DateTime<Utc>,
}

/// A stored user-recipe bookmark.
///
/// At most one favourite exists per (username, recipe id) pair; the integer
/// id is a store-assigned surrogate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    /// Store-assigned surrogate identifier
    pub id: i64,
    /// Owning username
    pub username: String,
    /// Bookmarked recipe
    pub recipe_id: i64,
}

/// A favourite before the store has assigned it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFavourite {
    /// Owning username
    pub username: String,
    /// Bookmarked recipe
    pub recipe_id: i64,
}

/// Sort order for paged recipe listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSort {
    /// Name ascending, the default and the fallback for unknown inputs
    #[default]
    NameAsc,
    /// Name descending
    NameDesc,
    /// Id ascending
    IdAsc,
    /// Id descending
    IdDesc,
}

impl RecipeSort {
    /// Parse a sort key, falling back to name-ascending for anything
    /// unrecognized. Inputs are the request-level strings the original
    /// listing endpoints accept.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "name_desc" | "desc_name" => Self::NameDesc,
            "id" | "id_asc" => Self::IdAsc,
            "id_desc" | "desc_id" => Self::IdDesc,
            _ => Self::NameAsc,
        }
    }

    /// Canonical string form, used for storage-side ORDER BY selection
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::IdAsc => "id_asc",
            Self::IdDesc => "id_desc",
        }
    }
}
