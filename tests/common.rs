// ABOUTME: Shared test utilities - backend constructors and corpus fixtures
// ABOUTME: Every contract test runs against both repository backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
//! Shared test utilities for `ladle`
//!
//! The important helper is [`all_backends`]: repository tests iterate over
//! both backends in one test body so the two implementations cannot drift.

use std::sync::Once;

use ladle::ingest::{populate, RecipeRecord};
use ladle::models::User;
use ladle::repository::factory::Repository;
use ladle::repository::RecipeRepository;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory backend
pub async fn create_memory_repository() -> Repository {
    init_test_logging();
    Repository::new("memory://").await.unwrap()
}

/// Fresh SQLite backend on a throwaway database
pub async fn create_sqlite_repository() -> Repository {
    init_test_logging();
    Repository::new("sqlite::memory:").await.unwrap()
}

/// Both backends, for contract tests that must hold everywhere
pub async fn all_backends() -> Vec<Repository> {
    vec![
        create_memory_repository().await,
        create_sqlite_repository().await,
    ]
}

/// The three-recipe corpus used throughout the suite.
///
/// Chocolate Cake carries the worst-case nutrition profile (0.5 stars),
/// Beef Stew a strong one (5.0 stars) and Salad Bowl an empty record
/// (also 5.0 stars, nothing to penalize).
pub fn sample_records() -> Vec<RecipeRecord> {
    vec![
        RecipeRecord {
            recipe_id: 1,
            name: "Chocolate Cake".into(),
            author_id: 1,
            author_name: "Chef John".into(),
            category: "Dessert".into(),
            ingredients: "['flour', 'sugar', 'chocolate']".into(),
            ingredient_quantities: "['2 cups', '1 cup', '200 g']".into(),
            instructions: "Mix everything. Bake for an hour.".into(),
            images: "['https://images.example/cake.jpg']".into(),
            saturated_fat: Some(10.0),
            sugar: Some(25.0),
            sodium: Some(800.0),
            fiber: Some(0.5),
            protein: Some(3.0),
            ..RecipeRecord::default()
        },
        RecipeRecord {
            recipe_id: 2,
            name: "Beef Stew".into(),
            author_id: 2,
            author_name: "Mary Berry".into(),
            category: "Main Course".into(),
            ingredients: "['beef', 'carrot', 'potato']".into(),
            ingredient_quantities: "['500 g', '2', '3']".into(),
            instructions: "Brown the beef. Simmer until tender.".into(),
            images: String::new(),
            sodium: Some(150.0),
            fiber: Some(4.0),
            protein: Some(12.0),
            ..RecipeRecord::default()
        },
        RecipeRecord {
            recipe_id: 3,
            name: "Salad Bowl".into(),
            author_id: 1,
            author_name: "Chef John".into(),
            category: "Main Course".into(),
            ingredients: "['lettuce', 'tomato', 'chicken']".into(),
            ingredient_quantities: "['1 head', '2', '150 g']".into(),
            instructions: "Chop. Toss. Serve.".into(),
            images: String::new(),
            ..RecipeRecord::default()
        },
    ]
}

/// Populate the sample corpus and register the test users
pub async fn seed(repo: &Repository) {
    populate(repo, &sample_records()).await.unwrap();
    repo.add_user(&User::new("alice".into(), "hash-a".into()))
        .await
        .unwrap();
    repo.add_user(&User::new("bob".into(), "hash-b".into()))
        .await
        .unwrap();
}

/// A fully seeded instance of every backend
pub async fn seeded_backends() -> Vec<Repository> {
    let backends = all_backends().await;
    for repo in &backends {
        seed(repo).await;
    }
    backends
}
