// ABOUTME: Main library entry point for the Ladle recipe browsing core
// ABOUTME: Scoring, search and repository contract consumed by a request layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

#![deny(unsafe_code)]

//! # Ladle
//!
//! The core of a recipe-browsing application: nutrition-based health-star
//! scoring, a search/filter/sort/paginate engine, and per-user favourites
//! and reviews, all working through one repository contract with two
//! interchangeable backends (in-memory and SQLite).
//!
//! This is a library-style core: HTTP routing, templating and
//! authentication live in the embedding application and talk to this crate
//! through the [`repository`] contract and the [`services`] layer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ladle::repository::factory::Repository;
//! use ladle::services::search::SearchService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repo = Repository::new("sqlite:recipes.db").await?;
//!     let engine = SearchService::new(repo);
//!     let results = engine.search("chicken", "ingredients", 1, 12).await?;
//!     println!("{} matching recipes", results.total_recipes);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`models`]: the domain model shared by every layer
//! - [`repository`]: the storage contract, factory and both backends
//! - [`scoring`]: the pure health-star scorer
//! - [`services`]: search, browse, detail, review and favourite logic
//! - [`ingest`]: corpus population semantics (dedup, degrade-on-malformed)

/// Environment-based configuration
pub mod config;

/// Domain error taxonomy for review and favourite operations
pub mod errors;

/// Corpus population from parsed source records
pub mod ingest;

/// Logging setup for the embedding process
pub mod logging;

/// Core domain model
pub mod models;

/// Offset pagination with a bounded display window
pub mod pagination;

/// Repository contract and backends
pub mod repository;

/// Nutrition-based health-star scoring
pub mod scoring;

/// Backend-agnostic service layer
pub mod services;
