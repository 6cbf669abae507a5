// ABOUTME: Domain service layer for business logic consumed by the request layer
// ABOUTME: Backend-agnostic services working through the repository contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Domain service layer
//!
//! Business logic the request-handling layer calls into. Every service is
//! backend-agnostic: it only sees the repository contract, so the same
//! rules apply whether the corpus lives in memory or in SQLite.

/// Browse and home page aggregation
pub mod browse;

/// Recipe detail aggregation
pub mod details;

/// Favourite bookkeeping per user
pub mod favorites;

/// Review creation, removal and listing
pub mod reviews;

/// Search, filter, sort and paginate over the corpus
pub mod search;
