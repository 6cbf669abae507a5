// ABOUTME: Corpus population from parsed source records
// ABOUTME: Dedupes authors and categories by natural key, degrades malformed fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Corpus population
//!
//! The actual file reading lives outside this crate; what belongs here is
//! the population semantics: authors are deduplicated by id and categories
//! by name across the whole corpus (category ids assigned in first-seen
//! order), nutrition is keyed 1:1 by recipe id, and malformed list-valued
//! fields fall back to an empty list instead of failing the rest of the
//! corpus.

use std::collections::HashMap;

use anyhow::Result;
use tracing::info;

use crate::models::{Author, Category, Nutrition, Recipe};
use crate::repository::factory::Repository;
use crate::repository::RecipeRepository;

/// One recipe row as handed over by the external reader.
///
/// List-valued fields arrive as the raw cell text and are parsed here with
/// [`parse_list_field`]; numeric nutrient cells arrive already degraded to
/// `None` where unparseable.
#[derive(Debug, Clone, Default)]
pub struct RecipeRecord {
    /// Source recipe id
    pub recipe_id: i64,
    /// Recipe name
    pub name: String,
    /// Source author id
    pub author_id: i64,
    /// Author display name
    pub author_name: String,
    /// Category name
    pub category: String,
    /// Raw ingredient list cell
    pub ingredients: String,
    /// Raw ingredient quantity list cell
    pub ingredient_quantities: String,
    /// Raw instruction list cell
    pub instructions: String,
    /// Raw image URL list cell
    pub images: String,
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

/// Parse a list-valued cell.
///
/// Empty cells and the literal `None` become the empty list. A bracketed
/// list literal is parsed into its quoted items; anything else - including
/// a bracketed literal that fails to parse - is split on newlines and
/// periods. This never fails: malformed input degrades instead of aborting
/// ingestion.
#[must_use]
pub fn parse_list_field(raw: &str) -> Vec<String> {
    let value = raw.trim();
    if value.is_empty() || value == "None" {
        return Vec::new();
    }
    if value.starts_with('[') && value.ends_with(']') {
        if let Some(items) = parse_bracketed(value) {
            return items;
        }
    }
    value
        .replace('\n', ".")
        .split('.')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse `['a', 'b']` / `["a", "b"]` style literals. Returns `None` for
/// anything that is not a list of quoted strings so the caller can fall
/// back to sentence splitting.
fn parse_bracketed(value: &str) -> Option<Vec<String>> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            quote @ ('\'' | '"') => {
                let mut item = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == quote => break,
                        Some('\\') => {
                            if let Some(escaped) = chars.next() {
                                item.push(escaped);
                            }
                        }
                        Some(ch) => item.push(ch),
                        None => return None,
                    }
                }
                items.push(item);
            }
            ',' | ' ' => {}
            _ => return None,
        }
    }
    Some(items)
}

/// Pad or truncate quantities so both parallel sequences line up.
fn align_quantities(ingredient_count: usize, mut quantities: Vec<String>) -> Vec<String> {
    quantities.truncate(ingredient_count);
    while quantities.len() < ingredient_count {
        quantities.push(String::new());
    }
    quantities
}

/// Load a parsed corpus into the repository.
///
/// Safe to run more than once: every underlying add is idempotent on the
/// entity's identity.
///
/// # Errors
///
/// Returns an error when the repository fails; individual malformed fields
/// never abort the load.
pub async fn populate(repo: &Repository, records: &[RecipeRecord]) -> Result<()> {
    let mut authors: HashMap<i64, Author> = HashMap::new();
    let mut categories: HashMap<String, Category> = HashMap::new();
    let mut next_category_id: i64 = 0;

    for record in records {
        authors
            .entry(record.author_id)
            .or_insert_with(|| Author::new(record.author_id, record.author_name.clone()));
        if !categories.contains_key(&record.category) {
            next_category_id += 1;
            categories.insert(
                record.category.clone(),
                Category::new(next_category_id, record.category.clone()),
            );
        }
    }

    for record in records {
        let author = authors
            .get(&record.author_id)
            .cloned()
            .unwrap_or_else(|| Author::new(record.author_id, record.author_name.clone()));
        let category = categories
            .get(&record.category)
            .cloned()
            .unwrap_or_else(|| Category::new(0, record.category.clone()));

        let mut recipe = Recipe::new(record.recipe_id, record.name.clone(), author, category);
        recipe.ingredients = parse_list_field(&record.ingredients);
        recipe.ingredient_quantities = align_quantities(
            recipe.ingredients.len(),
            parse_list_field(&record.ingredient_quantities),
        );
        recipe.instructions = parse_list_field(&record.instructions);
        recipe.images = parse_list_field(&record.images);

        repo.add_recipe(&recipe).await?;

        let nutrition = Nutrition {
            recipe_id: record.recipe_id,
            calories: record.calories,
            fat: record.fat,
            saturated_fat: record.saturated_fat,
            cholesterol: record.cholesterol,
            sodium: record.sodium,
            carbohydrates: record.carbohydrates,
            fiber: record.fiber,
            sugar: record.sugar,
            protein: record.protein,
        };
        repo.add_nutrition(&nutrition).await?;
    }

    for category in categories.values() {
        repo.add_category(category).await?;
    }
    for author in authors.values() {
        repo.add_author(author).await?;
    }

    info!(
        "Populated corpus: {} recipes, {} authors, {} categories",
        records.len(),
        authors.len(),
        categories.len()
    );
    Ok(())
}
