// ABOUTME: Search engine over the recipe corpus with filtering, sorting and pagination
// ABOUTME: Annotates each result page with nutrition facts, health stars and suggestions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! Search engine
//!
//! `search` runs the full pipeline over the corpus: filter by the selected
//! dimension, stable-sort by the matched field, paginate, then annotate the
//! visible page with nutrition facts and health stars. Autocomplete
//! suggestion sets always come from the complete corpus, independent of the
//! active filter and page. The engine never fails on user input: an empty
//! corpus, an unknown filter or an out-of-range page all produce a defined
//! result.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::{Nutrition, Recipe};
use crate::pagination::Pagination;
use crate::repository::factory::Repository;
use crate::repository::RecipeRepository;
use crate::scoring;

/// Default number of search results per page
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 12;

/// The field a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    /// Match against the recipe name
    Name,
    /// Match against the category name
    Category,
    /// Match against the author name
    Author,
    /// Match if any ingredient contains the query
    Ingredients,
    /// Match against all four fields; the default for unknown inputs
    Any,
}

impl SearchFilter {
    /// Parse a filter dimension; empty or unrecognized input selects the
    /// multi-field search.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "category" => Self::Category,
            "author" => Self::Author,
            "ingredients" => Self::Ingredients,
            _ => Self::Any,
        }
    }

    fn matches(self, recipe: &Recipe, query_lower: &str) -> bool {
        match self {
            Self::Name => recipe.name.to_lowercase().contains(query_lower),
            Self::Category => recipe.category.name.to_lowercase().contains(query_lower),
            Self::Author => recipe.author.name.to_lowercase().contains(query_lower),
            Self::Ingredients => recipe
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(query_lower)),
            Self::Any => {
                Self::Name.matches(recipe, query_lower)
                    || Self::Category.matches(recipe, query_lower)
                    || Self::Author.matches(recipe, query_lower)
                    || Self::Ingredients.matches(recipe, query_lower)
            }
        }
    }

    /// Sort key for the matched field; the multi-field search orders by name.
    fn sort_key(self, recipe: &Recipe) -> String {
        match self {
            Self::Name | Self::Any => recipe.name.to_lowercase(),
            Self::Category => recipe.category.name.to_lowercase(),
            Self::Author => recipe.author.name.to_lowercase(),
            Self::Ingredients => recipe.first_ingredient().to_lowercase(),
        }
    }
}

/// Deduplicated, alphabetically sorted autocomplete sets computed over the
/// full corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    /// Distinct recipe names
    pub names: Vec<String>,
    /// Distinct category names
    pub categories: Vec<String>,
    /// Distinct author names
    pub authors: Vec<String>,
    /// Distinct ingredient strings, flattened across all recipes
    pub ingredients: Vec<String>,
}

impl Suggestions {
    fn from_corpus(recipes: &[Recipe]) -> Self {
        let mut names = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut authors = BTreeSet::new();
        let mut ingredients = BTreeSet::new();
        for recipe in recipes {
            names.insert(recipe.name.clone());
            categories.insert(recipe.category.name.clone());
            authors.insert(recipe.author.name.clone());
            for ingredient in &recipe.ingredients {
                ingredients.insert(ingredient.clone());
            }
        }
        Self {
            names: names.into_iter().collect(),
            categories: categories.into_iter().collect(),
            authors: authors.into_iter().collect(),
            ingredients: ingredients.into_iter().collect(),
        }
    }
}

/// One page of search results with its annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// The recipes on the requested page, in sorted order
    pub recipes: Vec<Recipe>,
    /// Total number of recipes matching the query, across all pages
    pub total_recipes: usize,
    /// Nutrition facts for the recipes on this page, keyed by recipe id;
    /// recipes without a record have no entry
    pub nutrition: HashMap<i64, Nutrition>,
    /// Health stars for every recipe on this page; `None` marks a recipe
    /// without nutrition data
    pub health_stars: HashMap<i64, Option<f64>>,
    /// Corpus-wide autocomplete suggestion sets
    pub suggestions: Suggestions,
    /// Page metadata for the result listing
    pub pagination: Pagination,
}

/// Search engine over a repository.
#[derive(Clone)]
pub struct SearchService {
    repo: Repository,
}

impl SearchService {
    /// Create an engine bound to the given repository
    #[must_use]
    pub const fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Run the search pipeline.
    ///
    /// An empty `query` matches everything; `filter_by` is parsed with
    /// [`SearchFilter::parse`]; `page` is clamped into range and a zero
    /// `page_size` falls back to [`DEFAULT_SEARCH_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns an error only when the repository itself fails; no
    /// combination of query, filter and page input is an error.
    pub async fn search(
        &self,
        query: &str,
        filter_by: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResults> {
        let page_size = if page_size == 0 {
            DEFAULT_SEARCH_PAGE_SIZE
        } else {
            page_size
        };
        let filter = SearchFilter::parse(filter_by);

        // Filtering and sorting operate over the complete corpus; the page
        // slice comes last.
        let all_recipes = self.repo.get_all_recipes().await?;
        let suggestions = Suggestions::from_corpus(&all_recipes);

        let query_lower = query.trim().to_lowercase();
        let mut matched: Vec<Recipe> = if query_lower.is_empty() {
            all_recipes
        } else {
            all_recipes
                .into_iter()
                .filter(|recipe| filter.matches(recipe, &query_lower))
                .collect()
        };
        // Name and id tiebreaks keep the ordering deterministic even when
        // the matched field is shared by several recipes.
        matched.sort_by_cached_key(|recipe| {
            (filter.sort_key(recipe), recipe.name.to_lowercase(), recipe.id)
        });

        let total_recipes = matched.len();
        let pagination = Pagination::compute(total_recipes, page, page_size);
        let (start, end) = pagination.slice_bounds(total_recipes, page_size);
        let page_recipes = matched[start..end].to_vec();

        let mut nutrition = HashMap::with_capacity(page_recipes.len());
        let mut health_stars = HashMap::with_capacity(page_recipes.len());
        for recipe in &page_recipes {
            let record = self.repo.get_nutrition_by_recipe_id(recipe.id).await?;
            health_stars.insert(recipe.id, scoring::health_stars(record.as_ref()));
            if let Some(record) = record {
                nutrition.insert(recipe.id, record);
            }
        }

        Ok(SearchResults {
            recipes: page_recipes,
            total_recipes,
            nutrition,
            health_stars,
            suggestions,
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Category};

    fn recipe(id: i64, name: &str, author: &str, category: &str) -> Recipe {
        Recipe::new(
            id,
            name.into(),
            Author::new(id, author.into()),
            Category::new(1, category.into()),
        )
    }

    #[test]
    fn filter_parse_defaults_to_multi_field() {
        assert_eq!(SearchFilter::parse(""), SearchFilter::Any);
        assert_eq!(SearchFilter::parse("rating"), SearchFilter::Any);
        assert_eq!(SearchFilter::parse("Ingredients"), SearchFilter::Ingredients);
    }

    #[test]
    fn multi_field_match_is_an_or_across_dimensions() {
        let mut r = recipe(1, "Beef Stew", "Mary Berry", "Main Course");
        r.ingredients = vec!["beef".into(), "carrot".into()];
        assert!(SearchFilter::Any.matches(&r, "mary"));
        assert!(SearchFilter::Any.matches(&r, "carrot"));
        assert!(SearchFilter::Any.matches(&r, "stew"));
        assert!(!SearchFilter::Any.matches(&r, "chocolate"));
    }

    #[test]
    fn ingredient_sort_key_is_the_first_ingredient() {
        let mut r = recipe(1, "Beef Stew", "Mary Berry", "Main Course");
        assert_eq!(SearchFilter::Ingredients.sort_key(&r), "");
        r.ingredients = vec!["Beef".into(), "carrot".into()];
        assert_eq!(SearchFilter::Ingredients.sort_key(&r), "beef");
    }
}
