// ABOUTME: Search engine tests - filtering, sorting, pagination and annotations
// ABOUTME: Runs against both repository backends through the same service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use ladle::models::{Author, Category, Recipe};
use ladle::repository::RecipeRepository;
use ladle::services::search::SearchService;

fn names(results: &ladle::services::search::SearchResults) -> Vec<&str> {
    results
        .recipes
        .iter()
        .map(|recipe| recipe.name.as_str())
        .collect()
}

#[tokio::test]
async fn ingredient_filter_matches_exactly_one_recipe() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("chicken", "ingredients", 1, 12).await.unwrap();
        assert_eq!(results.total_recipes, 1);
        assert_eq!(names(&results), vec!["Salad Bowl"]);
    }
}

#[tokio::test]
async fn category_filter_returns_alphabetical_matches() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine
            .search("Main Course", "category", 1, 12)
            .await
            .unwrap();
        assert_eq!(results.total_recipes, 2);
        assert_eq!(names(&results), vec!["Beef Stew", "Salad Bowl"]);
    }
}

#[tokio::test]
async fn empty_query_returns_everything_sorted_by_name() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("", "", 1, 12).await.unwrap();
        assert_eq!(results.total_recipes, 3);
        assert_eq!(
            names(&results),
            vec!["Beef Stew", "Chocolate Cake", "Salad Bowl"]
        );
    }
}

#[tokio::test]
async fn unknown_filter_searches_across_all_fields() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);

        // Author name through the default multi-field search
        let by_author = engine.search("mary", "", 1, 12).await.unwrap();
        assert_eq!(names(&by_author), vec!["Beef Stew"]);

        // An ingredient matches too, despite the bogus filter name
        let by_ingredient = engine.search("tomato", "calories", 1, 12).await.unwrap();
        assert_eq!(names(&by_ingredient), vec!["Salad Bowl"]);
    }
}

#[tokio::test]
async fn matching_is_case_insensitive_substring() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("CHOC", "name", 1, 12).await.unwrap();
        assert_eq!(names(&results), vec!["Chocolate Cake"]);
    }
}

#[tokio::test]
async fn pagination_boundary_on_the_last_page() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("", "", 2, 2).await.unwrap();
        assert_eq!(results.recipes.len(), 1);
        assert_eq!(results.total_recipes, 3);
        assert_eq!(results.pagination.total_pages, 2);
        assert!(results.pagination.has_prev);
        assert!(!results.pagination.has_next);
    }
}

#[tokio::test]
async fn page_and_size_inputs_never_raise() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        for (page, page_size) in [(0, 0), (1, 1), (99, 2), (3, 12), (1, 100)] {
            let results = engine.search("", "", page, page_size).await.unwrap();
            let effective_size = if page_size == 0 { 12 } else { page_size };
            assert!(results.recipes.len() <= effective_size as usize);
            assert_eq!(
                results.pagination.total_pages as usize,
                results
                    .total_recipes
                    .div_ceil(effective_size as usize)
                    .max(1)
            );
        }
    }
}

#[tokio::test]
async fn results_are_annotated_with_nutrition_and_stars() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("", "", 1, 12).await.unwrap();

        assert_eq!(results.health_stars[&1], Some(0.5));
        assert_eq!(results.health_stars[&2], Some(5.0));
        // An all-null record still scores the full five stars
        assert_eq!(results.health_stars[&3], Some(5.0));
        assert_eq!(results.nutrition[&1].sugar, Some(25.0));
    }
}

#[tokio::test]
async fn recipe_without_nutrition_gets_null_stars() {
    for repo in common::seeded_backends().await {
        repo.add_recipe(&Recipe::new(
            10,
            "Mystery Dish".into(),
            Author::new(5, "Anon".into()),
            Category::new(3, "Unknown".into()),
        ))
        .await
        .unwrap();

        let engine = SearchService::new(repo);
        let results = engine.search("Mystery", "name", 1, 12).await.unwrap();
        assert_eq!(results.health_stars[&10], None);
        assert!(!results.nutrition.contains_key(&10));
    }
}

#[tokio::test]
async fn suggestions_come_from_the_full_corpus() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        // A narrow filter must not narrow the suggestion sets
        let results = engine.search("chicken", "ingredients", 1, 12).await.unwrap();

        assert_eq!(
            results.suggestions.names,
            vec!["Beef Stew", "Chocolate Cake", "Salad Bowl"]
        );
        assert_eq!(
            results.suggestions.categories,
            vec!["Dessert", "Main Course"]
        );
        assert_eq!(
            results.suggestions.authors,
            vec!["Chef John", "Mary Berry"]
        );
        assert_eq!(
            results.suggestions.ingredients,
            vec![
                "beef",
                "carrot",
                "chicken",
                "chocolate",
                "flour",
                "lettuce",
                "potato",
                "sugar",
                "tomato"
            ]
        );
    }
}

#[tokio::test]
async fn empty_corpus_produces_a_defined_empty_result() {
    for repo in common::all_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("anything", "name", 7, 12).await.unwrap();
        assert_eq!(results.total_recipes, 0);
        assert!(results.recipes.is_empty());
        assert_eq!(results.pagination.page, 1);
        assert_eq!(results.pagination.total_pages, 1);
        assert!(results.suggestions.names.is_empty());
        assert!(results.suggestions.ingredients.is_empty());
    }
}

#[tokio::test]
async fn results_serialize_for_the_presentation_layer() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        let results = engine.search("", "", 1, 12).await.unwrap();

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["total_recipes"], 3);
        assert_eq!(json["pagination"]["page"], 1);
        assert_eq!(json["recipes"][0]["name"], "Beef Stew");
        // Map keys become strings on the wire
        assert!(json["health_stars"]["1"].is_number());
        assert_eq!(json["suggestions"]["categories"][0], "Dessert");
    }
}

#[tokio::test]
async fn ingredient_filter_sorts_by_first_ingredient() {
    for repo in common::seeded_backends().await {
        let engine = SearchService::new(repo);
        // "o" appears in an ingredient of every recipe
        let results = engine.search("o", "ingredients", 1, 12).await.unwrap();
        // First ingredients: beef (Stew), flour (Cake), lettuce (Salad)
        assert_eq!(
            names(&results),
            vec!["Beef Stew", "Chocolate Cake", "Salad Bowl"]
        );
    }
}
