// ABOUTME: Repository contract tests executed against both backends
// ABOUTME: Covers idempotence, sorting, paging normalization and backend parity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use chrono::{TimeZone, Utc};
use ladle::models::{Author, Category, NewFavourite, NewReview, Recipe, RecipeSort, User};
use ladle::repository::factory::Repository;
use ladle::repository::RecipeRepository;

fn names(recipes: &[Recipe]) -> Vec<&str> {
    recipes.iter().map(|recipe| recipe.name.as_str()).collect()
}

#[tokio::test]
async fn user_roundtrip_and_idempotent_add() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();

        let user = repo.get_user("alice").await.unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hash-a", "{backend}");
        assert!(user.reviews.is_empty());
        assert!(user.favourites.is_empty());

        // Re-adding merges instead of duplicating
        repo.add_user(&User::new("alice".into(), "hash-a2".into()))
            .await
            .unwrap();
        let updated = repo.get_user("alice").await.unwrap().unwrap();
        assert_eq!(updated.password_hash, "hash-a2", "{backend}");

        assert!(repo.get_user("nobody").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn recipe_lookup_miss_is_none_not_an_error() {
    for repo in common::seeded_backends().await {
        assert!(repo.get_recipe_by_id(999).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn recipe_is_reassembled_with_its_collections() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();
        let cake = repo.get_recipe_by_id(1).await.unwrap().unwrap();
        assert_eq!(cake.name, "Chocolate Cake");
        assert_eq!(cake.author.name, "Chef John");
        assert_eq!(cake.category.name, "Dessert");
        assert_eq!(cake.ingredients, vec!["flour", "sugar", "chocolate"]);
        assert_eq!(
            cake.ingredient_quantities,
            vec!["2 cups", "1 cup", "200 g"],
            "{backend}"
        );
        assert_eq!(cake.instructions, vec!["Mix everything", "Bake for an hour"]);
        assert_eq!(cake.images, vec!["https://images.example/cake.jpg"]);
        assert_eq!(cake.rating, None);
    }
}

#[tokio::test]
async fn idempotent_add_recipe_replaces_in_place() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();
        let mut cake = repo.get_recipe_by_id(1).await.unwrap().unwrap();
        cake.name = "Flourless Chocolate Cake".into();
        repo.add_recipe(&cake).await.unwrap();

        assert_eq!(repo.get_all_recipes().await.unwrap().len(), 3, "{backend}");
        let renamed = repo.get_recipe_by_id(1).await.unwrap().unwrap();
        assert_eq!(renamed.name, "Flourless Chocolate Cake");
    }
}

#[tokio::test]
async fn paged_listing_sorts_and_breaks_ties_by_id() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();

        let by_name = repo
            .get_recipes(1, 10, RecipeSort::NameAsc)
            .await
            .unwrap();
        assert_eq!(
            names(&by_name),
            vec!["Beef Stew", "Chocolate Cake", "Salad Bowl"],
            "{backend}"
        );

        let by_name_desc = repo
            .get_recipes(1, 10, RecipeSort::NameDesc)
            .await
            .unwrap();
        assert_eq!(
            names(&by_name_desc),
            vec!["Salad Bowl", "Chocolate Cake", "Beef Stew"],
            "{backend}"
        );

        let by_id_desc = repo.get_recipes(1, 10, RecipeSort::IdDesc).await.unwrap();
        assert_eq!(
            by_id_desc.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![3, 2, 1],
            "{backend}"
        );
    }
}

#[tokio::test]
async fn case_only_name_ties_fall_back_to_id_order() {
    for repo in common::all_backends().await {
        let backend = repo.backend_info();
        let author = Author::new(9, "Tester".into());
        let category = Category::new(9, "Test".into());
        repo.add_recipe(&Recipe::new(2, "apple pie".into(), author.clone(), category.clone()))
            .await
            .unwrap();
        repo.add_recipe(&Recipe::new(1, "Apple Pie".into(), author, category))
            .await
            .unwrap();

        let listed = repo.get_recipes(1, 10, RecipeSort::NameAsc).await.unwrap();
        assert_eq!(
            listed.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2],
            "{backend}"
        );
    }
}

#[tokio::test]
async fn paging_inputs_are_normalized() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();

        // Page 0 becomes page 1, size 0 becomes the default 10
        let normalized = repo.get_recipes(0, 0, RecipeSort::NameAsc).await.unwrap();
        assert_eq!(normalized.len(), 3, "{backend}");

        let second_page = repo.get_recipes(2, 2, RecipeSort::NameAsc).await.unwrap();
        assert_eq!(names(&second_page), vec!["Salad Bowl"], "{backend}");

        let past_the_end = repo.get_recipes(5, 2, RecipeSort::NameAsc).await.unwrap();
        assert!(past_the_end.is_empty(), "{backend}");
    }
}

#[tokio::test]
async fn authors_and_categories_are_deduplicated_maps() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();

        let authors = repo.get_authors().await.unwrap();
        assert_eq!(authors.len(), 2, "{backend}");
        assert_eq!(authors[&1].name, "Chef John");
        assert_eq!(authors[&2].name, "Mary Berry");

        let categories = repo.get_categories().await.unwrap();
        assert_eq!(categories.len(), 2, "{backend}");
        // Category ids follow first-seen order in the corpus
        assert_eq!(categories["Dessert"].id, 1, "{backend}");
        assert_eq!(categories["Main Course"].id, 2, "{backend}");
    }
}

#[tokio::test]
async fn nutrition_is_keyed_by_recipe_and_optional() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();

        let cake = repo.get_nutrition_by_recipe_id(1).await.unwrap().unwrap();
        assert_eq!(cake.sugar, Some(25.0), "{backend}");
        assert_eq!(cake.calories, None);

        let salad = repo.get_nutrition_by_recipe_id(3).await.unwrap().unwrap();
        assert_eq!(salad.protein, None);

        assert!(repo.get_nutrition_by_recipe_id(999).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn healthy_selection_and_nutrition_ordering() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();

        // Cake scores 0.5, stew and salad 5.0
        let healthy = repo.get_healthy_recipes(3.5).await.unwrap();
        assert_eq!(
            healthy.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3],
            "{backend}"
        );

        let descending = repo.get_recipes_sorted_by_nutrition(true).await.unwrap();
        assert_eq!(
            descending.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3, 1],
            "{backend}"
        );

        let ascending = repo.get_recipes_sorted_by_nutrition(false).await.unwrap();
        assert_eq!(
            ascending.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3],
            "{backend}"
        );
    }
}

#[tokio::test]
async fn reviews_update_the_running_average_rating() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();
        let when = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let first = repo
            .add_review(&NewReview {
                username: "alice".into(),
                recipe_id: 2,
                rating: 5,
                body: "Rich and hearty".into(),
                created_at: when,
            })
            .await
            .unwrap();
        assert_eq!(first.id, 1, "{backend}");

        let second = repo
            .add_review(&NewReview {
                username: "bob".into(),
                recipe_id: 2,
                rating: 2,
                body: "Too salty".into(),
                created_at: when,
            })
            .await
            .unwrap();
        assert_eq!(second.id, 2, "{backend}");

        let stew = repo.get_recipe_by_id(2).await.unwrap().unwrap();
        assert_eq!(stew.rating, Some(3.5), "{backend}");
        assert_eq!(stew.reviews.len(), 2);

        let alice = repo.get_user("alice").await.unwrap().unwrap();
        assert_eq!(alice.reviews.len(), 1, "{backend}");

        repo.remove_review(second.id).await.unwrap();
        let stew = repo.get_recipe_by_id(2).await.unwrap().unwrap();
        assert_eq!(stew.rating, Some(5.0), "{backend}");
        assert_eq!(stew.reviews.len(), 1);

        repo.remove_review(first.id).await.unwrap();
        let stew = repo.get_recipe_by_id(2).await.unwrap().unwrap();
        assert_eq!(stew.rating, None, "{backend}");
    }
}

#[tokio::test]
async fn favourite_uniqueness_holds_per_user_and_recipe() {
    for repo in common::seeded_backends().await {
        let backend = repo.backend_info();
        let favourite = NewFavourite {
            username: "alice".into(),
            recipe_id: 3,
        };

        let stored = repo.add_favorite_recipe(&favourite).await.unwrap();
        let duplicate = repo.add_favorite_recipe(&favourite).await.unwrap();
        assert_eq!(stored.id, duplicate.id, "{backend}");

        let favourites = repo.get_user_favorites("alice").await.unwrap();
        assert_eq!(favourites.len(), 1, "{backend}");

        // Same recipe for another user is a distinct favourite
        repo.add_favorite_recipe(&NewFavourite {
            username: "bob".into(),
            recipe_id: 3,
        })
        .await
        .unwrap();
        assert_eq!(repo.get_user_favorites("bob").await.unwrap().len(), 1);

        repo.remove_favorite_recipe("alice", 3).await.unwrap();
        assert!(repo.get_user_favorites("alice").await.unwrap().is_empty(), "{backend}");
        assert_eq!(repo.get_user_favorites("bob").await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn sqlite_state_survives_reopening_the_database() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("recipes.db").display());

    {
        let repo = Repository::new(&url).await.unwrap();
        common::seed(&repo).await;
    }

    let reopened = Repository::new(&url).await.unwrap();
    assert_eq!(reopened.get_all_recipes().await.unwrap().len(), 3);
    assert!(reopened.get_user("alice").await.unwrap().is_some());
    assert_eq!(
        reopened
            .get_nutrition_by_recipe_id(1)
            .await
            .unwrap()
            .unwrap()
            .sugar,
        Some(25.0)
    );
}

#[tokio::test]
async fn backends_agree_on_an_identical_operation_sequence() {
    let backends = common::seeded_backends().await;
    let when = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();

    for repo in &backends {
        repo.add_review(&NewReview {
            username: "alice".into(),
            recipe_id: 1,
            rating: 4,
            body: "Decadent".into(),
            created_at: when,
        })
        .await
        .unwrap();
        repo.add_favorite_recipe(&NewFavourite {
            username: "bob".into(),
            recipe_id: 1,
        })
        .await
        .unwrap();
    }

    let mut observed = Vec::new();
    for repo in &backends {
        let listing = repo.get_recipes(1, 10, RecipeSort::NameAsc).await.unwrap();
        let cake = repo.get_recipe_by_id(1).await.unwrap().unwrap();
        let bob = repo.get_user("bob").await.unwrap().unwrap();
        observed.push((listing, cake, bob));
    }

    let (first_listing, first_cake, first_bob) = &observed[0];
    for (listing, cake, bob) in &observed[1..] {
        assert_eq!(listing, first_listing);
        assert_eq!(cake, first_cake);
        assert_eq!(bob, first_bob);
    }
}
