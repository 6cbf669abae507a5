// ABOUTME: SQLite repository backend over sqlx with hand-written migrations
// ABOUTME: One transaction per mutating operation, committed on success
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Ladle Project

//! SQLite repository backend
//!
//! The schema is created by [`SqliteRepository::migrate`]; recipes are
//! normalized across `recipes`, `recipe_ingredients`, `recipe_instructions`
//! and `recipe_images` and reassembled into [`Recipe`] values on read.
//! Mutations that touch more than one row run inside a single transaction;
//! an error before commit rolls the whole operation back.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::{normalize_paging, RecipeRepository};
use crate::models::{
    Author, Category, Favourite, NewFavourite, NewReview, Nutrition, Recipe, RecipeSort, Review,
    User,
};
use crate::scoring;

const RECIPE_SELECT: &str = r"
    SELECT r.id, r.name, r.rating,
           a.id AS author_id, a.name AS author_name,
           c.id AS category_id, c.name AS category_name
    FROM recipes r
    JOIN authors a ON a.id = r.author_id
    JOIN categories c ON c.name = r.category_name
";

/// SQLite repository backend
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open a connection pool for the given `sqlite:` URL.
    ///
    /// In-memory databases are pinned to a single pooled connection that is
    /// never reaped, otherwise every checkout would see a fresh empty
    /// database. File-backed databases are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(database_url)
                .await?
        } else {
            SqlitePool::connect(&format!("{database_url}?mode=rwc")).await?
        };
        Ok(Self { pool })
    }

    /// Create the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if any DDL statement fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS authors (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS categories (
                name TEXT PRIMARY KEY,
                id INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES authors(id),
                category_name TEXT NOT NULL REFERENCES categories(name),
                rating REAL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                ingredient TEXT NOT NULL,
                quantity TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (recipe_id, position)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_instructions (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                step TEXT NOT NULL,
                PRIMARY KEY (recipe_id, position)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_images (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                url TEXT NOT NULL,
                PRIMARY KEY (recipe_id, position)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS nutrition (
                recipe_id INTEGER PRIMARY KEY REFERENCES recipes(id) ON DELETE CASCADE,
                calories REAL,
                fat REAL,
                saturated_fat REAL,
                cholesterol REAL,
                sodium REAL,
                carbohydrates REAL,
                fiber REAL,
                sugar REAL,
                protein REAL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL REFERENCES users(username),
                recipe_id INTEGER NOT NULL REFERENCES recipes(id),
                rating INTEGER NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS favourites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL REFERENCES users(username),
                recipe_id INTEGER NOT NULL REFERENCES recipes(id),
                UNIQUE (username, recipe_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_recipe ON reviews(recipe_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(username)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name COLLATE NOCASE)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Reassemble a recipe from its joined header row and child tables.
    async fn load_recipe(&self, row: &SqliteRow, with_reviews: bool) -> Result<Recipe> {
        let id: i64 = row.try_get("id")?;
        let author = Author::new(row.try_get("author_id")?, row.try_get("author_name")?);
        let category = Category::new(row.try_get("category_id")?, row.try_get("category_name")?);

        let mut recipe = Recipe::new(id, row.try_get("name")?, author, category);
        recipe.rating = row.try_get("rating")?;

        let ingredient_rows = sqlx::query(
            "SELECT ingredient, quantity FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        for child in &ingredient_rows {
            recipe.ingredients.push(child.try_get("ingredient")?);
            recipe.ingredient_quantities.push(child.try_get("quantity")?);
        }

        let instruction_rows = sqlx::query(
            "SELECT step FROM recipe_instructions WHERE recipe_id = ?1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        for child in &instruction_rows {
            recipe.instructions.push(child.try_get("step")?);
        }

        let image_rows =
            sqlx::query("SELECT url FROM recipe_images WHERE recipe_id = ?1 ORDER BY position")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
        for child in &image_rows {
            recipe.images.push(child.try_get("url")?);
        }

        if with_reviews {
            recipe.reviews = self.reviews_for_recipe(id).await?;
        }

        Ok(recipe)
    }

    async fn reviews_for_recipe(&self, recipe_id: i64) -> Result<Vec<Review>> {
        let rows = sqlx::query(
            "SELECT id, username, recipe_id, rating, body, created_at FROM reviews WHERE recipe_id = ?1 ORDER BY id",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(review_from_row).collect()
    }

    async fn all_nutrition(&self) -> Result<HashMap<i64, Nutrition>> {
        let rows = sqlx::query(
            "SELECT recipe_id, calories, fat, saturated_fat, cholesterol, sodium, carbohydrates, fiber, sugar, protein FROM nutrition",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut map = HashMap::with_capacity(rows.len());
        for row in &rows {
            let nutrition = nutrition_from_row(row)?;
            map.insert(nutrition.recipe_id, nutrition);
        }
        Ok(map)
    }
}

fn review_from_row(row: &SqliteRow) -> Result<Review> {
    Ok(Review {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        recipe_id: row.try_get("recipe_id")?,
        rating: row.try_get("rating")?,
        body: row.try_get("body")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn nutrition_from_row(row: &SqliteRow) -> Result<Nutrition> {
    Ok(Nutrition {
        recipe_id: row.try_get("recipe_id")?,
        calories: row.try_get("calories")?,
        fat: row.try_get("fat")?,
        saturated_fat: row.try_get("saturated_fat")?,
        cholesterol: row.try_get("cholesterol")?,
        sodium: row.try_get("sodium")?,
        carbohydrates: row.try_get("carbohydrates")?,
        fiber: row.try_get("fiber")?,
        sugar: row.try_get("sugar")?,
        protein: row.try_get("protein")?,
    })
}

fn favourite_from_row(row: &SqliteRow) -> Result<Favourite> {
    Ok(Favourite {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        recipe_id: row.try_get("recipe_id")?,
    })
}

#[async_trait]
impl RecipeRepository for SqliteRepository {
    async fn add_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO users (username, password_hash) VALUES (?1, ?2)
            ON CONFLICT(username) DO UPDATE SET password_hash = excluded.password_hash
            ",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT username, password_hash FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut user = User::new(row.try_get("username")?, row.try_get("password_hash")?);

        let review_rows = sqlx::query(
            "SELECT id, username, recipe_id, rating, body, created_at FROM reviews WHERE username = ?1 ORDER BY id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;
        user.reviews = review_rows.iter().map(review_from_row).collect::<Result<_>>()?;

        user.favourites = self.get_user_favorites(username).await?;
        Ok(Some(user))
    }

    async fn add_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Register referenced author and category, first write wins
        sqlx::query("INSERT INTO authors (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO NOTHING")
            .bind(recipe.author.id)
            .bind(&recipe.author.name)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO categories (name, id) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
        )
        .bind(&recipe.category.name)
        .bind(recipe.category.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO recipes (id, name, author_id, category_name, rating)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                author_id = excluded.author_id,
                category_name = excluded.category_name,
                rating = excluded.rating
            ",
        )
        .bind(recipe.id)
        .bind(&recipe.name)
        .bind(recipe.author.id)
        .bind(&recipe.category.name)
        .bind(recipe.rating)
        .execute(&mut *tx)
        .await?;

        for table in [
            "recipe_ingredients",
            "recipe_instructions",
            "recipe_images",
        ] {
            let sql = format!("DELETE FROM {table} WHERE recipe_id = ?1");
            sqlx::query(&sql).bind(recipe.id).execute(&mut *tx).await?;
        }

        for (position, ingredient) in recipe.ingredients.iter().enumerate() {
            let quantity = recipe
                .ingredient_quantities
                .get(position)
                .map_or("", String::as_str);
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, position, ingredient, quantity) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(recipe.id)
            .bind(position as i64)
            .bind(ingredient)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }

        for (position, step) in recipe.instructions.iter().enumerate() {
            sqlx::query(
                "INSERT INTO recipe_instructions (recipe_id, position, step) VALUES (?1, ?2, ?3)",
            )
            .bind(recipe.id)
            .bind(position as i64)
            .bind(step)
            .execute(&mut *tx)
            .await?;
        }

        for (position, url) in recipe.images.iter().enumerate() {
            sqlx::query("INSERT INTO recipe_images (recipe_id, position, url) VALUES (?1, ?2, ?3)")
                .bind(recipe.id)
                .bind(position as i64)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        // A replaced recipe keeps its review-derived rating
        sqlx::query(
            r"
            UPDATE recipes SET rating = (SELECT AVG(rating) FROM reviews WHERE recipe_id = ?1)
            WHERE id = ?1 AND EXISTS (SELECT 1 FROM reviews WHERE recipe_id = ?1)
            ",
        )
        .bind(recipe.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_recipe_by_id(&self, recipe_id: i64) -> Result<Option<Recipe>> {
        let sql = format!("{RECIPE_SELECT} WHERE r.id = ?1");
        let row = sqlx::query(&sql)
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(self.load_recipe(&row, true).await?)),
            None => Ok(None),
        }
    }

    async fn get_recipes(
        &self,
        page: u32,
        page_size: u32,
        sort: RecipeSort,
    ) -> Result<Vec<Recipe>> {
        let (page, page_size) = normalize_paging(page, page_size);
        let order_by = match sort {
            RecipeSort::NameAsc => "r.name COLLATE NOCASE ASC, r.id ASC",
            RecipeSort::NameDesc => "r.name COLLATE NOCASE DESC, r.id ASC",
            RecipeSort::IdAsc => "r.id ASC",
            RecipeSort::IdDesc => "r.id DESC",
        };
        let sql = format!("{RECIPE_SELECT} ORDER BY {order_by} LIMIT ?1 OFFSET ?2");

        let rows = sqlx::query(&sql)
            .bind(i64::from(page_size))
            .bind(i64::from(page - 1) * i64::from(page_size))
            .fetch_all(&self.pool)
            .await?;

        let mut recipes = Vec::with_capacity(rows.len());
        for row in &rows {
            recipes.push(self.load_recipe(row, false).await?);
        }
        Ok(recipes)
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>> {
        let rows = sqlx::query(RECIPE_SELECT).fetch_all(&self.pool).await?;
        let mut recipes = Vec::with_capacity(rows.len());
        for row in &rows {
            recipes.push(self.load_recipe(row, false).await?);
        }
        Ok(recipes)
    }

    async fn get_authors(&self) -> Result<HashMap<i64, Author>> {
        let rows = sqlx::query("SELECT id, name FROM authors")
            .fetch_all(&self.pool)
            .await?;
        let mut authors = HashMap::with_capacity(rows.len());
        for row in &rows {
            let author = Author::new(row.try_get("id")?, row.try_get("name")?);
            authors.insert(author.id, author);
        }
        Ok(authors)
    }

    async fn get_categories(&self) -> Result<HashMap<String, Category>> {
        let rows = sqlx::query("SELECT name, id FROM categories")
            .fetch_all(&self.pool)
            .await?;
        let mut categories = HashMap::with_capacity(rows.len());
        for row in &rows {
            let category = Category::new(row.try_get("id")?, row.try_get("name")?);
            categories.insert(category.name.clone(), category);
        }
        Ok(categories)
    }

    async fn add_author(&self, author: &Author) -> Result<()> {
        sqlx::query(
            "INSERT INTO authors (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        )
        .bind(author.id)
        .bind(&author.name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_category(&self, category: &Category) -> Result<()> {
        sqlx::query(
            "INSERT INTO categories (name, id) VALUES (?1, ?2) ON CONFLICT(name) DO UPDATE SET id = excluded.id",
        )
        .bind(&category.name)
        .bind(category.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_nutrition(&self, nutrition: &Nutrition) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO nutrition (recipe_id, calories, fat, saturated_fat, cholesterol,
                                   sodium, carbohydrates, fiber, sugar, protein)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(recipe_id) DO UPDATE SET
                calories = excluded.calories,
                fat = excluded.fat,
                saturated_fat = excluded.saturated_fat,
                cholesterol = excluded.cholesterol,
                sodium = excluded.sodium,
                carbohydrates = excluded.carbohydrates,
                fiber = excluded.fiber,
                sugar = excluded.sugar,
                protein = excluded.protein
            ",
        )
        .bind(nutrition.recipe_id)
        .bind(nutrition.calories)
        .bind(nutrition.fat)
        .bind(nutrition.saturated_fat)
        .bind(nutrition.cholesterol)
        .bind(nutrition.sodium)
        .bind(nutrition.carbohydrates)
        .bind(nutrition.fiber)
        .bind(nutrition.sugar)
        .bind(nutrition.protein)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_nutrition_by_recipe_id(&self, recipe_id: i64) -> Result<Option<Nutrition>> {
        let row = sqlx::query(
            "SELECT recipe_id, calories, fat, saturated_fat, cholesterol, sodium, carbohydrates, fiber, sugar, protein FROM nutrition WHERE recipe_id = ?1",
        )
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(nutrition_from_row).transpose()
    }

    async fn get_healthy_recipes(&self, min_stars: f64) -> Result<Vec<Recipe>> {
        let recipes = self.get_all_recipes().await?;
        let nutrition = self.all_nutrition().await?;
        Ok(scoring::filter_healthy(&recipes, &nutrition, min_stars))
    }

    async fn get_recipes_sorted_by_nutrition(&self, descending: bool) -> Result<Vec<Recipe>> {
        let recipes = self.get_all_recipes().await?;
        let nutrition = self.all_nutrition().await?;
        Ok(scoring::sort_by_health_stars(&recipes, &nutrition, descending))
    }

    async fn add_review(&self, review: &NewReview) -> Result<Review> {
        let mut tx = self.pool.begin().await?;

        let user_exists = sqlx::query("SELECT 1 FROM users WHERE username = ?1")
            .bind(&review.username)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !user_exists {
            return Err(anyhow!("user {} was not found", review.username));
        }
        let recipe_exists = sqlx::query("SELECT 1 FROM recipes WHERE id = ?1")
            .bind(review.recipe_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !recipe_exists {
            return Err(anyhow!("recipe {} was not found", review.recipe_id));
        }

        let result = sqlx::query(
            "INSERT INTO reviews (username, recipe_id, rating, body, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&review.username)
        .bind(review.recipe_id)
        .bind(review.rating)
        .bind(&review.body)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await?;
        let review_id = result.last_insert_rowid();

        sqlx::query(
            "UPDATE recipes SET rating = (SELECT AVG(rating) FROM reviews WHERE recipe_id = ?1) WHERE id = ?1",
        )
        .bind(review.recipe_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Review {
            id: review_id,
            username: review.username.clone(),
            recipe_id: review.recipe_id,
            rating: review.rating,
            body: review.body.clone(),
            created_at: review.created_at,
        })
    }

    async fn remove_review(&self, review_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT recipe_id FROM reviews WHERE id = ?1")
            .bind(review_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(());
        };
        let recipe_id: i64 = row.try_get("recipe_id")?;

        sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE recipes SET rating = (SELECT AVG(rating) FROM reviews WHERE recipe_id = ?1) WHERE id = ?1",
        )
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn add_favorite_recipe(&self, favourite: &NewFavourite) -> Result<Favourite> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT OR IGNORE INTO favourites (username, recipe_id) VALUES (?1, ?2)")
            .bind(&favourite.username)
            .bind(favourite.recipe_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query(
            "SELECT id, username, recipe_id FROM favourites WHERE username = ?1 AND recipe_id = ?2",
        )
        .bind(&favourite.username)
        .bind(favourite.recipe_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| anyhow!("favourite insert did not persist"))?;

        tx.commit().await?;
        favourite_from_row(&row)
    }

    async fn remove_favorite_recipe(&self, username: &str, recipe_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM favourites WHERE username = ?1 AND recipe_id = ?2")
            .bind(username)
            .bind(recipe_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_user_favorites(&self, username: &str) -> Result<Vec<Favourite>> {
        let rows = sqlx::query(
            "SELECT id, username, recipe_id FROM favourites WHERE username = ?1 ORDER BY id",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(favourite_from_row).collect()
    }
}
