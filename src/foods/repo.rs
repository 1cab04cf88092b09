use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Food, FoodInput};

#[async_trait]
pub trait FoodRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Food>>;
    /// Case-insensitive substring match on the name, ordered by name.
    async fn search(&self, name: Option<&str>) -> anyhow::Result<Vec<Food>>;
    async fn create(&self, input: &FoodInput) -> anyhow::Result<Food>;
    async fn update(&self, id: Uuid, input: &FoodInput) -> anyhow::Result<Option<Food>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgFoodRepo {
    db: PgPool,
}

impl PgFoodRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodRepo for PgFoodRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, name, calories, protein, carbohydrates, fat, created_at
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find food")?;
        Ok(food)
    }

    async fn search(&self, name: Option<&str>) -> anyhow::Result<Vec<Food>> {
        let pattern = name.map(|n| format!("%{}%", n.trim()));
        let rows = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, name, calories, protein, carbohydrates, fat, created_at
            FROM foods
            WHERE $1::text IS NULL OR name ILIKE $1
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.db)
        .await
        .context("search foods")?;
        Ok(rows)
    }

    async fn create(&self, input: &FoodInput) -> anyhow::Result<Food> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            INSERT INTO foods (name, calories, protein, carbohydrates, fat)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, calories, protein, carbohydrates, fat, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.calories)
        .bind(input.protein)
        .bind(input.carbohydrates)
        .bind(input.fat)
        .fetch_one(&self.db)
        .await
        .context("insert food")?;
        Ok(food)
    }

    async fn update(&self, id: Uuid, input: &FoodInput) -> anyhow::Result<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            UPDATE foods
               SET name = $2, calories = $3, protein = $4, carbohydrates = $5, fat = $6
             WHERE id = $1
            RETURNING id, name, calories, protein, carbohydrates, fat, created_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.calories)
        .bind(input.protein)
        .bind(input.carbohydrates)
        .bind(input.fat)
        .fetch_optional(&self.db)
        .await
        .context("update food")?;
        Ok(food)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM foods WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete food")?;
        Ok(res.rows_affected() > 0)
    }
}
