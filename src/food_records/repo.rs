use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::{aggregator::RecordSnapshot, repo_types::FoodRecord};

#[async_trait]
pub trait FoodRecordRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FoodRecord>>;
    async fn find_by_meal(&self, meal_record_id: Uuid) -> anyhow::Result<Vec<FoodRecord>>;
    /// Records of every meal the user logged on `date`.
    async fn find_by_user_and_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<FoodRecord>>;
    async fn create(&self, meal_record_id: Uuid, food_id: Uuid, snap: &RecordSnapshot) -> anyhow::Result<FoodRecord>;
    async fn update(&self, id: Uuid, snap: &RecordSnapshot) -> anyhow::Result<Option<FoodRecord>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Number of records referencing the food.
    async fn count_by_food(&self, food_id: Uuid) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgFoodRecordRepo {
    db: PgPool,
}

impl PgFoodRecordRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodRecordRepo for PgFoodRecordRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FoodRecord>> {
        let rec = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, meal_record_id, food_id, food_name, quantity, unit,
                   calories, protein, carbohydrates, fat, created_at, updated_at
            FROM food_records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find food record")?;
        Ok(rec)
    }

    async fn find_by_meal(&self, meal_record_id: Uuid) -> anyhow::Result<Vec<FoodRecord>> {
        let rows = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, meal_record_id, food_id, food_name, quantity, unit,
                   calories, protein, carbohydrates, fat, created_at, updated_at
            FROM food_records
            WHERE meal_record_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(meal_record_id)
        .fetch_all(&self.db)
        .await
        .context("list food records of meal")?;
        Ok(rows)
    }

    async fn find_by_user_and_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<FoodRecord>> {
        let rows = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT fr.id, fr.meal_record_id, fr.food_id, fr.food_name, fr.quantity, fr.unit,
                   fr.calories, fr.protein, fr.carbohydrates, fr.fat, fr.created_at, fr.updated_at
            FROM food_records fr
            JOIN meal_records mr ON mr.id = fr.meal_record_id
            WHERE mr.user_id = $1 AND mr.date = $2
            ORDER BY mr.meal_type, fr.created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await
        .context("list food records by date")?;
        Ok(rows)
    }

    async fn create(&self, meal_record_id: Uuid, food_id: Uuid, snap: &RecordSnapshot) -> anyhow::Result<FoodRecord> {
        let rec = sqlx::query_as::<_, FoodRecord>(
            r#"
            INSERT INTO food_records
                (meal_record_id, food_id, food_name, quantity, unit, calories, protein, carbohydrates, fat)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, meal_record_id, food_id, food_name, quantity, unit,
                      calories, protein, carbohydrates, fat, created_at, updated_at
            "#,
        )
        .bind(meal_record_id)
        .bind(food_id)
        .bind(&snap.food_name)
        .bind(snap.quantity)
        .bind(&snap.unit)
        .bind(snap.nutrients.calories)
        .bind(snap.nutrients.protein)
        .bind(snap.nutrients.carbohydrates)
        .bind(snap.nutrients.fat)
        .fetch_one(&self.db)
        .await
        .context("insert food record")?;
        Ok(rec)
    }

    async fn update(&self, id: Uuid, snap: &RecordSnapshot) -> anyhow::Result<Option<FoodRecord>> {
        let rec = sqlx::query_as::<_, FoodRecord>(
            r#"
            UPDATE food_records
               SET food_name = $2, quantity = $3, unit = $4,
                   calories = $5, protein = $6, carbohydrates = $7, fat = $8,
                   updated_at = now()
             WHERE id = $1
            RETURNING id, meal_record_id, food_id, food_name, quantity, unit,
                      calories, protein, carbohydrates, fat, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&snap.food_name)
        .bind(snap.quantity)
        .bind(&snap.unit)
        .bind(snap.nutrients.calories)
        .bind(snap.nutrients.protein)
        .bind(snap.nutrients.carbohydrates)
        .bind(snap.nutrients.fat)
        .fetch_optional(&self.db)
        .await
        .context("update food record")?;
        Ok(rec)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM food_records WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete food record")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count_by_food(&self, food_id: Uuid) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM food_records WHERE food_id = $1")
            .bind(food_id)
            .fetch_one(&self.db)
            .await
            .context("count food records of food")?;
        Ok(count)
    }
}
