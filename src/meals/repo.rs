use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::{meal_type::MealType, repo_types::MealRecord};

/// Outcome of moving a meal to another (date, meal_type).
#[derive(Debug)]
pub enum MealUpdate {
    Updated(MealRecord),
    /// Another record of the same user already holds the slot.
    Taken,
    /// The row was gone by the time the update ran.
    Missing,
}

#[async_trait]
pub trait MealRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<MealRecord>>;
    /// All of a user's meals on `date`, breakfast first.
    async fn find_by_user_and_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<MealRecord>>;
    async fn find_by_user_date_and_type(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: MealType,
    ) -> anyhow::Result<Option<MealRecord>>;
    /// `None` when (user, date, meal_type) is already taken.
    async fn create(&self, user_id: Uuid, date: Date, meal_type: MealType) -> anyhow::Result<Option<MealRecord>>;
    async fn update(&self, id: Uuid, date: Date, meal_type: MealType) -> anyhow::Result<MealUpdate>;
    /// Removes the meal together with its food records; `false` if it did not exist.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<MealRecord>> {
        let meal = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, user_id, date, meal_type, created_at, updated_at
            FROM meal_records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find meal record")?;
        Ok(meal)
    }

    async fn find_by_user_and_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<MealRecord>> {
        let rows = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, user_id, date, meal_type, created_at, updated_at
            FROM meal_records
            WHERE user_id = $1 AND date = $2
            ORDER BY meal_type
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await
        .context("list meal records by date")?;
        Ok(rows)
    }

    async fn find_by_user_date_and_type(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: MealType,
    ) -> anyhow::Result<Option<MealRecord>> {
        let meal = sqlx::query_as::<_, MealRecord>(
            r#"
            SELECT id, user_id, date, meal_type, created_at, updated_at
            FROM meal_records
            WHERE user_id = $1 AND date = $2 AND meal_type = $3
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type)
        .fetch_optional(&self.db)
        .await
        .context("find meal record by type")?;
        Ok(meal)
    }

    async fn create(&self, user_id: Uuid, date: Date, meal_type: MealType) -> anyhow::Result<Option<MealRecord>> {
        let meal = sqlx::query_as::<_, MealRecord>(
            r#"
            INSERT INTO meal_records (user_id, date, meal_type)
            VALUES ($1, $2, $3)
            ON CONFLICT ON CONSTRAINT meal_records_user_date_type_key DO NOTHING
            RETURNING id, user_id, date, meal_type, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(meal_type)
        .fetch_optional(&self.db)
        .await
        .context("insert meal record")?;
        Ok(meal)
    }

    async fn update(&self, id: Uuid, date: Date, meal_type: MealType) -> anyhow::Result<MealUpdate> {
        let res = sqlx::query_as::<_, MealRecord>(
            r#"
            UPDATE meal_records
               SET date = $2, meal_type = $3, updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, date, meal_type, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(meal_type)
        .fetch_optional(&self.db)
        .await;

        match res {
            Ok(Some(meal)) => Ok(MealUpdate::Updated(meal)),
            Ok(None) => Ok(MealUpdate::Missing),
            Err(e) if is_unique_violation(&e) => Ok(MealUpdate::Taken),
            Err(e) => Err(e).context("update meal record"),
        }
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("DELETE FROM food_records WHERE meal_record_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete food records of meal")?;
        let res = sqlx::query("DELETE FROM meal_records WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("delete meal record")?;
        tx.commit().await.context("commit tx")?;
        Ok(res.rows_affected() > 0)
    }
}
