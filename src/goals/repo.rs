use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{calculator::MacroTargets, repo_types::NutritionGoal};

#[async_trait]
pub trait GoalRepo: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<NutritionGoal>>;
    async fn create(&self, user_id: Uuid, targets: &MacroTargets) -> anyhow::Result<NutritionGoal>;
    /// Overwrites all four targets of an existing goal.
    async fn update(&self, goal_id: Uuid, targets: &MacroTargets) -> anyhow::Result<NutritionGoal>;
}

#[derive(Clone)]
pub struct PgGoalRepo {
    db: PgPool,
}

impl PgGoalRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GoalRepo for PgGoalRepo {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<NutritionGoal>> {
        let goal = sqlx::query_as::<_, NutritionGoal>(
            r#"
            SELECT id, user_id, calories, protein, carbohydrates, fat, created_at, updated_at
            FROM nutrition_goals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find goal by user")?;
        Ok(goal)
    }

    async fn create(&self, user_id: Uuid, targets: &MacroTargets) -> anyhow::Result<NutritionGoal> {
        // the unique index on user_id turns a concurrent duplicate into an overwrite
        let goal = sqlx::query_as::<_, NutritionGoal>(
            r#"
            INSERT INTO nutrition_goals (user_id, calories, protein, carbohydrates, fat)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
               SET calories = EXCLUDED.calories,
                   protein = EXCLUDED.protein,
                   carbohydrates = EXCLUDED.carbohydrates,
                   fat = EXCLUDED.fat,
                   updated_at = now()
            RETURNING id, user_id, calories, protein, carbohydrates, fat, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(targets.calories)
        .bind(targets.protein)
        .bind(targets.carbohydrates)
        .bind(targets.fat)
        .fetch_one(&self.db)
        .await
        .context("insert goal")?;
        Ok(goal)
    }

    async fn update(&self, goal_id: Uuid, targets: &MacroTargets) -> anyhow::Result<NutritionGoal> {
        let goal = sqlx::query_as::<_, NutritionGoal>(
            r#"
            UPDATE nutrition_goals
               SET calories = $2, protein = $3, carbohydrates = $4, fat = $5, updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, calories, protein, carbohydrates, fat, created_at, updated_at
            "#,
        )
        .bind(goal_id)
        .bind(targets.calories)
        .bind(targets.protein)
        .bind(targets.carbohydrates)
        .bind(targets.fat)
        .fetch_one(&self.db)
        .await
        .context("update goal")?;
        Ok(goal)
    }
}
