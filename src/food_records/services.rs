use std::sync::Arc;

use axum::extract::FromRef;
use time::Date;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    aggregator::{Nutrients, RecordSnapshot},
    dto::{CreateFoodRecordRequest, DailySummary, UpdateFoodRecordRequest},
    repo::FoodRecordRepo,
    repo_types::FoodRecord,
};
use crate::{
    error::{AppError, AppResult},
    foods::{repo::FoodRepo, repo_types::Food},
    goals::repo::GoalRepo,
    meals::{repo::MealRepo, services::load_owned_meal},
    state::AppState,
};

const MAX_UNIT_LEN: usize = 20;

fn check_quantity(quantity: f64) -> AppResult<()> {
    if !(quantity > 0.0) || !quantity.is_finite() {
        return Err(AppError::validation("quantity must be positive"));
    }
    Ok(())
}

fn check_unit(unit: &str) -> AppResult<&str> {
    let unit = unit.trim();
    if unit.is_empty() {
        return Err(AppError::validation("unit is required"));
    }
    if unit.chars().count() > MAX_UNIT_LEN {
        return Err(AppError::validation("unit is too long"));
    }
    Ok(unit)
}

#[derive(Clone)]
pub struct FoodRecordService {
    records: Arc<dyn FoodRecordRepo>,
    meals: Arc<dyn MealRepo>,
    foods: Arc<dyn FoodRepo>,
    goals: Arc<dyn GoalRepo>,
}

impl FromRef<AppState> for FoodRecordService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(
            state.food_records.clone(),
            state.meals.clone(),
            state.foods.clone(),
            state.goals.clone(),
        )
    }
}

impl FoodRecordService {
    pub fn new(
        records: Arc<dyn FoodRecordRepo>,
        meals: Arc<dyn MealRepo>,
        foods: Arc<dyn FoodRepo>,
        goals: Arc<dyn GoalRepo>,
    ) -> Self {
        Self {
            records,
            meals,
            foods,
            goals,
        }
    }

    #[instrument(skip(self, req), fields(meal_id = %req.meal_record_id, food_id = %req.food_id))]
    pub async fn create(&self, user_id: Uuid, req: CreateFoodRecordRequest) -> AppResult<FoodRecord> {
        check_quantity(req.quantity)?;
        let unit = check_unit(&req.unit)?;

        let meal = load_owned_meal(self.meals.as_ref(), req.meal_record_id, user_id).await?;
        let food = self.load_food(req.food_id).await?;

        let snap = RecordSnapshot::take(&food, req.quantity, unit);
        let record = self.records.create(meal.id, food.id, &snap).await?;

        info!(record_id = %record.id, calories = record.calories, "food record created");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<FoodRecord> {
        self.load_owned_record(id, user_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_meal(&self, user_id: Uuid, meal_id: Uuid) -> AppResult<Vec<FoodRecord>> {
        let meal = load_owned_meal(self.meals.as_ref(), meal_id, user_id).await?;
        Ok(self.records.find_by_meal(meal.id).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_by_date(&self, user_id: Uuid, date: Date) -> AppResult<Vec<FoodRecord>> {
        Ok(self.records.find_by_user_and_date(user_id, date).await?)
    }

    /// Sums the day's records and compares them with the goal, when one is set.
    #[instrument(skip(self))]
    pub async fn summary(&self, user_id: Uuid, date: Date) -> AppResult<DailySummary> {
        let records = self.records.find_by_user_and_date(user_id, date).await?;
        let totals: Nutrients = records.iter().map(FoodRecord::nutrients).sum();
        let goal = self.goals.find_by_user(user_id).await?.map(|g| Nutrients::from_goal(&g));
        let remaining = goal.map(|g| g.remaining(&totals));

        debug!(records = records.len(), calories = totals.calories, "daily summary computed");
        Ok(DailySummary {
            date,
            record_count: records.len(),
            totals,
            goal,
            remaining,
        })
    }

    /// Replaces the quantity and recomputes nutrients from the food as it is now.
    #[instrument(skip(self, req))]
    pub async fn update(&self, user_id: Uuid, id: Uuid, req: UpdateFoodRecordRequest) -> AppResult<FoodRecord> {
        check_quantity(req.quantity)?;
        let current = self.load_owned_record(id, user_id).await?;
        let unit = match req.unit.as_deref() {
            Some(u) => check_unit(u)?,
            None => current.unit.as_str(),
        };
        let food = self.load_food(current.food_id).await?;

        let snap = RecordSnapshot::take(&food, req.quantity, unit);
        let record = self
            .records
            .update(id, &snap)
            .await?
            .ok_or_else(|| AppError::not_found("food record not found"))?;

        info!(record_id = %record.id, calories = record.calories, "food record updated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        self.load_owned_record(id, user_id).await?;
        if !self.records.delete(id).await? {
            return Err(AppError::not_found("food record not found"));
        }
        info!(record_id = %id, "food record deleted");
        Ok(())
    }

    async fn load_owned_record(&self, id: Uuid, user_id: Uuid) -> AppResult<FoodRecord> {
        let record = self
            .records
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("food record not found"))?;
        load_owned_meal(self.meals.as_ref(), record.meal_record_id, user_id).await?;
        Ok(record)
    }

    async fn load_food(&self, id: Uuid) -> AppResult<Food> {
        self.foods
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("food not found"))
    }
}
