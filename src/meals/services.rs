use std::sync::Arc;

use axum::extract::FromRef;
use time::Date;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateMealRequest, MealDetails, UpdateMealRequest},
    repo::{MealRepo, MealUpdate},
    repo_types::MealRecord,
};
use crate::{
    error::{AppError, AppResult},
    food_records::repo::FoodRecordRepo,
    state::AppState,
    users::repo::UserRepo,
};

const DUPLICATE_MEAL: &str = "record already exists";

/// Loads a meal and checks it belongs to `user_id`.
pub async fn load_owned_meal(meals: &dyn MealRepo, id: Uuid, user_id: Uuid) -> AppResult<MealRecord> {
    let meal = meals
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("meal record not found"))?;
    if meal.user_id != user_id {
        warn!(meal_id = %id, user_id = %user_id, "meal record owned by another user");
        return Err(AppError::forbidden("no permission to access this meal record"));
    }
    Ok(meal)
}

#[derive(Clone)]
pub struct MealService {
    meals: Arc<dyn MealRepo>,
    food_records: Arc<dyn FoodRecordRepo>,
    users: Arc<dyn UserRepo>,
}

impl FromRef<AppState> for MealService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.meals.clone(), state.food_records.clone(), state.users.clone())
    }
}

impl MealService {
    pub fn new(meals: Arc<dyn MealRepo>, food_records: Arc<dyn FoodRecordRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self {
            meals,
            food_records,
            users,
        }
    }

    #[instrument(skip(self, req), fields(meal_type = %req.meal_type))]
    pub async fn create(&self, user_id: Uuid, req: CreateMealRequest) -> AppResult<MealRecord> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("user not found"));
        }

        if self
            .meals
            .find_by_user_date_and_type(user_id, req.record_date, req.meal_type)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(DUPLICATE_MEAL));
        }

        // a concurrent insert can still win the race; the unique index turns it into None
        let meal = self
            .meals
            .create(user_id, req.record_date, req.meal_type)
            .await?
            .ok_or_else(|| AppError::conflict(DUPLICATE_MEAL))?;

        info!(meal_id = %meal.id, date = %meal.date, "meal record created");
        Ok(meal)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<MealDetails> {
        let meal = load_owned_meal(self.meals.as_ref(), id, user_id).await?;
        let records = self.food_records.find_by_meal(meal.id).await?;
        Ok(MealDetails::new(meal, records))
    }

    #[instrument(skip(self))]
    pub async fn list_by_date(&self, user_id: Uuid, date: Date) -> AppResult<Vec<MealRecord>> {
        Ok(self.meals.find_by_user_and_date(user_id, date).await?)
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, user_id: Uuid, id: Uuid, req: UpdateMealRequest) -> AppResult<MealRecord> {
        let current = load_owned_meal(self.meals.as_ref(), id, user_id).await?;
        let date = req.record_date.unwrap_or(current.date);
        let meal_type = req.meal_type.unwrap_or(current.meal_type);

        if date == current.date && meal_type == current.meal_type {
            return Ok(current);
        }

        if let Some(other) = self.meals.find_by_user_date_and_type(user_id, date, meal_type).await? {
            if other.id != current.id {
                return Err(AppError::conflict(DUPLICATE_MEAL));
            }
        }

        let meal = match self.meals.update(id, date, meal_type).await? {
            MealUpdate::Updated(meal) => meal,
            MealUpdate::Taken => return Err(AppError::conflict(DUPLICATE_MEAL)),
            MealUpdate::Missing => return Err(AppError::not_found("meal record not found")),
        };

        info!(meal_id = %meal.id, "meal record updated");
        Ok(meal)
    }

    /// Deletes the meal and, with it, all of its food records.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        load_owned_meal(self.meals.as_ref(), id, user_id).await?;
        if !self.meals.delete(id).await? {
            return Err(AppError::not_found("meal record not found"));
        }
        info!(meal_id = %id, "meal record deleted");
        Ok(())
    }
}
