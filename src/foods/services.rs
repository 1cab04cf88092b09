use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    repo::FoodRepo,
    repo_types::{Food, FoodInput},
};
use crate::{
    error::{AppError, AppResult},
    food_records::repo::FoodRecordRepo,
    state::AppState,
};

const MAX_NAME_LEN: usize = 100;

fn validate(input: &mut FoodInput) -> AppResult<()> {
    input.name = input.name.trim().to_string();
    if input.name.is_empty() {
        return Err(AppError::validation("name is required"));
    }
    if input.name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation("name is too long"));
    }
    for (field, value) in [
        ("calories", input.calories),
        ("protein", input.protein),
        ("carbohydrates", input.carbohydrates),
        ("fat", input.fat),
    ] {
        if !(value >= 0.0) || !value.is_finite() {
            return Err(AppError::validation(format!("{field} must not be negative")));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct FoodService {
    foods: Arc<dyn FoodRepo>,
    food_records: Arc<dyn FoodRecordRepo>,
}

impl FromRef<AppState> for FoodService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.foods.clone(), state.food_records.clone())
    }
}

impl FoodService {
    pub fn new(foods: Arc<dyn FoodRepo>, food_records: Arc<dyn FoodRecordRepo>) -> Self {
        Self { foods, food_records }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, name: Option<&str>) -> AppResult<Vec<Food>> {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        Ok(self.foods.search(name).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> AppResult<Food> {
        self.foods
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("food not found"))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, mut input: FoodInput) -> AppResult<Food> {
        validate(&mut input)?;
        let food = self.foods.create(&input).await?;
        info!(food_id = %food.id, "food created");
        Ok(food)
    }

    /// Existing food records keep the snapshot they were written with.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, mut input: FoodInput) -> AppResult<Food> {
        validate(&mut input)?;
        let food = self
            .foods
            .update(id, &input)
            .await?
            .ok_or_else(|| AppError::not_found("food not found"))?;
        info!(food_id = %food.id, "food updated");
        Ok(food)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await?;
        let refs = self.food_records.count_by_food(id).await?;
        if refs > 0 {
            warn!(food_id = %id, refs, "refusing to delete referenced food");
            return Err(AppError::conflict("food is referenced by food records"));
        }
        if !self.foods.delete(id).await? {
            return Err(AppError::not_found("food not found"));
        }
        info!(food_id = %id, "food deleted");
        Ok(())
    }
}
