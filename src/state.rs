use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::AppConfig,
    food_records::repo::{FoodRecordRepo, PgFoodRecordRepo},
    foods::repo::{FoodRepo, PgFoodRepo},
    goals::repo::{GoalRepo, PgGoalRepo},
    meals::repo::{MealRepo, PgMealRepo},
    users::repo::{PgUserRepo, UserRepo},
};

/// Shared by every handler. Services are built from it per request via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub foods: Arc<dyn FoodRepo>,
    pub meals: Arc<dyn MealRepo>,
    pub food_records: Arc<dyn FoodRecordRepo>,
    pub goals: Arc<dyn GoalRepo>,
}

impl AppState {
    pub fn postgres(db: PgPool, config: Arc<AppConfig>) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepo::new(db.clone())),
            foods: Arc::new(PgFoodRepo::new(db.clone())),
            meals: Arc::new(PgMealRepo::new(db.clone())),
            food_records: Arc::new(PgFoodRecordRepo::new(db.clone())),
            goals: Arc::new(PgGoalRepo::new(db)),
        }
    }

    #[cfg(test)]
    pub fn in_memory(config: AppConfig) -> Self {
        let store = crate::test_support::MemoryStore::new();
        Self {
            config: Arc::new(config),
            users: store.clone(),
            foods: store.clone(),
            meals: store.clone(),
            food_records: store.clone(),
            goals: store,
        }
    }
}
