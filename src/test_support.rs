//! In-memory repositories and fixtures for unit and router tests.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    config::{AppConfig, JwtConfig},
    food_records::{aggregator::RecordSnapshot, repo::FoodRecordRepo, repo_types::FoodRecord},
    foods::{
        repo::FoodRepo,
        repo_types::{Food, FoodInput},
    },
    goals::{calculator::MacroTargets, repo::GoalRepo, repo_types::NutritionGoal},
    meals::{
        meal_type::MealType,
        repo::{MealRepo, MealUpdate},
        repo_types::MealRecord,
    },
    users::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    foods: Vec<Food>,
    meals: Vec<MealRecord>,
    food_records: Vec<FoodRecord>,
    goals: Vec<NutritionGoal>,
}

/// Mirrors the Postgres schema: unique keys, meal -> food record cascade and
/// the restrict on referenced foods.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://localhost/nutritrack_test".into(),
        max_connections: 1,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "nutritrack".into(),
            audience: "nutritrack-users".into(),
            ttl_minutes: 24 * 60,
        },
    }
}

pub fn sample_user(email: &str) -> User {
    let now = OffsetDateTime::now_utc();
    User {
        id: Uuid::new_v4(),
        email: email.into(),
        password_hash: "not-a-real-hash".into(),
        nickname: "Sample".into(),
        gender: 0,
        age: 0,
        height: 0.0,
        weight: 0.0,
        // column default
        activity_level: 3,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_user(store: &Arc<MemoryStore>, email: &str) -> User {
    UserRepo::create(
        &**store,
        NewUser {
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            nickname: "Tester".into(),
        },
    )
    .await
    .unwrap()
    .expect("fresh email")
}

pub async fn set_biometrics(
    store: &Arc<MemoryStore>,
    user_id: Uuid,
    gender: i32,
    age: i32,
    height: f64,
    weight: f64,
    activity_level: i32,
) {
    let mut user = UserRepo::find_by_id(&**store, user_id).await.unwrap().unwrap();
    user.gender = gender;
    user.age = age;
    user.height = height;
    user.weight = weight;
    user.activity_level = activity_level;
    UserRepo::update_profile(&**store, &user).await.unwrap();
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new_user: NewUser) -> anyhow::Result<Option<User>> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == new_user.email) {
            return Ok(None);
        }
        let mut user = sample_user(&new_user.email);
        user.password_hash = new_user.password_hash;
        user.nickname = new_user.nickname;
        t.users.push(user.clone());
        Ok(Some(user))
    }

    async fn update_profile(&self, user: &User) -> anyhow::Result<User> {
        let mut t = self.lock();
        let row = t
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| anyhow!("user {} not found", user.id))?;
        *row = User {
            updated_at: OffsetDateTime::now_utc(),
            ..user.clone()
        };
        Ok(row.clone())
    }
}

#[async_trait]
impl FoodRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Food>> {
        Ok(self.lock().foods.iter().find(|f| f.id == id).cloned())
    }

    async fn search(&self, name: Option<&str>) -> anyhow::Result<Vec<Food>> {
        let needle = name.map(|n| n.trim().to_lowercase());
        let mut found: Vec<Food> = self
            .lock()
            .foods
            .iter()
            .filter(|f| match &needle {
                Some(n) => f.name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn create(&self, input: &FoodInput) -> anyhow::Result<Food> {
        let food = Food {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            calories: input.calories,
            protein: input.protein,
            carbohydrates: input.carbohydrates,
            fat: input.fat,
            created_at: OffsetDateTime::now_utc(),
        };
        self.lock().foods.push(food.clone());
        Ok(food)
    }

    async fn update(&self, id: Uuid, input: &FoodInput) -> anyhow::Result<Option<Food>> {
        let mut t = self.lock();
        let Some(food) = t.foods.iter_mut().find(|f| f.id == id) else {
            return Ok(None);
        };
        food.name = input.name.clone();
        food.calories = input.calories;
        food.protein = input.protein;
        food.carbohydrates = input.carbohydrates;
        food.fat = input.fat;
        Ok(Some(food.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        if t.food_records.iter().any(|r| r.food_id == id) {
            return Err(anyhow!("food {id} is still referenced"));
        }
        let before = t.foods.len();
        t.foods.retain(|f| f.id != id);
        Ok(t.foods.len() < before)
    }
}

#[async_trait]
impl MealRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<MealRecord>> {
        Ok(self.lock().meals.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_user_and_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<MealRecord>> {
        let mut meals: Vec<MealRecord> = self
            .lock()
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && m.date == date)
            .cloned()
            .collect();
        meals.sort_by_key(|m| m.meal_type as i32);
        Ok(meals)
    }

    async fn find_by_user_date_and_type(
        &self,
        user_id: Uuid,
        date: Date,
        meal_type: MealType,
    ) -> anyhow::Result<Option<MealRecord>> {
        Ok(self
            .lock()
            .meals
            .iter()
            .find(|m| m.user_id == user_id && m.date == date && m.meal_type == meal_type)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, date: Date, meal_type: MealType) -> anyhow::Result<Option<MealRecord>> {
        let mut t = self.lock();
        if t
            .meals
            .iter()
            .any(|m| m.user_id == user_id && m.date == date && m.meal_type == meal_type)
        {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let meal = MealRecord {
            id: Uuid::new_v4(),
            user_id,
            date,
            meal_type,
            created_at: now,
            updated_at: now,
        };
        t.meals.push(meal.clone());
        Ok(Some(meal))
    }

    async fn update(&self, id: Uuid, date: Date, meal_type: MealType) -> anyhow::Result<MealUpdate> {
        let mut t = self.lock();
        let Some(user_id) = t.meals.iter().find(|m| m.id == id).map(|m| m.user_id) else {
            return Ok(MealUpdate::Missing);
        };
        if t
            .meals
            .iter()
            .any(|m| m.id != id && m.user_id == user_id && m.date == date && m.meal_type == meal_type)
        {
            return Ok(MealUpdate::Taken);
        }
        let Some(meal) = t.meals.iter_mut().find(|m| m.id == id) else {
            return Ok(MealUpdate::Missing);
        };
        meal.date = date;
        meal.meal_type = meal_type;
        meal.updated_at = OffsetDateTime::now_utc();
        Ok(MealUpdate::Updated(meal.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        t.food_records.retain(|r| r.meal_record_id != id);
        let before = t.meals.len();
        t.meals.retain(|m| m.id != id);
        Ok(t.meals.len() < before)
    }
}

#[async_trait]
impl FoodRecordRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<FoodRecord>> {
        Ok(self.lock().food_records.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_meal(&self, meal_record_id: Uuid) -> anyhow::Result<Vec<FoodRecord>> {
        Ok(self
            .lock()
            .food_records
            .iter()
            .filter(|r| r.meal_record_id == meal_record_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_date(&self, user_id: Uuid, date: Date) -> anyhow::Result<Vec<FoodRecord>> {
        let t = self.lock();
        let mut rows: Vec<(i32, FoodRecord)> = t
            .food_records
            .iter()
            .filter_map(|r| {
                t.meals
                    .iter()
                    .find(|m| m.id == r.meal_record_id && m.user_id == user_id && m.date == date)
                    .map(|m| (m.meal_type as i32, r.clone()))
            })
            .collect();
        rows.sort_by_key(|(meal_type, _)| *meal_type);
        Ok(rows.into_iter().map(|(_, r)| r).collect())
    }

    async fn create(&self, meal_record_id: Uuid, food_id: Uuid, snap: &RecordSnapshot) -> anyhow::Result<FoodRecord> {
        let mut t = self.lock();
        if !t.meals.iter().any(|m| m.id == meal_record_id) {
            return Err(anyhow!("meal record {meal_record_id} does not exist"));
        }
        if !t.foods.iter().any(|f| f.id == food_id) {
            return Err(anyhow!("food {food_id} does not exist"));
        }
        let now = OffsetDateTime::now_utc();
        let rec = FoodRecord {
            id: Uuid::new_v4(),
            meal_record_id,
            food_id,
            food_name: snap.food_name.clone(),
            quantity: snap.quantity,
            unit: snap.unit.clone(),
            calories: snap.nutrients.calories,
            protein: snap.nutrients.protein,
            carbohydrates: snap.nutrients.carbohydrates,
            fat: snap.nutrients.fat,
            created_at: now,
            updated_at: now,
        };
        t.food_records.push(rec.clone());
        Ok(rec)
    }

    async fn update(&self, id: Uuid, snap: &RecordSnapshot) -> anyhow::Result<Option<FoodRecord>> {
        let mut t = self.lock();
        let Some(rec) = t.food_records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        rec.food_name = snap.food_name.clone();
        rec.quantity = snap.quantity;
        rec.unit = snap.unit.clone();
        rec.calories = snap.nutrients.calories;
        rec.protein = snap.nutrients.protein;
        rec.carbohydrates = snap.nutrients.carbohydrates;
        rec.fat = snap.nutrients.fat;
        rec.updated_at = OffsetDateTime::now_utc();
        Ok(Some(rec.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.lock();
        let before = t.food_records.len();
        t.food_records.retain(|r| r.id != id);
        Ok(t.food_records.len() < before)
    }

    async fn count_by_food(&self, food_id: Uuid) -> anyhow::Result<i64> {
        Ok(self.lock().food_records.iter().filter(|r| r.food_id == food_id).count() as i64)
    }
}

#[async_trait]
impl GoalRepo for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<NutritionGoal>> {
        Ok(self.lock().goals.iter().find(|g| g.user_id == user_id).cloned())
    }

    async fn create(&self, user_id: Uuid, targets: &MacroTargets) -> anyhow::Result<NutritionGoal> {
        let mut t = self.lock();
        let now = OffsetDateTime::now_utc();
        if let Some(goal) = t.goals.iter_mut().find(|g| g.user_id == user_id) {
            apply_targets(goal, targets, now);
            return Ok(goal.clone());
        }
        let goal = NutritionGoal {
            id: Uuid::new_v4(),
            user_id,
            calories: targets.calories,
            protein: targets.protein,
            carbohydrates: targets.carbohydrates,
            fat: targets.fat,
            created_at: now,
            updated_at: now,
        };
        t.goals.push(goal.clone());
        Ok(goal)
    }

    async fn update(&self, goal_id: Uuid, targets: &MacroTargets) -> anyhow::Result<NutritionGoal> {
        let mut t = self.lock();
        let goal = t
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| anyhow!("goal {goal_id} not found"))?;
        apply_targets(goal, targets, OffsetDateTime::now_utc());
        Ok(goal.clone())
    }
}

fn apply_targets(goal: &mut NutritionGoal, targets: &MacroTargets, now: OffsetDateTime) {
    goal.calories = targets.calories;
    goal.protein = targets.protein;
    goal.carbohydrates = targets.carbohydrates;
    goal.fat = targets.fat;
    goal.updated_at = now;
}
