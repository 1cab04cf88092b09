use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    calculator::{self, Biometrics, GoalType, MacroTargets},
    dto::{CalculateGoalRequest, SetGoalRequest},
    repo::GoalRepo,
    repo_types::NutritionGoal,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{repo::UserRepo, repo_types::User},
};

#[derive(Clone)]
pub struct GoalService {
    goals: Arc<dyn GoalRepo>,
    users: Arc<dyn UserRepo>,
}

impl FromRef<AppState> for GoalService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.goals.clone(), state.users.clone())
    }
}

impl GoalService {
    pub fn new(goals: Arc<dyn GoalRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { goals, users }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid) -> AppResult<NutritionGoal> {
        self.goals
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("nutrition goal not set"))
    }

    #[instrument(skip(self, req))]
    pub async fn set(&self, user_id: Uuid, req: SetGoalRequest) -> AppResult<NutritionGoal> {
        self.require_user(user_id).await?;
        let targets = MacroTargets::from(&req);
        for (field, value) in [
            ("calories", targets.calories),
            ("protein", targets.protein),
            ("carbohydrates", targets.carbohydrates),
            ("fat", targets.fat),
        ] {
            if !(value > 0.0) {
                return Err(AppError::validation(format!("{field} must be positive")));
            }
        }
        self.upsert(user_id, &targets).await
    }

    #[instrument(skip(self, req), fields(goal_type = %req.goal_type))]
    pub async fn calculate(&self, user_id: Uuid, req: CalculateGoalRequest) -> AppResult<NutritionGoal> {
        let user = self.require_user(user_id).await?;
        let goal_type: GoalType = req.goal_type.parse()?;
        let biometrics = profile_biometrics(&user).with_overrides(&req.overrides());

        let calc = calculator::calculate(&biometrics, goal_type)?;
        debug!(bmr = calc.bmr, tdee = calc.tdee, calories = calc.targets.calories, "goal calculated");

        self.upsert(user_id, &calc.targets).await
    }

    /// Creates the goal when the user has none, otherwise overwrites it.
    async fn upsert(&self, user_id: Uuid, targets: &MacroTargets) -> AppResult<NutritionGoal> {
        let goal = match self.goals.find_by_user(user_id).await? {
            Some(existing) => self.goals.update(existing.id, targets).await?,
            None => self.goals.create(user_id, targets).await?,
        };
        info!(user_id = %user_id, calories = goal.calories, "nutrition goal saved");
        Ok(goal)
    }

    async fn require_user(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }
}

fn profile_biometrics(user: &User) -> Biometrics {
    Biometrics {
        gender: user.gender,
        age: user.age,
        height_cm: user.height,
        weight_kg: user.weight,
        activity_level: user.activity_level,
    }
}
