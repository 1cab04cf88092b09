use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::instrument;

use super::{
    dto::{CalculateGoalRequest, SetGoalRequest},
    repo_types::NutritionGoal,
    services::GoalService,
};
use crate::{
    auth::jwt::AuthUser,
    response::{ok, ApiResult, AppJson},
    state::AppState,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", get(get_goal).post(set_goal))
        .route("/goals/calculate", post(calculate_goal))
}

#[instrument(skip(svc))]
pub async fn get_goal(State(svc): State<GoalService>, AuthUser(user_id): AuthUser) -> ApiResult<NutritionGoal> {
    let goal = svc.get(user_id).await?;
    ok("goal loaded", goal)
}

#[instrument(skip(svc, req))]
pub async fn set_goal(
    State(svc): State<GoalService>,
    AuthUser(user_id): AuthUser,
    AppJson(req): AppJson<SetGoalRequest>,
) -> ApiResult<NutritionGoal> {
    let goal = svc.set(user_id, req).await?;
    ok("goal saved", goal)
}

#[instrument(skip(svc, req))]
pub async fn calculate_goal(
    State(svc): State<GoalService>,
    AuthUser(user_id): AuthUser,
    AppJson(req): AppJson<CalculateGoalRequest>,
) -> ApiResult<NutritionGoal> {
    let goal = svc.calculate(user_id, req).await?;
    ok("goal calculated", goal)
}
