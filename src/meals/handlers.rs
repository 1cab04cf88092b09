use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateMealRequest, MealDetails, UpdateMealRequest},
    repo_types::MealRecord,
    services::MealService,
};
use crate::{
    auth::jwt::AuthUser,
    date::DateQuery,
    response::{created, done, ok, ApiResult, AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal).get(list_meals))
        .route("/meals/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

#[instrument(skip(svc, req))]
pub async fn create_meal(
    State(svc): State<MealService>,
    AuthUser(user_id): AuthUser,
    AppJson(req): AppJson<CreateMealRequest>,
) -> ApiResult<MealRecord> {
    let meal = svc.create(user_id, req).await?;
    created("meal record created", meal)
}

#[instrument(skip(svc))]
pub async fn list_meals(
    State(svc): State<MealService>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<DateQuery>,
) -> ApiResult<Vec<MealRecord>> {
    let date = q.resolve()?;
    let meals = svc.list_by_date(user_id, date).await?;
    ok("meal records loaded", meals)
}

#[instrument(skip(svc))]
pub async fn get_meal(
    State(svc): State<MealService>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<MealDetails> {
    let details = svc.get(user_id, id).await?;
    ok("meal record loaded", details)
}

#[instrument(skip(svc, req))]
pub async fn update_meal(
    State(svc): State<MealService>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateMealRequest>,
) -> ApiResult<MealRecord> {
    let meal = svc.update(user_id, id, req).await?;
    ok("meal record updated", meal)
}

#[instrument(skip(svc))]
pub async fn delete_meal(
    State(svc): State<MealService>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<()> {
    svc.delete(user_id, id).await?;
    done("meal record deleted")
}
