use axum::{extract::State, routing::get, Router};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::FoodSearch,
    repo_types::{Food, FoodInput},
    services::FoodService,
};
use crate::{
    auth::jwt::AuthUser,
    response::{created, done, ok, ApiResult, AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(search_foods).post(create_food))
        .route("/foods/:id", get(get_food).put(update_food).delete(delete_food))
}

#[instrument(skip(svc, _user))]
pub async fn search_foods(
    State(svc): State<FoodService>,
    _user: AuthUser,
    AppQuery(q): AppQuery<FoodSearch>,
) -> ApiResult<Vec<Food>> {
    let foods = svc.search(q.name.as_deref()).await?;
    ok("foods loaded", foods)
}

#[instrument(skip(svc, _user))]
pub async fn get_food(State(svc): State<FoodService>, _user: AuthUser, AppPath(id): AppPath<Uuid>) -> ApiResult<Food> {
    let food = svc.get(id).await?;
    ok("food loaded", food)
}

#[instrument(skip(svc, _user, input))]
pub async fn create_food(
    State(svc): State<FoodService>,
    _user: AuthUser,
    AppJson(input): AppJson<FoodInput>,
) -> ApiResult<Food> {
    let food = svc.create(input).await?;
    created("food created", food)
}

#[instrument(skip(svc, _user, input))]
pub async fn update_food(
    State(svc): State<FoodService>,
    _user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(input): AppJson<FoodInput>,
) -> ApiResult<Food> {
    let food = svc.update(id, input).await?;
    ok("food updated", food)
}

#[instrument(skip(svc, _user))]
pub async fn delete_food(State(svc): State<FoodService>, _user: AuthUser, AppPath(id): AppPath<Uuid>) -> ApiResult<()> {
    svc.delete(id).await?;
    done("food deleted")
}
