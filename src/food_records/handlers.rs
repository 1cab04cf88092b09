use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateFoodRecordRequest, DailySummary, MealQuery, UpdateFoodRecordRequest},
    repo_types::FoodRecord,
    services::FoodRecordService,
};
use crate::{
    auth::jwt::AuthUser,
    date::DateQuery,
    response::{created, done, ok, ApiResult, AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn food_record_routes() -> Router<AppState> {
    Router::new()
        .route("/food-records", post(create_record).get(list_by_date))
        .route("/food-records/meal", get(list_by_meal))
        .route("/food-records/summary", get(daily_summary))
        .route(
            "/food-records/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
}

#[instrument(skip(svc, req))]
pub async fn create_record(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppJson(req): AppJson<CreateFoodRecordRequest>,
) -> ApiResult<FoodRecord> {
    let record = svc.create(user_id, req).await?;
    created("food record created", record)
}

#[instrument(skip(svc))]
pub async fn list_by_date(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<DateQuery>,
) -> ApiResult<Vec<FoodRecord>> {
    let date = q.resolve()?;
    let records = svc.list_by_date(user_id, date).await?;
    ok("food records loaded", records)
}

#[instrument(skip(svc))]
pub async fn list_by_meal(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<MealQuery>,
) -> ApiResult<Vec<FoodRecord>> {
    let records = svc.list_by_meal(user_id, q.meal_id).await?;
    ok("food records loaded", records)
}

#[instrument(skip(svc))]
pub async fn daily_summary(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<DateQuery>,
) -> ApiResult<DailySummary> {
    let date = q.resolve()?;
    let summary = svc.summary(user_id, date).await?;
    ok("daily summary loaded", summary)
}

#[instrument(skip(svc))]
pub async fn get_record(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<FoodRecord> {
    let record = svc.get(user_id, id).await?;
    ok("food record loaded", record)
}

#[instrument(skip(svc, req))]
pub async fn update_record(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateFoodRecordRequest>,
) -> ApiResult<FoodRecord> {
    let record = svc.update(user_id, id, req).await?;
    ok("food record updated", record)
}

#[instrument(skip(svc))]
pub async fn delete_record(
    State(svc): State<FoodRecordService>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<()> {
    svc.delete(user_id, id).await?;
    done("food record deleted")
}
