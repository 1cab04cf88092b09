use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use super::{dto::UpdateProfileRequest, repo_types::User, services::UserService};
use crate::{
    auth::jwt::AuthUser,
    response::{ok, ApiResult, AppJson},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/users/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(svc))]
pub async fn get_profile(State(svc): State<UserService>, AuthUser(user_id): AuthUser) -> ApiResult<User> {
    let user = svc.profile(user_id).await?;
    ok("profile loaded", user)
}

#[instrument(skip(svc, req))]
pub async fn update_profile(
    State(svc): State<UserService>,
    AuthUser(user_id): AuthUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> ApiResult<User> {
    let user = svc.update_profile(user_id, req).await?;
    ok("profile updated", user)
}
