use axum::{extract::State, routing::post, Router};
use tracing::instrument;

use super::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    services::AuthService,
};
use crate::{
    response::{created, ok, ApiResult, AppJson},
    state::AppState,
    users::repo_types::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(svc, payload))]
pub async fn register(
    State(svc): State<AuthService>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> ApiResult<User> {
    let user = svc.register(payload).await?;
    created("registered", user)
}

#[instrument(skip(svc, payload))]
pub async fn login(
    State(svc): State<AuthService>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let resp = svc.login(payload).await?;
    ok("logged in", resp)
}
