use crate::state::AppState;
use axum::Router;

pub mod calculator;
mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::goal_routes()
}
