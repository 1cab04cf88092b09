use axum::{
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::error::AppError;

/// Success envelope shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

fn envelope<T>(status: StatusCode, message: &str, data: Option<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            code: status.as_u16(),
            message: message.to_string(),
            data,
        }),
    )
}

pub fn ok<T>(message: &str, data: T) -> ApiResult<T> {
    Ok(envelope(StatusCode::OK, message, Some(data)))
}

pub fn created<T>(message: &str, data: T) -> ApiResult<T> {
    Ok(envelope(StatusCode::CREATED, message, Some(data)))
}

pub fn done(message: &str) -> ApiResult<()> {
    Ok(envelope(StatusCode::OK, message, None))
}

/// `Json` whose rejection is an [`AppError`], so bad bodies get the `{error}` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
