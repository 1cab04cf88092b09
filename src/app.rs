use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{auth, food_records, foods, goals, meals, state::AppState, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth::router())
                .merge(users::router())
                .merge(goals::router())
                .merge(meals::router())
                .merge(food_records::router())
                .merge(foods::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_app(AppState::in_memory(test_config()))
    }

    async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(json!({"email": email, "password": "secret123", "nickname": "Ann"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 201);
        assert!(body["data"].get("password_hash").is_none());

        let (status, body) = call(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": email, "password": "secret123"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = test_app();
        let res = app
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = test_app();
        let (status, body) = call(&app, Method::GET, "/api/v1/users/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, _) = call(&app, Method::GET, "/api/v1/meals", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = test_app();
        register_and_login(&app, "ann@example.com").await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "ann@example.com", "password": "nope-nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid email or password");
    }

    #[tokio::test]
    async fn meal_flow_with_ownership_and_uniqueness() {
        let app = test_app();
        let ann = register_and_login(&app, "ann@example.com").await;
        let bob = register_and_login(&app, "bob@example.com").await;

        let meal_body = json!({"record_date": "2024-01-01", "meal_type": "breakfast"});
        let (status, body) = call(&app, Method::POST, "/api/v1/meals", Some(ann.as_str()), Some(meal_body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["meal_type"], "breakfast");
        assert_eq!(body["data"]["date"], "2024-01-01");
        let meal_id = body["data"]["id"].as_str().unwrap().to_string();

        // integer code decodes to the same meal type
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/meals",
            Some(ann.as_str()),
            Some(json!({"record_date": "2024-01-01", "meal_type": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "record already exists");

        let uri = format!("/api/v1/meals/{meal_id}");
        let (status, _) = call(&app, Method::GET, &uri, Some(bob.as_str()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = call(&app, Method::DELETE, &uri, Some(bob.as_str()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call(&app, Method::GET, "/api/v1/meals?date=2024-01-01", Some(ann.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = call(&app, Method::DELETE, &uri, Some(ann.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("data").is_none());
        let (status, _) = call(&app, Method::GET, &uri, Some(ann.as_str()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn food_record_flow_and_summary() {
        let app = test_app();
        let token = register_and_login(&app, "ann@example.com").await;

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/v1/foods",
            Some(token.as_str()),
            Some(json!({"name": "Apple", "calories": 52.0, "protein": 0.3, "carbohydrates": 14.0, "fat": 0.2})),
        )
        .await;
        let food_id = body["data"]["id"].as_str().unwrap().to_string();

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/v1/meals",
            Some(token.as_str()),
            Some(json!({"record_date": "2024-05-05", "meal_type": "snack"})),
        )
        .await;
        let meal_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/food-records",
            Some(token.as_str()),
            Some(json!({"meal_record_id": meal_id, "food_id": food_id, "quantity": 150.0, "unit": "g"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["calories"], 78.0);

        let (status, body) = call(
            &app,
            Method::GET,
            "/api/v1/food-records/summary?date=2024-05-05",
            Some(token.as_str()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totals"]["calories"], 78.0);
        assert!(body["data"]["goal"].is_null());

        let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/foods/{food_id}"), Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_input_uses_error_shape() {
        let app = test_app();
        let token = register_and_login(&app, "ann@example.com").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/meals",
            Some(token.as_str()),
            Some(json!({"record_date": "01/01/2024", "meal_type": "brunch"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = call(&app, Method::GET, "/api/v1/meals/not-a-uuid", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, _) = call(&app, Method::GET, "/api/v1/meals?date=2024-13-01", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
