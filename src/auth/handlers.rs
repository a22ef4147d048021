use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest},
    error::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AuthError> {
    let user = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let res = state.auth.login(payload).await?;
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        crate::app::build_app(AppState::fake())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn jane() -> Value {
        json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "Jane@Example.com",
            "password": "Abc123!x",
            "role": "user"
        })
    }

    #[tokio::test]
    async fn register_returns_created_user_without_password() {
        let (status, body) = post_json(app(), "/auth/register", jane()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["firstName"], "Jane");
        assert_eq!(body["role"], "user");
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password_hash").is_none());
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let app = app();
        let (status, _) = post_json(app.clone(), "/auth/register", jane()).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = post_json(app, "/auth/register", jane()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "DUPLICATE_USER");
    }

    #[tokio::test]
    async fn register_validation_errors_are_bad_request() {
        let mut weak = jane();
        weak["password"] = json!("abcdefg");
        let (status, body) = post_json(app(), "/auth/register", weak).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PASSWORD");

        let (status, body) = post_json(app(), "/auth/register", json!({"email": "a@b.co"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_FIELD");
    }

    #[tokio::test]
    async fn login_after_register_returns_token() {
        let app = app();
        post_json(app.clone(), "/auth/register", jane()).await;

        let (status, body) = post_json(
            app.clone(),
            "/auth/login",
            json!({"email": "jane@example.com", "password": "Abc123!x"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["message"], "Login successful");

        let (status, body) = post_json(
            app,
            "/auth/login",
            json!({"email": "jane@example.com", "password": "Wrong1!x"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn login_unknown_email_is_not_found() {
        let (status, body) = post_json(
            app(),
            "/auth/login",
            json!({"email": "ghost@example.com", "password": "Abc123!x"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn login_without_password_is_bad_request() {
        let (status, body) =
            post_json(app(), "/auth/login", json!({"email": "jane@example.com"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_FIELD");
    }
}
