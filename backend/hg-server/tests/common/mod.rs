#![allow(dead_code)]

//! Test infrastructure for hg-server API tests

use hg_core::User;
use hg_db::UserRepository;
use hg_server::AppState;
use hg_server::mailer::Mailer;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "CorrectHorse9!";

/// Create a test pool with in-memory SQLite.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().in_memory(true))
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("../crates/hg-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Default config with a valid JWT secret and generous rate limits.
pub fn test_config() -> hg_config::Config {
    let mut config = hg_config::Config::default();
    config.auth.jwt_secret = Some("test-secret-0123456789abcdef0123456789abcdef".to_string());
    config
}

/// Create AppState for testing
pub async fn create_test_app_state() -> AppState {
    create_test_app_state_with(test_config()).await
}

pub async fn create_test_app_state_with(config: hg_config::Config) -> AppState {
    let pool = create_test_pool().await;
    AppState::new(pool, config, Mailer::spawn())
}

/// Insert a user who already verified their email.
pub async fn create_verified_user(pool: &SqlitePool, tag: &str) -> User {
    let mut user = User::new(
        format!("user_{tag}"),
        format!("{tag}@example.com"),
        hg_auth::hash_password(TEST_PASSWORD).expect("Failed to hash password"),
        "Test".to_string(),
        "User".to_string(),
    );
    user.email_verified = true;

    UserRepository::new(pool.clone())
        .create(&user)
        .await
        .expect("Failed to create test user");

    user
}

/// POST a JSON body and return (status, parsed response body).
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("user-agent", "hg-test-client/1.0")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

/// POST a JSON body with a Bearer access token.
pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("user-agent", "hg-test-client/1.0")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

/// GET with a Bearer access token.
pub async fn get_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("user-agent", "hg-test-client/1.0")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// PATCH a JSON body with a Bearer access token.
pub async fn patch_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("user-agent", "hg-test-client/1.0")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Log in and return (access, refresh, session_id).
pub async fn login(app: &Router, username: &str, password: &str) -> (String, String, String) {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    (
        body["access"].as_str().unwrap().to_string(),
        body["refresh"].as_str().unwrap().to_string(),
        body["session_id"].as_str().unwrap().to_string(),
    )
}

/// Number of audit rows recorded for an action.
pub async fn count_audit_entries(pool: &SqlitePool, action: &str) -> i64 {
    sqlx::query("SELECT COUNT(*) AS n FROM hg_security_audit_log WHERE action = ?")
        .bind(action)
        .fetch_one(pool)
        .await
        .unwrap()
        .get("n")
}

/// The verification token stored on a user row, if any.
pub async fn stored_verification_token(pool: &SqlitePool, username: &str) -> Option<String> {
    sqlx::query("SELECT email_verification_token FROM hg_users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
        .get("email_verification_token")
}

/// The password reset token stored on a user row, if any.
pub async fn stored_reset_token(pool: &SqlitePool, email: &str) -> Option<String> {
    sqlx::query("SELECT password_reset_token FROM hg_users WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
        .get("password_reset_token")
}
