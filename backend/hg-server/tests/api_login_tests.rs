//! Integration tests for login, lockout, and security headers

mod common;

use crate::common::{
    TEST_PASSWORD, count_audit_entries, create_test_app_state, create_verified_user, post_json,
};

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use hg_server::routes::build_router;

#[tokio::test]
async fn test_login_with_username() {
    let state = create_test_app_state().await;
    let user = create_verified_user(&state.pool, "alice").await;
    let app = build_router(state.clone());

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "user_alice", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert!(body["session_id"].is_string());
    assert_eq!(body["expires_in"], 900);
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert_eq!(body["user"]["email"], "alice@example.com");

    assert_eq!(count_audit_entries(&state.pool, "login").await, 1);
    assert_eq!(count_audit_entries(&state.pool, "session_created").await, 1);
}

#[tokio::test]
async fn test_login_with_email_identifier() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "bob").await;
    let app = build_router(state);

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "bob@example.com", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "carol").await;
    let app = build_router(state.clone());

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "user_carol", "password": "wrong-password" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    assert!(body["error"]["timestamp"].is_string());

    assert_eq!(count_audit_entries(&state.pool, "login_failed").await, 1);
}

#[tokio::test]
async fn test_login_unknown_identifier_uses_generic_error() {
    let state = create_test_app_state().await;
    let app = build_router(state);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "ghost", "password": "whatever123" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "dave").await;
    let app = build_router(state.clone());

    // Six failures leave the account open
    for _ in 0..6 {
        let (status, _) = post_json(
            &app,
            "/api/v1/auth/login",
            json!({ "username": "user_dave", "password": "wrong-password" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // The seventh trips the lock
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "user_dave", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["error"]["code"], "ACCOUNT_LOCKED");
    assert!(body["error"]["retry_after"].as_u64().unwrap() > 0);

    // The correct password does not bypass the lockout window
    let (status, body) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "user_dave", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["error"]["code"], "ACCOUNT_LOCKED");

    assert_eq!(count_audit_entries(&state.pool, "account_locked").await, 1);
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let state = create_test_app_state().await;
    let app = build_router(state);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(
        headers.get("referrer-policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
}
