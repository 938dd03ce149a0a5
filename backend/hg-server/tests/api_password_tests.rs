//! Integration tests for password reset and change flows

mod common;

use crate::common::{
    TEST_PASSWORD, count_audit_entries, create_test_app_state, create_verified_user, login,
    post_json, post_json_auth, stored_reset_token,
};

use axum::http::StatusCode;
use serde_json::json;

use hg_server::routes::build_router;

#[tokio::test]
async fn test_password_reset_does_not_disclose_accounts() {
    let state = create_test_app_state().await;
    let app = build_router(state);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/password-reset",
        json!({ "email": "nobody@example.com" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "If an account with this email exists, a password reset email has been sent."
    );
}

#[tokio::test]
async fn test_password_reset_body_identical_for_known_and_unknown_email() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "known").await;
    let app = build_router(state);

    let (status_known, body_known) = post_json(
        &app,
        "/api/v1/auth/password-reset",
        json!({ "email": "known@example.com" }),
    )
    .await;
    let (status_unknown, body_unknown) = post_json(
        &app,
        "/api/v1/auth/password-reset",
        json!({ "email": "nobody@example.com" }),
    )
    .await;

    // Responses must not reveal whether the account exists
    assert_eq!(status_known, StatusCode::OK);
    assert_eq!(status_known, status_unknown);
    assert_eq!(body_known, body_unknown);
}

#[tokio::test]
async fn test_password_reset_full_flow() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "forgetful").await;
    let app = build_router(state.clone());

    // Keep a session open; the reset should kill it
    let (_, refresh, _) = login(&app, "user_forgetful", TEST_PASSWORD).await;

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/password-reset",
        json!({ "email": "forgetful@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = stored_reset_token(&state.pool, "forgetful@example.com")
        .await
        .expect("reset token should be stored");

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/password-reset-confirm",
        json!({
            "token": token,
            "password": "Brand-New-Pw1!",
            "password_confirm": "Brand-New-Pw1!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // Old sessions are terminated
    let (status, _) = post_json(
        &app,
        "/api/v1/auth/token/refresh",
        json!({ "refresh": refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Old password is gone, new one works
    let (status, _) = post_json(
        &app,
        "/api/v1/auth/login",
        json!({ "username": "user_forgetful", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, "user_forgetful", "Brand-New-Pw1!").await;

    assert_eq!(
        count_audit_entries(&state.pool, "password_reset_confirm").await,
        1
    );
}

#[tokio::test]
async fn test_password_reset_confirm_rejects_bogus_token() {
    let state = create_test_app_state().await;
    let app = build_router(state);

    let (status, body) = post_json(
        &app,
        "/api/v1/auth/password-reset-confirm",
        json!({
            "token": "bogus-token:abc",
            "password": "Brand-New-Pw1!",
            "password_confirm": "Brand-New-Pw1!",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_RESET_TOKEN");
}

#[tokio::test]
async fn test_change_password_requires_current_password() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "careful").await;
    let app = build_router(state);

    let (access, _, _) = login(&app, "user_careful", TEST_PASSWORD).await;

    let (status, body) = post_json_auth(
        &app,
        "/api/v1/auth/change-password",
        &access,
        json!({
            "current_password": "not-my-password",
            "new_password": "Brand-New-Pw1!",
            "new_password_confirm": "Brand-New-Pw1!",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_change_password_keeps_current_session() {
    let state = create_test_app_state().await;
    create_verified_user(&state.pool, "changer").await;
    let app = build_router(state.clone());

    let (_, other_refresh, _) = login(&app, "user_changer", TEST_PASSWORD).await;
    let (access, own_refresh, _) = login(&app, "user_changer", TEST_PASSWORD).await;

    let (status, body) = post_json_auth(
        &app,
        "/api/v1/auth/change-password",
        &access,
        json!({
            "current_password": TEST_PASSWORD,
            "new_password": "Brand-New-Pw1!",
            "new_password_confirm": "Brand-New-Pw1!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    // The other session was terminated, the caller's survives
    let (status, _) = post_json(
        &app,
        "/api/v1/auth/token/refresh",
        json!({ "refresh": other_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_json(
        &app,
        "/api/v1/auth/token/refresh",
        json!({ "refresh": own_refresh }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count_audit_entries(&state.pool, "password_change").await, 1);
}
