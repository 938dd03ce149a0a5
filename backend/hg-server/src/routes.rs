use crate::api::auth::{account, login, passwords, registration, security_logs, sessions};
use crate::middleware::{rate_limit, security_headers};
use crate::{AppState, health};

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        // Registration and verification
        .route("/api/v1/auth/register", post(registration::register))
        .route("/api/v1/auth/verify-email", post(registration::verify_email))
        .route(
            "/api/v1/auth/resend-verification",
            post(registration::resend_verification),
        )
        // Login and tokens
        .route("/api/v1/auth/login", post(login::login))
        .route("/api/v1/auth/token/refresh", post(login::refresh_token))
        .route("/api/v1/auth/logout", post(login::logout))
        // Password flows
        .route("/api/v1/auth/password-reset", post(passwords::password_reset))
        .route(
            "/api/v1/auth/password-reset-confirm",
            post(passwords::password_reset_confirm),
        )
        .route(
            "/api/v1/auth/change-password",
            post(passwords::change_password),
        )
        // Profile and account
        .route("/api/v1/auth/profile", get(account::get_profile))
        .route("/api/v1/auth/profile", patch(account::update_profile))
        .route("/api/v1/auth/update-email", post(account::update_email))
        .route("/api/v1/auth/delete-account", post(account::delete_account))
        // Sessions
        .route("/api/v1/auth/sessions", get(sessions::list_sessions))
        .route(
            "/api/v1/auth/sessions/terminate",
            post(sessions::terminate_session),
        )
        .route(
            "/api/v1/auth/sessions/terminate-all",
            post(sessions::terminate_all_sessions),
        )
        // Audit trail
        .route(
            "/api/v1/auth/security-logs",
            get(security_logs::list_security_logs),
        )
        // Throttling runs before handlers; headers are stamped on the way out
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ))
        .layer(middleware::from_fn(security_headers::security_headers))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
