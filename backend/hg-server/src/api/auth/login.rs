//! Login, token refresh, and logout handlers

use crate::services::audit::AuditLogger;
use crate::services::tokens::TokenService;
use crate::{
    ApiError, ApiResult, AppState, ClientMeta, CurrentUser, LoginRequest, LoginResponse,
    LogoutRequest, MessageResponse, RefreshRequest, RefreshResponse, UserSummary,
};

use hg_core::AuditAction;
use hg_db::UserRepository;

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::json;

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/auth/login
///
/// Accepts a username or email as the identifier. A locked account is
/// rejected before the password is checked, so the correct password
/// does not shortcut the lockout window.
pub async fn login(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let users = UserRepository::new(state.pool.clone());
    let audit = AuditLogger::new(state.pool.clone());
    let auth = &state.config.auth;

    let Some(user) = users.find_by_identifier(body.username.trim()).await? else {
        audit
            .record_failure(
                None,
                AuditAction::LoginFailed,
                &meta,
                Some(json!({ "identifier": body.username, "reason": "unknown_identifier" })),
            )
            .await;
        return Err(invalid_credentials());
    };

    if let Some(remaining) = user.lock_remaining_secs() {
        audit
            .record_failure(
                Some(user.id),
                AuditAction::LoginFailed,
                &meta,
                Some(json!({ "reason": "account_locked" })),
            )
            .await;
        return Err(ApiError::locked(
            "Account is temporarily locked due to too many failed login attempts.",
            remaining as u64,
        ));
    }

    if !user.is_active {
        audit
            .record_failure(
                Some(user.id),
                AuditAction::LoginFailed,
                &meta,
                Some(json!({ "reason": "account_inactive" })),
            )
            .await;
        return Err(ApiError::unauthorized(
            "ACCOUNT_INACTIVE",
            "This account has been deactivated.",
        ));
    }

    if !hg_auth::verify_password(&body.password, &user.password_hash) {
        let lockout_secs = auth.lockout_minutes as i64 * 60;
        let locked_now = users
            .record_failed_login(
                user.id,
                auth.max_login_attempts,
                lockout_secs,
                Utc::now().timestamp(),
            )
            .await?;

        audit
            .record_failure(
                Some(user.id),
                AuditAction::LoginFailed,
                &meta,
                Some(json!({
                    "reason": "invalid_password",
                    "remaining_attempts": user
                        .remaining_attempts(auth.max_login_attempts)
                        .saturating_sub(1),
                })),
            )
            .await;

        if locked_now {
            audit
                .record_failure(
                    Some(user.id),
                    AuditAction::AccountLocked,
                    &meta,
                    Some(json!({ "lockout_minutes": auth.lockout_minutes })),
                )
                .await;
            return Err(ApiError::locked(
                "Account is temporarily locked due to too many failed login attempts.",
                lockout_secs as u64,
            ));
        }

        return Err(invalid_credentials());
    }

    if auth.require_email_verification && !user.email_verified {
        audit
            .record_failure(
                Some(user.id),
                AuditAction::LoginFailed,
                &meta,
                Some(json!({ "reason": "email_not_verified" })),
            )
            .await;
        return Err(ApiError::unauthorized(
            "EMAIL_NOT_VERIFIED",
            "Please verify your email address before logging in.",
        ));
    }

    users
        .record_successful_login(user.id, &meta.ip_address, Utc::now().timestamp())
        .await?;

    let tokens = TokenService::from_state(&state);
    let bundle = tokens.issue(&user, &meta, body.remember_me).await?;

    audit
        .record_for_session(
            user.id,
            AuditAction::Login,
            bundle.session.id,
            &meta,
            Some(json!({ "remember_me": body.remember_me })),
        )
        .await;

    state.mailer.send_security_notification(
        &user,
        "login",
        &format!(
            "New login from {} ({})",
            meta.ip_address,
            bundle.session.device_summary()
        ),
        None,
    );

    Ok(Json(LoginResponse {
        access: bundle.access,
        refresh: bundle.refresh,
        expires_in: bundle.expires_in,
        refresh_expires_in: bundle.refresh_expires_in,
        session_id: bundle.session.id.to_string(),
        user: UserSummary::from(&user),
    }))
}

/// POST /api/v1/auth/token/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let tokens = TokenService::from_state(&state);

    let bundle = tokens
        .refresh(&body.refresh, &meta)
        .await?
        .ok_or_else(|| {
            ApiError::unauthorized(
                "INVALID_REFRESH_TOKEN",
                "Refresh token is invalid or has expired.",
            )
        })?;

    Ok(Json(RefreshResponse {
        access: bundle.access,
        refresh: bundle.refresh,
        expires_in: bundle.expires_in,
        session_id: bundle.session_id.to_string(),
    }))
}

/// POST /api/v1/auth/logout
///
/// Ends the session behind the supplied refresh token; without one (or
/// when it is unusable) every session for the caller is terminated.
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: ClientMeta,
    Json(body): Json<LogoutRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let tokens = TokenService::from_state(&state);

    if let Some(refresh) = body.refresh.as_deref()
        && tokens.logout(refresh, &meta).await
    {
        AuditLogger::new(state.pool.clone())
            .record(Some(current.user.id), AuditAction::Logout, &meta, None)
            .await;
        return Ok(Json(MessageResponse::new("Successfully logged out.")));
    }

    tokens
        .sessions()
        .terminate_all(current.user.id, None, "logout", &meta)
        .await?;

    AuditLogger::new(state.pool.clone())
        .record(
            Some(current.user.id),
            AuditAction::Logout,
            &meta,
            Some(json!({ "scope": "all_devices" })),
        )
        .await;

    Ok(Json(MessageResponse::new(
        "Successfully logged out from all devices.",
    )))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("INVALID_CREDENTIALS", "Invalid username or password.")
}
