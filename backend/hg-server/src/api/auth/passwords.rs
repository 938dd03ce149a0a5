//! Password reset and change handlers

use crate::services::audit::AuditLogger;
use crate::services::sessions::SessionService;
use crate::{
    ApiError, ApiResult, AppState, ChangePasswordRequest, ClientMeta, CurrentUser,
    MessageResponse, PasswordResetConfirmRequest, PasswordResetRequest,
};

use hg_core::AuditAction;
use hg_db::UserRepository;

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::json;

const MIN_PASSWORD_LEN: usize = 8;

// Identical for known and unknown addresses so responses cannot be used
// to enumerate accounts.
const RESET_REQUESTED_MESSAGE: &str =
    "If an account with this email exists, a password reset email has been sent.";

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/auth/password-reset
///
/// Never discloses whether the address is registered.
pub async fn password_reset(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<PasswordResetRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let users = UserRepository::new(state.pool.clone());

    let Some(user) = users.find_by_email(body.email.trim()).await? else {
        return Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE)));
    };

    let (token, expires_at) = state.reset_tokens.generate(&user);
    users
        .set_reset_token(
            user.id,
            &token,
            expires_at.timestamp(),
            Utc::now().timestamp(),
        )
        .await?;

    let email_sent = state.mailer.send_password_reset_email(&user, &token);

    AuditLogger::new(state.pool.clone())
        .record(
            Some(user.id),
            AuditAction::PasswordResetRequest,
            &meta,
            Some(json!({
                "email_sent": email_sent,
                "token_expiry": expires_at.to_rfc3339(),
            })),
        )
        .await;

    Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE)))
}

/// POST /api/v1/auth/password-reset-confirm
///
/// A successful reset terminates every session the account had open.
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<PasswordResetConfirmRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_new_password(&body.password, &body.password_confirm)?;

    let users = UserRepository::new(state.pool.clone());

    let user = users
        .find_by_reset_token(&body.token)
        .await?
        .filter(|u| state.reset_tokens.validate(u, &body.token))
        .ok_or_else(|| {
            ApiError::unauthorized(
                "INVALID_RESET_TOKEN",
                "Reset token is invalid or has expired.",
            )
        })?;

    let password_hash = hg_auth::hash_password(&body.password)?;
    users
        .update_password(user.id, &password_hash, Utc::now().timestamp())
        .await?;

    let audit = AuditLogger::new(state.pool.clone());
    SessionService::new(state.pool.clone(), audit.clone())
        .terminate_all(user.id, None, "password_reset", &meta)
        .await?;

    audit
        .record(
            Some(user.id),
            AuditAction::PasswordResetConfirm,
            &meta,
            Some(json!({ "method": "email_token" })),
        )
        .await;

    state.mailer.send_security_notification(
        &user,
        "password_change",
        &format!("Your password was reset from {}", meta.ip_address),
        None,
    );

    Ok(Json(MessageResponse::new(
        "Password has been reset successfully. You can now log in with your new password.",
    )))
}

/// POST /api/v1/auth/change-password
///
/// Other sessions are terminated; the one making the change survives.
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: ClientMeta,
    Json(body): Json<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if !hg_auth::verify_password(&body.current_password, &current.user.password_hash) {
        return Err(ApiError::unauthorized(
            "INVALID_CREDENTIALS",
            "Current password is incorrect.",
        ));
    }

    validate_new_password(&body.new_password, &body.new_password_confirm)?;

    let users = UserRepository::new(state.pool.clone());
    let password_hash = hg_auth::hash_password(&body.new_password)?;
    users
        .update_password(current.user.id, &password_hash, Utc::now().timestamp())
        .await?;

    let audit = AuditLogger::new(state.pool.clone());
    SessionService::new(state.pool.clone(), audit.clone())
        .terminate_all(
            current.user.id,
            current.session_id(),
            "password_change",
            &meta,
        )
        .await?;

    audit
        .record(
            Some(current.user.id),
            AuditAction::PasswordChange,
            &meta,
            Some(json!({ "method": "user_initiated" })),
        )
        .await;

    state.mailer.send_security_notification(
        &current.user,
        "password_change",
        &format!("Your password was changed from {}", meta.ip_address),
        None,
    );

    Ok(Json(MessageResponse::new(
        "Password has been changed successfully.",
    )))
}

// =============================================================================
// Validation
// =============================================================================

fn validate_new_password(password: &str, confirm: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation_with_details(
            "Password change failed.",
            json!({ "password": [format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )] }),
        ));
    }
    if password != confirm {
        return Err(ApiError::validation_with_details(
            "Password change failed.",
            json!({ "password_confirm": ["Passwords do not match."] }),
        ));
    }
    Ok(())
}
