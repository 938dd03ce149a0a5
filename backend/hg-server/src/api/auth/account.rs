//! Profile, email update, and account deletion handlers

use crate::services::audit::AuditLogger;
use crate::services::sessions::SessionService;
use crate::{
    ApiError, ApiResult, AppState, ClientMeta, CurrentUser, DeleteAccountRequest,
    DeleteAccountResponse, ProfileResponse, UpdateEmailRequest, UpdateEmailResponse,
    UpdateProfileRequest, UserSummary,
};

use hg_core::AuditAction;
use hg_db::UserRepository;

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::json;

/// Typed deliberately so an account cannot be deleted by replaying a
/// password alone.
const DELETION_CONFIRMATION: &str = "DELETE MY ACCOUNT";

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/auth/profile
pub async fn get_profile(current: CurrentUser) -> ApiResult<Json<ProfileResponse>> {
    Ok(Json(profile_of(&current)))
}

/// PATCH /api/v1/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    mut current: CurrentUser,
    meta: ClientMeta,
    Json(body): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let mut updated_fields = Vec::new();
    if let Some(first_name) = body.first_name {
        current.user.first_name = first_name.trim().to_string();
        updated_fields.push("first_name");
    }
    if let Some(last_name) = body.last_name {
        current.user.last_name = last_name.trim().to_string();
        updated_fields.push("last_name");
    }

    if !updated_fields.is_empty() {
        UserRepository::new(state.pool.clone())
            .update_profile(
                current.user.id,
                &current.user.first_name,
                &current.user.last_name,
                Utc::now().timestamp(),
            )
            .await?;

        AuditLogger::new(state.pool.clone())
            .record(
                Some(current.user.id),
                AuditAction::ProfileUpdate,
                &meta,
                Some(json!({ "updated_fields": updated_fields })),
            )
            .await;
    }

    Ok(Json(profile_of(&current)))
}

/// POST /api/v1/auth/update-email
///
/// The new address starts unverified; a fresh verification token goes to
/// it, and the old address is notified of the change.
pub async fn update_email(
    State(state): State<AppState>,
    mut current: CurrentUser,
    meta: ClientMeta,
    Json(body): Json<UpdateEmailRequest>,
) -> ApiResult<Json<UpdateEmailResponse>> {
    if !hg_auth::verify_password(&body.current_password, &current.user.password_hash) {
        return Err(ApiError::unauthorized(
            "INVALID_CREDENTIALS",
            "Current password is incorrect.",
        ));
    }

    let new_email = body.new_email.trim().to_string();
    if !new_email.contains('@') || new_email.len() < 3 {
        return Err(ApiError::validation_with_details(
            "Email update failed.",
            json!({ "new_email": ["Enter a valid email address."] }),
        ));
    }

    let users = UserRepository::new(state.pool.clone());
    if let Some(existing) = users.find_by_email(&new_email).await?
        && existing.id != current.user.id
    {
        return Err(ApiError::validation_with_details(
            "Email update failed.",
            json!({ "new_email": ["A user with this email already exists."] }),
        ));
    }

    let old_email = current.user.email.clone();
    let now = Utc::now().timestamp();

    users.update_email(current.user.id, &new_email, now).await?;
    current.user.email = new_email.clone();
    current.user.email_verified = false;

    let token = state.verification_tokens.generate(&current.user);
    users
        .set_verification_token(current.user.id, &token, now)
        .await?;

    let email_sent = state.mailer.send_verification_email(&current.user, &token);

    state.mailer.send_security_notification(
        &current.user,
        "email_change_request",
        &format!(
            "Your account email was changed from {} to {} (request from {}).",
            old_email, new_email, meta.ip_address
        ),
        Some(&old_email),
    );

    AuditLogger::new(state.pool.clone())
        .record(
            Some(current.user.id),
            AuditAction::EmailUpdate,
            &meta,
            Some(json!({
                "old_email": old_email,
                "new_email": new_email,
                "verification_sent": email_sent,
            })),
        )
        .await;

    Ok(Json(UpdateEmailResponse {
        message: format!(
            "Email updated to {}. Please check your new email to verify the change.",
            new_email
        ),
        email_verification_sent: email_sent,
        new_email,
    }))
}

/// POST /api/v1/auth/delete-account
///
/// Soft delete: the row stays for referential integrity with mangled
/// identifiers, and every session and refresh token is revoked.
pub async fn delete_account(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: ClientMeta,
    Json(body): Json<DeleteAccountRequest>,
) -> ApiResult<Json<DeleteAccountResponse>> {
    if !hg_auth::verify_password(&body.password, &current.user.password_hash) {
        return Err(ApiError::unauthorized(
            "INVALID_CREDENTIALS",
            "Password is incorrect.",
        ));
    }

    if body.confirmation != DELETION_CONFIRMATION {
        return Err(ApiError::validation_with_details(
            "Account deletion failed.",
            json!({ "confirmation": [format!(
                "Type \"{}\" to confirm deletion.",
                DELETION_CONFIRMATION
            )] }),
        ));
    }

    let user = &current.user;
    let display_name = {
        let full = format!("{} {}", user.first_name, user.last_name);
        let trimmed = full.trim().to_string();
        if trimmed.is_empty() {
            user.username.clone()
        } else {
            trimmed
        }
    };
    let user_email = user.email.clone();

    let audit = AuditLogger::new(state.pool.clone());
    audit
        .record(
            Some(user.id),
            AuditAction::AccountDeletion,
            &meta,
            Some(json!({
                "deletion_method": "user_initiated",
                "user_email": user_email,
            })),
        )
        .await;

    state.mailer.send_security_notification(
        user,
        "account_deletion",
        &format!("Your account was deleted from {}.", meta.ip_address),
        None,
    );

    SessionService::new(state.pool.clone(), audit)
        .terminate_all(user.id, None, "account_deleted", &meta)
        .await?;

    UserRepository::new(state.pool.clone())
        .soft_delete(user.id, Utc::now().timestamp())
        .await?;

    Ok(Json(DeleteAccountResponse {
        message: format!(
            "Account for {} ({}) has been successfully deleted. We're sorry to see you go.",
            display_name, user_email
        ),
        deletion_timestamp: Utc::now().to_rfc3339(),
    }))
}

fn profile_of(current: &CurrentUser) -> ProfileResponse {
    ProfileResponse {
        user: UserSummary::from(&current.user),
        last_login: current.user.last_login.map(|t| t.timestamp()),
        created_at: current.user.created_at.timestamp(),
    }
}
