//! Registration and email verification handlers

use crate::services::audit::AuditLogger;
use crate::{
    ApiError, ApiResult, AppState, ClientMeta, MessageResponse, RegisterRequest, RegisterResponse,
    ResendVerificationRequest, UserSummary, VerifyEmailRequest, VerifyEmailResponse,
};

use hg_core::{AuditAction, User};
use hg_db::UserRepository;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::json;

const MIN_PASSWORD_LEN: usize = 8;
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 30;

// Identical for known and unknown addresses so responses cannot be used
// to enumerate accounts.
const VERIFICATION_REQUESTED_MESSAGE: &str =
    "If an account with this email exists, a verification email has been sent.";

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    validate_registration(&body)?;

    let users = UserRepository::new(state.pool.clone());

    if users.find_by_username(&body.username).await?.is_some() {
        return Err(ApiError::validation_with_details(
            "Registration failed.",
            json!({ "username": ["A user with this username already exists."] }),
        ));
    }
    if users.find_by_email(&body.email).await?.is_some() {
        return Err(ApiError::validation_with_details(
            "Registration failed.",
            json!({ "email": ["A user with this email already exists."] }),
        ));
    }

    let password_hash = hg_auth::hash_password(&body.password)?;

    let mut user = User::new(
        body.username.trim().to_string(),
        body.email.trim().to_string(),
        password_hash,
        body.first_name.trim().to_string(),
        body.last_name.trim().to_string(),
    );

    // Token is persisted with the row so verification can look users up by it
    let verification_token = state.verification_tokens.generate(&user);
    user.email_verification_token = Some(verification_token.clone());

    // A concurrent registration can slip past the lookups above and land
    // on the UNIQUE constraints instead
    if let Err(e) = users.create(&user).await {
        if e.is_unique_violation() {
            return Err(ApiError::validation_with_details(
                "Registration failed.",
                json!({ "non_field_errors": [
                    "A user with this username or email already exists."
                ] }),
            ));
        }
        return Err(e.into());
    }

    let email_sent = state.mailer.send_verification_email(&user, &verification_token);
    state.mailer.send_welcome_email(&user);

    AuditLogger::new(state.pool.clone())
        .record(
            Some(user.id),
            AuditAction::Register,
            &meta,
            Some(json!({
                "email_sent": email_sent,
                "verification_required": state.config.auth.require_email_verification,
            })),
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Please check your email to verify your account."
                .to_string(),
            user: UserSummary::from(&user),
            email_verification_sent: email_sent,
        }),
    ))
}

/// POST /api/v1/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<VerifyEmailRequest>,
) -> ApiResult<Json<VerifyEmailResponse>> {
    let users = UserRepository::new(state.pool.clone());

    let mut user = users
        .find_by_verification_token(&body.token)
        .await?
        .filter(|u| state.verification_tokens.validate(u, &body.token))
        .ok_or_else(|| {
            ApiError::unauthorized(
                "INVALID_VERIFICATION_TOKEN",
                "Verification token is invalid or has expired.",
            )
        })?;

    users.set_email_verified(user.id, Utc::now().timestamp()).await?;
    user.email_verified = true;
    user.email_verification_token = None;

    AuditLogger::new(state.pool.clone())
        .record(
            Some(user.id),
            AuditAction::EmailVerification,
            &meta,
            Some(json!({ "email": user.email })),
        )
        .await;

    Ok(Json(VerifyEmailResponse {
        message: "Email has been verified successfully.".to_string(),
        user: UserSummary::from(&user),
    }))
}

/// POST /api/v1/auth/resend-verification
///
/// Never discloses whether the address is registered.
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(body): Json<ResendVerificationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let users = UserRepository::new(state.pool.clone());

    let Some(user) = users.find_by_email(&body.email).await? else {
        return Ok(Json(MessageResponse::new(VERIFICATION_REQUESTED_MESSAGE)));
    };

    if user.email_verified {
        return Ok(Json(MessageResponse::new("Email is already verified.")));
    }

    let token = state.verification_tokens.generate(&user);
    users
        .set_verification_token(user.id, &token, Utc::now().timestamp())
        .await?;
    state.mailer.send_verification_email(&user, &token);

    Ok(Json(MessageResponse::new(VERIFICATION_REQUESTED_MESSAGE)))
}

// =============================================================================
// Validation
// =============================================================================

fn validate_registration(body: &RegisterRequest) -> ApiResult<()> {
    let mut errors = serde_json::Map::new();

    let username = body.username.trim();
    if username.len() < MIN_USERNAME_LEN || username.len() > MAX_USERNAME_LEN {
        errors.insert(
            "username".into(),
            json!([format!(
                "Username must be between {} and {} characters.",
                MIN_USERNAME_LEN, MAX_USERNAME_LEN
            )]),
        );
    } else if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        errors.insert(
            "username".into(),
            json!(["Username may only contain letters, digits, '_', '-', and '.'."]),
        );
    }

    let email = body.email.trim();
    if !email.contains('@') || email.len() < 3 {
        errors.insert("email".into(), json!(["Enter a valid email address."]));
    }

    if body.password.len() < MIN_PASSWORD_LEN {
        errors.insert(
            "password".into(),
            json!([format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )]),
        );
    }
    if body.password != body.password_confirm {
        errors.insert(
            "password_confirm".into(),
            json!(["Passwords do not match."]),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_with_details(
            "Registration failed.",
            serde_json::Value::Object(errors),
        ))
    }
}
