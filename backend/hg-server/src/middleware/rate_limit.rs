use crate::api::extractors::client_meta::ClientMeta;
use crate::{ApiError, AppState};

use std::panic::Location;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use error_location::ErrorLocation;

/// Map a request path to the limiter endpoint key, if it is throttled.
///
/// Reset and verification flows share a key with their confirm/resend
/// counterparts so retries on either leg count against the same budget.
fn endpoint_key(path: &str) -> Option<&'static str> {
    match path {
        "/api/v1/auth/login" => Some("login"),
        "/api/v1/auth/register" => Some("register"),
        "/api/v1/auth/password-reset" | "/api/v1/auth/password-reset-confirm" => {
            Some("password_reset")
        }
        "/api/v1/auth/verify-email" | "/api/v1/auth/resend-verification" => {
            Some("email_verification")
        }
        _ => None,
    }
}

/// Consult the sliding-window limiter before throttled endpoints.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(endpoint) = endpoint_key(request.uri().path()) {
        let meta = ClientMeta::from_headers(request.headers());
        let client = hg_auth::client_fingerprint(&meta.ip_address, &meta.user_agent);

        let decision = state.rate_limiter.check_and_record(endpoint, &client);
        if !decision.allowed {
            return Err(ApiError::RateLimited {
                retry_after: decision.retry_after_secs,
                location: ErrorLocation::from(Location::caller()),
            });
        }
    }

    Ok(next.run(request).await)
}
