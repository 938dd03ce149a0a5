use crate::{ApiError, AppState};

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Client network metadata for audit entries and rate limiting.
///
/// The IP is the first hop of `X-Forwarded-For` when present, else
/// `X-Real-IP`, else "unknown" (direct peer addresses are not exposed
/// by the router in tests).
#[derive(Debug, Clone)]
pub struct ClientMeta {
    pub ip_address: String,
    pub user_agent: String,
}

impl ClientMeta {
    pub fn from_parts(parts: &Parts) -> Self {
        Self::from_headers(&parts.headers)
    }

    pub fn from_headers(headers: &axum::http::HeaderMap) -> Self {
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .or_else(|| {
                headers
                    .get("x-real-ip")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown".to_string());

        let user_agent = headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        Self {
            ip_address,
            user_agent,
        }
    }
}

impl FromRequestParts<AppState> for ClientMeta {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let meta = Self::from_parts(parts);
        async move { Ok(meta) }
    }
}
