//! Session management handlers

use crate::services::audit::AuditLogger;
use crate::services::sessions::SessionService;
use crate::{
    ApiError, ApiResult, AppState, ClientMeta, CurrentUser, MessageResponse, SessionDto,
    SessionListResponse, TerminateAllResponse, TerminateSessionRequest,
};

use axum::{Json, extract::State};
use uuid::Uuid;

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/auth/sessions
///
/// Active sessions, most recently used first. The session behind the
/// caller's access token is flagged as current.
pub async fn list_sessions(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<SessionListResponse>> {
    let service = session_service(&state);
    let current_sid = current.session_id();

    let sessions: Vec<SessionDto> = service
        .active_sessions(current.user.id)
        .await?
        .iter()
        .map(|s| SessionDto::from_session(s, Some(s.id) == current_sid))
        .collect();

    let total_sessions = sessions.len();
    Ok(Json(SessionListResponse {
        sessions,
        total_sessions,
    }))
}

/// POST /api/v1/auth/sessions/terminate
pub async fn terminate_session(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: ClientMeta,
    Json(body): Json<TerminateSessionRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let session_id = Uuid::parse_str(&body.session_id)?;

    let service = session_service(&state);
    let session = service
        .find_by_id(session_id)
        .await?
        .filter(|s| s.user_id == current.user.id && s.is_active)
        .ok_or_else(|| ApiError::not_found("Session not found or already terminated."))?;

    service.terminate(&session, "user_terminated", &meta).await?;

    Ok(Json(MessageResponse::new(
        "Session terminated successfully.",
    )))
}

/// POST /api/v1/auth/sessions/terminate-all
///
/// Ends every session except the one making the request.
pub async fn terminate_all_sessions(
    State(state): State<AppState>,
    current: CurrentUser,
    meta: ClientMeta,
) -> ApiResult<Json<TerminateAllResponse>> {
    let terminated_count = session_service(&state)
        .terminate_all(
            current.user.id,
            current.session_id(),
            "user_terminated",
            &meta,
        )
        .await?;

    Ok(Json(TerminateAllResponse {
        message: "All other sessions terminated successfully.".to_string(),
        terminated_count,
    }))
}

fn session_service(state: &AppState) -> SessionService {
    SessionService::new(state.pool.clone(), AuditLogger::new(state.pool.clone()))
}
