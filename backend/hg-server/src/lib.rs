pub mod api;
pub mod app_state;
pub mod email_message;
pub mod error;
pub mod health;
pub mod logger;
pub mod mailer;
pub mod middleware;
pub mod routes;
pub mod services;

pub use api::{
    auth::{
        change_password_request::ChangePasswordRequest,
        delete_account_request::DeleteAccountRequest,
        delete_account_response::DeleteAccountResponse,
        login_request::LoginRequest,
        login_response::LoginResponse,
        logout_request::LogoutRequest,
        message_response::MessageResponse,
        password_reset_confirm_request::PasswordResetConfirmRequest,
        password_reset_request::PasswordResetRequest,
        profile_response::ProfileResponse,
        refresh_request::RefreshRequest,
        refresh_response::RefreshResponse,
        register_request::RegisterRequest,
        register_response::RegisterResponse,
        resend_verification_request::ResendVerificationRequest,
        security_log_dto::SecurityLogDto,
        security_log_list_response::SecurityLogListResponse,
        session_dto::SessionDto,
        session_list_response::SessionListResponse,
        terminate_all_response::TerminateAllResponse,
        terminate_session_request::TerminateSessionRequest,
        update_email_request::UpdateEmailRequest,
        update_email_response::UpdateEmailResponse,
        update_profile_request::UpdateProfileRequest,
        user_summary::UserSummary,
        verify_email_request::VerifyEmailRequest,
        verify_email_response::VerifyEmailResponse,
    },
    error::ApiError,
    error::Result as ApiResult,
    extractors::{client_meta::ClientMeta, current_user::CurrentUser},
};

pub use app_state::AppState;
pub use error::{Result as ServerErrorResult, ServerError};
pub use routes::build_router;
