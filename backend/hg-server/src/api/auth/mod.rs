pub mod account;
pub mod change_password_request;
pub mod delete_account_request;
pub mod delete_account_response;
pub mod login;
pub mod login_request;
pub mod login_response;
pub mod logout_request;
pub mod message_response;
pub mod password_reset_confirm_request;
pub mod password_reset_request;
pub mod passwords;
pub mod profile_response;
pub mod refresh_request;
pub mod refresh_response;
pub mod register_request;
pub mod register_response;
pub mod registration;
pub mod resend_verification_request;
pub mod security_log_dto;
pub mod security_log_list_response;
pub mod security_logs;
pub mod session_dto;
pub mod session_list_response;
pub mod sessions;
pub mod terminate_all_response;
pub mod terminate_session_request;
pub mod update_email_request;
pub mod update_email_response;
pub mod update_profile_request;
pub mod user_summary;
pub mod verify_email_request;
pub mod verify_email_response;
