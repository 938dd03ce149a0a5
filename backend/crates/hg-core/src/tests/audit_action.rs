use crate::{AuditAction, CoreError};

use std::str::FromStr;

#[test]
fn given_known_action_when_round_tripped_then_matches() {
    let actions = [
        AuditAction::Login,
        AuditAction::LoginFailed,
        AuditAction::AccountLocked,
        AuditAction::SessionTerminated,
        AuditAction::TokenRefreshed,
    ];

    for action in actions {
        let parsed = AuditAction::from_str(action.as_str()).unwrap();
        assert_eq!(parsed, action);
    }
}

#[test]
fn given_unknown_action_when_parsed_then_returns_error() {
    let result = AuditAction::from_str("coffee_break");

    assert!(matches!(
        result,
        Err(CoreError::InvalidAuditAction { .. })
    ));
}

#[test]
fn given_action_when_serialized_then_uses_snake_case() {
    let json = serde_json::to_string(&AuditAction::PasswordResetRequest).unwrap();

    assert_eq!(json, "\"password_reset_request\"");
}
