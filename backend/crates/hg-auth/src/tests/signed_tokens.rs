use crate::{EmailVerificationTokens, PasswordResetTokens, hash_password};

use hg_core::User;

use chrono::Utc;

const SERVER_SECRET: &str = "unit-test-server-secret-0123456789abcdef";

fn test_user() -> User {
    User::new(
        "dana".to_string(),
        "dana@example.com".to_string(),
        "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        "Dana".to_string(),
        "Smith".to_string(),
    )
}

#[test]
fn given_verification_token_when_validated_for_same_user_then_accepted() {
    let tokens = EmailVerificationTokens::new(SERVER_SECRET.to_string());
    let user = test_user();

    let token = tokens.generate(&user);

    assert!(tokens.validate(&user, &token));
    assert!(!tokens.is_expired(&token));
}

#[test]
fn given_verification_token_when_validated_for_other_user_then_rejected() {
    let tokens = EmailVerificationTokens::new(SERVER_SECRET.to_string());
    let user = test_user();
    let mut other = test_user();
    other.email = "other@example.com".to_string();

    let token = tokens.generate(&user);

    assert!(!tokens.validate(&other, &token));
}

#[test]
fn given_tampered_verification_token_when_validated_then_rejected() {
    let tokens = EmailVerificationTokens::new(SERVER_SECRET.to_string());
    let user = test_user();

    let token = tokens.generate(&user);
    let mut tampered = token.clone();
    tampered.pop();
    tampered.push('x');

    assert!(!tokens.validate(&user, &tampered));
}

#[test]
fn given_verification_token_older_than_lifetime_when_validated_then_rejected() {
    let tokens = EmailVerificationTokens::new(SERVER_SECRET.to_string());
    let user = test_user();
    let issued_at = Utc::now().timestamp();

    let token = tokens.generate_at(&user, issued_at);

    // Just inside the 24h lifetime
    assert!(tokens.validate_at(&user, &token, issued_at + 24 * 3600 - 1));
    // Just past it
    assert!(!tokens.validate_at(&user, &token, issued_at + 24 * 3600 + 1));
    assert!(tokens.is_expired_at(&token, issued_at + 24 * 3600 + 1));
}

#[test]
fn given_malformed_verification_token_when_checked_then_invalid_and_expired() {
    let tokens = EmailVerificationTokens::new(SERVER_SECRET.to_string());
    let user = test_user();

    for garbage in ["", "abc", "a:b", "a:b:c:d", "secret:!!!:mac"] {
        assert!(!tokens.validate(&user, garbage));
        assert!(tokens.is_expired(garbage));
    }
}

#[test]
fn given_reset_token_when_validated_before_expiry_then_accepted() {
    let tokens = PasswordResetTokens::new(SERVER_SECRET.to_string());
    let user = test_user();

    let (token, expires_at) = tokens.generate(&user);

    assert!(tokens.validate(&user, &token));
    assert!(expires_at > Utc::now());
}

#[test]
fn given_reset_token_when_password_changed_then_rejected() {
    let tokens = PasswordResetTokens::new(SERVER_SECRET.to_string());
    let mut user = test_user();

    let (token, _) = tokens.generate(&user);
    assert!(tokens.validate(&user, &token));

    user.password_hash = hash_password("a-new-password").unwrap();

    assert!(!tokens.validate(&user, &token));
}

#[test]
fn given_reset_token_past_one_hour_when_validated_then_rejected() {
    let tokens = PasswordResetTokens::new(SERVER_SECRET.to_string());
    let user = test_user();
    let issued_at = Utc::now().timestamp();

    let token = tokens.generate_at(&user, issued_at);

    assert!(tokens.validate_at(&user, &token, issued_at + 3599));
    assert!(!tokens.validate_at(&user, &token, issued_at + 3601));
}

#[test]
fn given_legacy_reset_token_without_timestamp_when_validated_then_base_mac_decides() {
    let tokens = PasswordResetTokens::new(SERVER_SECRET.to_string());
    let user = test_user();
    let issued_at = Utc::now().timestamp();

    let token = tokens.generate_at(&user, issued_at);
    let (base, _) = token.rsplit_once(':').unwrap();

    // Base segment alone still validates and never expires by time
    assert!(tokens.validate(&user, base));
    assert!(!tokens.is_expired(base));

    // Short garbage is treated as expired outright
    assert!(tokens.is_expired("short"));
}
