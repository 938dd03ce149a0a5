use crate::Config;

use googletest::prelude::*;
use serial_test::serial;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.auth.jwt_secret = Some("0123456789abcdef0123456789abcdef".to_string());
    config
}

#[test]
fn given_defaults_when_constructed_then_sections_hold_documented_values() {
    let config = Config::default();

    assert_that!(config.server.host.as_str(), eq("127.0.0.1"));
    assert_that!(config.server.port, eq(8000));
    assert_that!(config.database.path.as_str(), eq("health.db"));
    assert_that!(config.auth.access_token_ttl_secs, eq(900));
    assert_that!(config.auth.refresh_token_ttl_days, eq(7));
    assert_that!(config.auth.remember_me_ttl_days, eq(30));
    assert_that!(config.auth.max_login_attempts, eq(7));
    assert_that!(config.auth.lockout_minutes, eq(15));
    assert_that!(config.auth.require_email_verification, eq(true));
    assert_that!(config.auth.rotate_refresh_tokens, eq(true));
    assert_that!(config.audit_log.retention_days, eq(90));
    assert_that!(config.session.cleanup_interval_hours, eq(6));
    assert_that!(config.rate_limit.enabled, eq(true));
}

#[test]
fn given_toml_with_partial_sections_when_parsed_then_rest_defaults() {
    let toml = r#"
        [server]
        port = 9100

        [auth]
        jwt_secret = "0123456789abcdef0123456789abcdef"
        max_login_attempts = 3

        [rate_limit]
        enabled = false
    "#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_that!(config.server.port, eq(9100));
    assert_that!(config.server.host.as_str(), eq("127.0.0.1"));
    assert_that!(config.auth.max_login_attempts, eq(3));
    assert_that!(config.auth.lockout_minutes, eq(15));
    assert_that!(config.rate_limit.enabled, eq(false));
    assert_that!(config.rate_limit.login.max_requests, eq(10));
}

#[test]
fn given_valid_config_when_validated_then_ok() {
    let config = valid_config();

    assert_that!(config.validate(), ok(anything()));
}

#[test]
fn given_missing_jwt_secret_when_validated_then_fails() {
    let config = Config::default();

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_absolute_database_path_when_validated_then_fails() {
    let mut config = valid_config();
    config.database.path = "/etc/health.db".to_string();

    assert_that!(config.validate(), err(anything()));
}

#[test]
#[serial]
fn given_env_overrides_when_loaded_then_applied() {
    let dir = tempfile::tempdir().unwrap();

    unsafe {
        std::env::set_var("HG_CONFIG_DIR", dir.path());
        std::env::set_var("HG_SERVER_PORT", "9200");
        std::env::set_var("HG_AUTH_JWT_SECRET", "0123456789abcdef0123456789abcdef");
        std::env::set_var("HG_AUTH_MAX_LOGIN_ATTEMPTS", "5");
        std::env::set_var("HG_RATE_LIMIT_ENABLED", "false");
    }

    let config = Config::load().unwrap();

    unsafe {
        std::env::remove_var("HG_CONFIG_DIR");
        std::env::remove_var("HG_SERVER_PORT");
        std::env::remove_var("HG_AUTH_JWT_SECRET");
        std::env::remove_var("HG_AUTH_MAX_LOGIN_ATTEMPTS");
        std::env::remove_var("HG_RATE_LIMIT_ENABLED");
    }

    assert_that!(config.server.port, eq(9200));
    assert_that!(config.auth.max_login_attempts, eq(5));
    assert_that!(config.rate_limit.enabled, eq(false));
    assert_that!(config.validate(), ok(anything()));
}
