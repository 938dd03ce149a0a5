use crate::RateLimitConfig;

use googletest::prelude::*;

#[test]
fn given_defaults_when_inspected_then_match_endpoint_policies() {
    let config = RateLimitConfig::default();

    assert_that!(config.login.max_requests, eq(10));
    assert_that!(config.login.window_secs, eq(900));
    assert_that!(config.register.max_requests, eq(5));
    assert_that!(config.register.window_secs, eq(3600));
    assert_that!(config.password_reset.max_requests, eq(3));
    assert_that!(config.email_verification.block_secs, eq(1800));
}

#[test]
fn given_defaults_when_validated_then_ok() {
    assert_that!(RateLimitConfig::default().validate(), ok(anything()));
}

#[test]
fn given_zero_window_when_validated_then_fails() {
    let mut config = RateLimitConfig::default();
    config.login.window_secs = 0;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_endpoints_when_listed_then_covers_all_throttled_names() {
    let config = RateLimitConfig::default();
    let names: Vec<&str> = config.endpoints().iter().map(|(n, _)| *n).collect();

    assert_that!(
        names,
        unordered_elements_are![
            eq(&"login"),
            eq(&"register"),
            eq(&"password_reset"),
            eq(&"email_verification"),
        ]
    );
}
