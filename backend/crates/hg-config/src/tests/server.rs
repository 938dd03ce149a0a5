use crate::ServerConfig;

use googletest::prelude::*;

#[test]
fn given_default_server_config_when_validated_then_ok() {
    assert_that!(ServerConfig::default().validate(), ok(anything()));
}

#[test]
fn given_port_zero_when_validated_then_ok_as_auto_assign() {
    let mut config = ServerConfig::default();
    config.port = 0;

    assert_that!(config.validate(), ok(anything()));
}

#[test]
fn given_privileged_port_when_validated_then_fails() {
    let mut config = ServerConfig::default();
    config.port = 80;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_zero_max_connections_when_validated_then_fails() {
    let mut config = ServerConfig::default();
    config.max_connections = 0;

    assert_that!(config.validate(), err(anything()));
}
