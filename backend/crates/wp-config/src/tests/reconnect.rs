use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, err, ok};
use serial_test::serial;

#[test]
#[serial]
fn given_initial_delay_above_max_delay_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _initial = EnvGuard::set("WP_RECONNECT_INITIAL_DELAY_MS", "5000");
    let _max = EnvGuard::set("WP_RECONNECT_MAX_DELAY_SECS", "1");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("cannot exceed"));
}

#[test]
#[serial]
fn given_max_delay_over_limit_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _max = EnvGuard::set("WP_RECONNECT_MAX_DELAY_SECS", "301");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_custom_reconnect_values_when_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _initial = EnvGuard::set("WP_RECONNECT_INITIAL_DELAY_MS", "100");
    let _multiplier = EnvGuard::set("WP_RECONNECT_BACKOFF_MULTIPLIER", "1.5");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}
