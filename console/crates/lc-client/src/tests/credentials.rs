use super::EnvGuard;
use crate::{CredentialProvider, EnvToken, StaticToken};

use googletest::prelude::*;
use serial_test::serial;

#[test]
fn given_static_token_when_queried_then_returned() {
    let provider = StaticToken::new("abc123");

    assert_that!(provider.token(), some(eq("abc123")));
}

#[test]
fn given_blank_static_token_when_queried_then_absent() {
    assert_that!(StaticToken::new("   ").token(), none());
    assert_that!(StaticToken::none().token(), none());
}

#[test]
#[serial]
fn given_env_token_when_variable_changes_then_latest_value_used() {
    // Given
    let provider = EnvToken::new("LC_TEST_TOKEN");
    let _guard = EnvGuard::set("LC_TEST_TOKEN", "first");
    assert_that!(provider.token(), some(eq("first")));

    // When
    let _guard = EnvGuard::set("LC_TEST_TOKEN", "second");

    // Then
    assert_that!(provider.token(), some(eq("second")));
}

#[test]
#[serial]
fn given_env_token_when_variable_unset_then_absent() {
    let _guard = EnvGuard::remove("LC_TEST_TOKEN");

    assert_that!(EnvToken::new("LC_TEST_TOKEN").token(), none());
}

#[test]
fn given_closure_when_used_as_provider_then_called_each_time() {
    use std::sync::atomic::{AtomicU32, Ordering};

    let calls = AtomicU32::new(0);
    let provider = move || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Some(format!("token-{n}"))
    };

    assert_that!(provider.token(), some(eq("token-0")));
    assert_that!(provider.token(), some(eq("token-1")));
}
