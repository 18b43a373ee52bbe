//! Integration tests for environment-driven store configuration.

mod test_helpers;

use std::time::Duration;

use rstest::rstest;
use taskflow::config::{
    BACKEND_ENV, BackendKind, ConfigError, REQUEST_TIMEOUT_ENV, SEED_FIXTURES_ENV, StoreConfig,
};
use taskflow::task::{adapters::BackendError, services::TaskStore};
use test_helpers::EnvVarGuard;

#[rstest]
fn unset_environment_yields_seeded_memory_backend() {
    let _guard = EnvVarGuard::apply(&[
        (BACKEND_ENV, None),
        (REQUEST_TIMEOUT_ENV, None),
        (SEED_FIXTURES_ENV, None),
    ]);

    let config = StoreConfig::from_env().expect("defaults should parse");

    assert_eq!(config, StoreConfig::default());
}

#[rstest]
fn environment_overrides_are_applied() {
    let _guard = EnvVarGuard::apply(&[
        (BACKEND_ENV, Some("Mock")),
        (REQUEST_TIMEOUT_ENV, Some("2500")),
        (SEED_FIXTURES_ENV, Some("no")),
    ]);

    let config = StoreConfig::from_env().expect("overrides should parse");

    assert_eq!(config.backend, BackendKind::Memory);
    assert_eq!(config.request_timeout, Duration::from_millis(2500));
    assert!(!config.seed_fixtures);
}

#[rstest]
fn invalid_timeout_is_reported() {
    let _guard = EnvVarGuard::apply(&[
        (BACKEND_ENV, None),
        (REQUEST_TIMEOUT_ENV, Some("soon")),
        (SEED_FIXTURES_ENV, None),
    ]);

    let result = StoreConfig::from_env();

    assert_eq!(result, Err(ConfigError::InvalidTimeout("soon".to_owned())));
}

#[rstest]
fn remote_backend_without_client_is_refused() {
    let config = {
        let _guard = EnvVarGuard::apply(&[
            (BACKEND_ENV, Some("remote")),
            (REQUEST_TIMEOUT_ENV, None),
            (SEED_FIXTURES_ENV, None),
        ]);
        StoreConfig::from_env().expect("remote backend should parse")
    };

    let result = TaskStore::from_config(&config, None);

    assert!(matches!(
        result,
        Err(BackendError::Config(ConfigError::MissingRemoteClient))
    ));
}
