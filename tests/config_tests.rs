use blog_board::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic};

// --- Setup/Teardown Utilities ---

/// Runs a test body and restores the named environment variables afterward,
/// whether the body passed or panicked.
fn run_with_env<T, R>(test: T, cleanup_vars: Vec<&'static str>) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(String, Option<String>)> = cleanup_vars
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

const VARS: [&str; 3] = ["APP_ENV", "DATABASE_URL", "JWT_SECRET"];

// --- Tests ---

#[test]
#[serial]
fn default_config_needs_no_environment() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert!(!config.jwt_secret.is_empty());
}

#[test]
#[serial]
fn local_env_falls_back_to_the_fixed_secret() {
    run_with_env(
        || {
            unsafe {
                env::remove_var("APP_ENV");
                env::remove_var("JWT_SECRET");
                env::set_var("DATABASE_URL", "postgres://local/blogs");
            }
            let config = AppConfig::load();
            assert_eq!(config.env, Env::Local);
            assert_eq!(config.db_url, "postgres://local/blogs");
            assert_eq!(config.jwt_secret, "super-secure-test-secret-value-local");
        },
        VARS.to_vec(),
    );
}

#[test]
#[serial]
fn explicit_jwt_secret_wins_in_local() {
    run_with_env(
        || {
            unsafe {
                env::remove_var("APP_ENV");
                env::set_var("DATABASE_URL", "postgres://local/blogs");
                env::set_var("JWT_SECRET", "configured-secret");
            }
            let config = AppConfig::load();
            assert_eq!(config.jwt_secret, "configured-secret");
        },
        VARS.to_vec(),
    );
}

#[test]
#[serial]
fn production_without_jwt_secret_fails_fast() {
    run_with_env(
        || {
            unsafe {
                env::set_var("APP_ENV", "production");
                env::set_var("DATABASE_URL", "postgres://prod/blogs");
                env::remove_var("JWT_SECRET");
            }
            let result = panic::catch_unwind(AppConfig::load);
            assert!(result.is_err());
        },
        VARS.to_vec(),
    );
}

#[test]
#[serial]
fn missing_database_url_fails_fast() {
    run_with_env(
        || {
            unsafe {
                env::remove_var("APP_ENV");
                env::remove_var("DATABASE_URL");
            }
            let result = panic::catch_unwind(AppConfig::load);
            assert!(result.is_err());
        },
        VARS.to_vec(),
    );
}
