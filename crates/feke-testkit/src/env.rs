//! Environment isolation utilities for testing
//!
//! This module provides functions for isolating environment variables
//! during tests to prevent interference between parallel test executions.

use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 5] = [
    "HOME",
    "XDG_CACHE_HOME",
    "FEKE_CONFIG",
    "FEKE_TEMPLATE_DIR",
    "FEKE_CACHE_DIR",
];

/// Run a test with an isolated feke environment
///
/// 1. Points `HOME` and `XDG_CACHE_HOME` at a fresh temporary directory
/// 2. Removes every `FEKE_*` override
/// 3. Serializes against other isolated tests using a Mutex
///
/// The closure receives the isolated cache root. The previous environment
/// is restored afterwards.
///
/// # Examples
///
/// ```no_run
/// use feke_testkit::with_isolated_feke_env;
///
/// with_isolated_feke_env(|cache_home| {
///     // dirs::cache_dir() now resolves below `cache_home` on Linux
///     assert!(cache_home.exists());
/// });
/// ```
pub fn with_isolated_feke_env<F, R>(f: F) -> R
where
    F: FnOnce(&Path) -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| {
        // Environment variables remain valid after a panic
        poisoned.into_inner()
    });

    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).ok()))
        .collect();

    let fake_home = TempDir::new().unwrap();
    let fake_cache = fake_home.path().join(".cache");
    std::fs::create_dir_all(&fake_cache).unwrap();

    // SAFETY: We hold ENV_LOCK, ensuring no other test is modifying env vars concurrently.
    unsafe {
        std::env::set_var("HOME", fake_home.path());
        std::env::set_var("XDG_CACHE_HOME", &fake_cache);
        std::env::remove_var("FEKE_CONFIG");
        std::env::remove_var("FEKE_TEMPLATE_DIR");
        std::env::remove_var("FEKE_CACHE_DIR");
    }

    let result = f(fake_cache.as_path());

    // SAFETY: We still hold ENV_LOCK, ensuring exclusive access to env vars.
    unsafe {
        for (name, value) in saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }

    result
}
