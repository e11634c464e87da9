//! Shared helpers for integration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Variables the repository factory inspects when picking a backend.
pub const REPOSITORY_VARS: [&str; 3] = ["REPOSITORY_TYPE", "DATABASE_URL", "PG_DATABASE_URL"];

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Holds the process environment for one test.
///
/// Every variable in [`REPOSITORY_VARS`] is cleared on creation, then the
/// requested ones are set. The previous values come back when the guard is
/// dropped, and other guards block until then.
pub struct RepositoryEnv {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl RepositoryEnv {
    pub fn with(vars: &[(&'static str, &str)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = REPOSITORY_VARS
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();

        for name in REPOSITORY_VARS {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }

        Self { saved, _lock: lock }
    }

    /// No repository variables set.
    pub fn empty() -> Self {
        Self::with(&[])
    }
}

impl Drop for RepositoryEnv {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }
}
