//! Process-environment helpers for config tests.

use std::sync::{LazyLock, Mutex};

/// Held for the whole test body by every test that touches env vars.
pub(crate) static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Sets or clears one variable and puts the previous value back on drop.
pub(crate) struct EnvVarGuard {
    key: &'static str,
    saved: Option<String>,
}

impl EnvVarGuard {
    pub(crate) fn set(key: &'static str, value: &str) -> Self {
        let saved = std::env::var(key).ok();
        // SAFETY: callers hold ENV_LOCK, so no other test reads or writes the
        // environment concurrently.
        unsafe { std::env::set_var(key, value) };
        Self { key, saved }
    }

    pub(crate) fn unset(key: &'static str) -> Self {
        let saved = std::env::var(key).ok();
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(key) };
        Self { key, saved }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: ENV_LOCK is still held by the test owning this guard.
        unsafe {
            match self.saved.take() {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}
