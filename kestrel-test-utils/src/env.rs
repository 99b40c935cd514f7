//! Environment variable management for testing
//!
//! Tests that read process-wide variables such as `JIRA_URL` or `JIRA_TOKEN`
//! must not observe each other's values. [`EnvVarGuard`] serializes those
//! tests behind a global lock and restores every touched variable on drop.

use std::collections::HashMap;
use std::env;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that records and restores environment variables.
///
/// Only one guard can be alive at a time; creating a second one in another
/// test blocks until the first is dropped.
pub struct EnvVarGuard {
  originals: HashMap<String, Option<String>>,
  _lock: MutexGuard<'static, ()>,
}

impl Default for EnvVarGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvVarGuard {
  /// Acquire the environment lock.
  pub fn new() -> Self {
    // A panicking test poisons the lock; the environment is restored by Drop
    // regardless, so the poison carries no information.
    let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    Self {
      originals: HashMap::new(),
      _lock: lock,
    }
  }

  fn remember(&mut self, name: &str) {
    self
      .originals
      .entry(name.to_string())
      .or_insert_with(|| env::var(name).ok());
  }

  /// Set a variable for the lifetime of the guard.
  pub fn set(&mut self, name: &str, value: &str) -> &mut Self {
    self.remember(name);
    unsafe {
      env::set_var(name, value);
    }
    self
  }

  /// Remove a variable for the lifetime of the guard.
  pub fn remove(&mut self, name: &str) -> &mut Self {
    self.remember(name);
    unsafe {
      env::remove_var(name);
    }
    self
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    for (name, original) in &self.originals {
      match original {
        Some(val) => unsafe {
          env::set_var(name, val);
        },
        None => unsafe {
          env::remove_var(name);
        },
      }
    }
  }
}
