//! Per-key async locks.
//!
//! Registration and profile updates check that a username or email is free
//! and then write. Holding the key locks across both steps keeps two
//! requests in this process from claiming the same value.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lock key for a username. Exact match, like the username lookups.
pub fn username_key(username: &str) -> String {
    format!("username:{username}")
}

/// Lock key for an email address. Exact match, like the email lookups.
pub fn email_key(email: &str) -> String {
    format!("email:{email}")
}

/// A set of named async mutexes created on demand.
#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Guards for every key passed to [`KeyedLocks::lock_all`].
#[derive(Debug)]
pub struct KeyedGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire all `keys`, waiting for any holder to release them.
    ///
    /// Keys are taken in sorted order so overlapping sets cannot deadlock.
    pub async fn lock_all<I>(&self, keys: I) -> KeyedGuard
    where
        I: IntoIterator<Item = String>,
    {
        let mut keys: Vec<String> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            keys.into_iter()
                .map(|key| map.entry(key).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }

        KeyedGuard { _guards: guards }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
