use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::types::TokenRecord;

/// In-process mirror of the token store.
///
/// Never authoritative: every miss falls back to the store and a process
/// restart simply starts empty. Alongside the records it hands out one
/// refresh lock per user so concurrent badge requests refresh a token once.
#[derive(Default)]
pub struct TokenCache {
    records: DashMap<String, TokenRecord>,
    refresh_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached record whether or not it has expired.
    pub fn get(&self, user_id: &str) -> Option<TokenRecord> {
        self.records.get(user_id).map(|entry| entry.value().clone())
    }

    /// Inserts or replaces the record of `record.user_id`.
    ///
    /// Called after every store read and after a refresh, with the full
    /// record so the refresh token stays available for the next refresh.
    pub fn put(&self, record: TokenRecord) {
        self.records.insert(record.user_id.clone(), record);
    }

    /// Drops the user's record and refresh lock.
    ///
    /// Requests already waiting on the old lock still hold their own handle
    /// and find the user gone once they acquire it.
    pub fn invalidate(&self, user_id: &str) {
        self.records.remove(user_id);
        self.refresh_locks.remove(user_id);
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.records.contains_key(user_id)
    }

    /// The lock serializing refreshes of `user_id`, created on first use.
    ///
    /// # Example
    ///
    /// ```
    /// let lock = cache.refresh_lock("u1");
    /// let _guard = lock.lock().await;
    /// // re-check the cache, then refresh
    /// ```
    pub fn refresh_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .entry(user_id.to_string())
            .or_default()
            .value()
            .clone()
    }
}
