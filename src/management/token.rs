use std::sync::Arc;

use crate::{
    error::{ProviderError, TokenError},
    info,
    management::{TokenCache, TokenStore},
    spotify::Provider,
    types::{TokenRecord, TokenUpdate, now_ts},
    warning,
};

/// Hands out valid access tokens per user.
///
/// Lookup order is cache, then store. Expired (or never timed) tokens are
/// refreshed through the provider under a per-user lock, written to the store
/// as a partial update and written through to the cache. A refresh token the
/// provider rejects as `invalid_grant` removes the user from store and cache.
pub struct TokenResolver {
    cache: Arc<TokenCache>,
    store: Arc<dyn TokenStore>,
    provider: Arc<dyn Provider>,
}

impl TokenResolver {
    pub fn new(
        cache: Arc<TokenCache>,
        store: Arc<dyn TokenStore>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self {
            cache,
            store,
            provider,
        }
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// Returns an access token for `user_id` that is not past its expiry.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NotFound`] - the user never authorized
    /// - [`TokenError::Revoked`] - the refresh token was rejected; the user is
    ///   gone from store and cache afterwards
    /// - [`TokenError::Upstream`] - store or provider failure
    pub async fn resolve_access_token(&self, user_id: &str) -> Result<String, TokenError> {
        let record = self.lookup(user_id).await?;
        if !record.is_expired() {
            return Ok(record.access_token);
        }
        self.refresh(user_id).await
    }

    /// Persists a freshly authorized user and seeds the cache with it.
    pub async fn register(&self, record: TokenRecord) -> Result<(), TokenError> {
        self.store.set(&record).await?;
        self.cache.put(record);
        Ok(())
    }

    /// Forgets a user everywhere.
    pub async fn forget(&self, user_id: &str) -> Result<(), TokenError> {
        self.cache.invalidate(user_id);
        self.store.delete(user_id).await?;
        Ok(())
    }

    /// Cached record if any (expired or not), otherwise the stored one.
    async fn lookup(&self, user_id: &str) -> Result<TokenRecord, TokenError> {
        if let Some(record) = self.cache.get(user_id) {
            return Ok(record);
        }

        let record = self
            .store
            .get(user_id)
            .await?
            .ok_or(TokenError::NotFound)?;
        self.cache.put(record.clone());
        Ok(record)
    }

    async fn refresh(&self, user_id: &str) -> Result<String, TokenError> {
        let lock = self.cache.refresh_lock(user_id);
        let _guard = lock.lock().await;

        // a request holding the lock before us may already have refreshed
        let record = self.lookup(user_id).await?;
        if !record.is_expired() {
            return Ok(record.access_token);
        }

        match self.provider.refresh(&record.refresh_token).await {
            Ok(refreshed) => {
                let update = TokenUpdate {
                    access_token: refreshed.access_token,
                    expires_at: now_ts().saturating_add(refreshed.expires_in),
                };
                self.store.update(user_id, &update).await?;

                let mut record = record;
                record.apply(&update);
                self.cache.put(record);

                info!("Refreshed access token for {}", user_id);
                Ok(update.access_token)
            }
            Err(ProviderError::InvalidGrant) => {
                warning!("Refresh token for {} was revoked, removing it", user_id);
                self.cache.invalidate(user_id);
                self.store.delete(user_id).await?;
                Err(TokenError::Revoked)
            }
            Err(err) => {
                // another process may have won a refresh race; the provider
                // then rejects ours, so give the store one more look
                warning!("Refreshing token for {} failed: {}", user_id, err);
                match self.store.get(user_id).await? {
                    Some(stored) if !stored.is_expired() => {
                        let access_token = stored.access_token.clone();
                        self.cache.put(stored);
                        Ok(access_token)
                    }
                    _ => Err(err.into()),
                }
            }
        }
    }
}
