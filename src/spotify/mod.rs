//! # Spotify Integration Module
//!
//! HTTP client for the two Spotify services the badge talks to:
//!
//! ```text
//! Badge / Callback handlers
//!          ↓
//! Token & Playback resolvers (management)
//!          ↓
//! Provider trait  ←  SpotifyClient (reqwest)
//!          ↓
//! accounts.spotify.com (token grants) / api.spotify.com (player, profile)
//! ```
//!
//! The resolvers only see the [`Provider`] trait, which keeps them testable
//! with in-memory fakes.
//!
//! - [`auth`] - `authorization_code` and `refresh_token` grants, user profile
//! - [`player`] - currently playing and recently played queries

pub mod auth;
pub mod player;

use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::{
    config::Config,
    error::ProviderError,
    types::{NowPlaying, OAuthErrorBody, PlaybackItem, RefreshedToken, TokenGrant},
};

/// The operations the badge needs from the streaming provider.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, ProviderError>;

    /// Fails with [`ProviderError::InvalidGrant`] when the refresh token has
    /// been revoked.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, ProviderError>;

    async fn current_user_id(&self, access_token: &str) -> Result<String, ProviderError>;

    /// `None` when nothing is playing.
    async fn now_playing(&self, access_token: &str) -> Result<Option<NowPlaying>, ProviderError>;

    /// Most recent first, at most `limit` items.
    async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<PlaybackItem>, ProviderError>;
}

/// reqwest backed [`Provider`].
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl SpotifyClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[async_trait]
impl Provider for SpotifyClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, ProviderError> {
        auth::exchange_code(self, code).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, ProviderError> {
        auth::refresh_token(self, refresh_token).await
    }

    async fn current_user_id(&self, access_token: &str) -> Result<String, ProviderError> {
        auth::current_user_id(self, access_token).await
    }

    async fn now_playing(&self, access_token: &str) -> Result<Option<NowPlaying>, ProviderError> {
        player::now_playing(self, access_token).await
    }

    async fn recently_played(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<PlaybackItem>, ProviderError> {
        player::recently_played(self, access_token, limit).await
    }
}

/// Turns a non-success response into a [`ProviderError`].
///
/// Accounts service rejections carry an OAuth error body; `invalid_grant` is
/// singled out because it means the refresh token is gone for good.
pub(crate) async fn error_from_response(res: Response) -> ProviderError {
    let status = res.status().as_u16();
    let text = match res.text().await {
        Ok(text) => text,
        Err(e) => return ProviderError::Transport(e),
    };

    if let Ok(body) = serde_json::from_str::<OAuthErrorBody>(&text) {
        if body.error == "invalid_grant" {
            return ProviderError::InvalidGrant;
        }
        return ProviderError::Api {
            status,
            message: body.error_description.unwrap_or(body.error),
        };
    }

    ProviderError::Api {
        status,
        message: text,
    }
}
