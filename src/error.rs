//! Error types shared by the token store, the Spotify client and the two
//! resolvers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The refresh token (or authorization code) was rejected as invalid or
    /// revoked.
    #[error("grant rejected by provider (invalid_grant)")]
    InvalidGrant,
    #[error("provider responded with {status}: {message}")]
    Api { status: u16, message: String },
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// The user never authorized.
    #[error("no token stored for this user")]
    NotFound,
    /// The refresh token was rejected; the stored record has been deleted.
    #[error("refresh token was revoked")]
    Revoked,
    #[error("upstream failure: {0}")]
    Upstream(#[source] UpstreamError),
}

impl From<StoreError> for TokenError {
    fn from(err: StoreError) -> Self {
        TokenError::Upstream(UpstreamError::Store(err))
    }
}

impl From<ProviderError> for TokenError {
    fn from(err: ProviderError) -> Self {
        TokenError::Upstream(UpstreamError::Provider(err))
    }
}

impl TokenError {
    /// Whether the user has to log in again to get a working badge.
    pub fn needs_login(&self) -> bool {
        matches!(self, TokenError::NotFound | TokenError::Revoked)
    }
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] TokenError),
    #[error("playback query failed: {0}")]
    Upstream(#[from] ProviderError),
}
