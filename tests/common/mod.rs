#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use spotbadge::{
    config::Config,
    error::ProviderError,
    management::{MemoryTokenStore, TokenCache, TokenResolver, TokenStore},
    spotify::Provider,
    types::{
        AlbumRef, ArtistRef, Episode, Image, NowPlaying, PlaybackItem, RefreshedToken, Show,
        TokenGrant, TokenRecord, Track, now_ts,
    },
};

#[derive(Debug, Clone)]
pub enum RefreshBehavior {
    Grant { access_token: String, expires_in: i64 },
    InvalidGrant,
    Fail,
}

/// Scriptable provider counting every call it receives.
pub struct FakeProvider {
    pub refresh_behavior: Mutex<RefreshBehavior>,
    pub refresh_delay: Mutex<Option<Duration>>,
    pub now_playing: Mutex<Option<NowPlaying>>,
    pub now_playing_fails: Mutex<bool>,
    pub recent: Mutex<Vec<PlaybackItem>>,
    pub user_id: Mutex<String>,
    pub refresh_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub now_playing_calls: AtomicUsize,
    pub recent_calls: AtomicUsize,
    pub last_recent_limit: AtomicU32,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            refresh_behavior: Mutex::new(RefreshBehavior::Grant {
                access_token: "fresh-access".to_string(),
                expires_in: 3600,
            }),
            refresh_delay: Mutex::new(None),
            now_playing: Mutex::new(None),
            now_playing_fails: Mutex::new(false),
            recent: Mutex::new(Vec::new()),
            user_id: Mutex::new("u1".to_string()),
            refresh_calls: AtomicUsize::new(0),
            exchange_calls: AtomicUsize::new(0),
            now_playing_calls: AtomicUsize::new(0),
            recent_calls: AtomicUsize::new(0),
            last_recent_limit: AtomicU32::new(0),
        }
    }
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_refresh(self, behavior: RefreshBehavior) -> Self {
        *self.refresh_behavior.lock().unwrap() = behavior;
        self
    }

    pub fn with_now_playing(self, now_playing: NowPlaying) -> Self {
        *self.now_playing.lock().unwrap() = Some(now_playing);
        self
    }

    pub fn with_recent(self, items: Vec<PlaybackItem>) -> Self {
        *self.recent.lock().unwrap() = items;
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn now_playing_calls(&self) -> usize {
        self.now_playing_calls.load(Ordering::SeqCst)
    }

    pub fn recent_calls(&self) -> usize {
        self.recent_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, ProviderError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if code == "bad-code" {
            return Err(ProviderError::InvalidGrant);
        }
        Ok(TokenGrant {
            access_token: format!("access-for-{code}"),
            refresh_token: format!("refresh-for-{code}"),
            expires_in: 3600,
            scope: None,
        })
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<RefreshedToken, ProviderError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.refresh_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let behavior = self.refresh_behavior.lock().unwrap().clone();
        match behavior {
            RefreshBehavior::Grant {
                access_token,
                expires_in,
            } => Ok(RefreshedToken {
                access_token,
                expires_in,
            }),
            RefreshBehavior::InvalidGrant => Err(ProviderError::InvalidGrant),
            RefreshBehavior::Fail => Err(ProviderError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
        }
    }

    async fn current_user_id(&self, _access_token: &str) -> Result<String, ProviderError> {
        Ok(self.user_id.lock().unwrap().clone())
    }

    async fn now_playing(&self, _access_token: &str) -> Result<Option<NowPlaying>, ProviderError> {
        self.now_playing_calls.fetch_add(1, Ordering::SeqCst);
        if *self.now_playing_fails.lock().unwrap() {
            return Err(ProviderError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.now_playing.lock().unwrap().clone())
    }

    async fn recently_played(
        &self,
        _access_token: &str,
        limit: u32,
    ) -> Result<Vec<PlaybackItem>, ProviderError> {
        self.recent_calls.fetch_add(1, Ordering::SeqCst);
        self.last_recent_limit.store(limit, Ordering::SeqCst);
        Ok(self.recent.lock().unwrap().clone())
    }
}

pub struct Harness {
    pub cache: Arc<TokenCache>,
    pub store: Arc<MemoryTokenStore>,
    pub provider: Arc<FakeProvider>,
    pub resolver: TokenResolver,
}

pub fn harness(provider: FakeProvider) -> Harness {
    let cache = Arc::new(TokenCache::new());
    let store = Arc::new(MemoryTokenStore::new());
    let provider = Arc::new(provider);
    let resolver = TokenResolver::new(
        Arc::clone(&cache),
        Arc::clone(&store) as Arc<dyn TokenStore>,
        Arc::clone(&provider) as Arc<dyn Provider>,
    );
    Harness {
        cache,
        store,
        provider,
        resolver,
    }
}

pub fn record(user_id: &str, access_token: &str, expires_at: Option<i64>) -> TokenRecord {
    TokenRecord {
        user_id: user_id.to_string(),
        access_token: access_token.to_string(),
        refresh_token: format!("refresh-{user_id}"),
        expires_at,
    }
}

pub fn valid_record(user_id: &str, access_token: &str) -> TokenRecord {
    record(user_id, access_token, Some(now_ts() + 3600))
}

pub fn track(name: &str, artist: &str) -> PlaybackItem {
    PlaybackItem::Track(Track {
        name: name.to_string(),
        uri: format!("spotify:track:{}", name.to_lowercase().replace(' ', "")),
        duration_ms: Some(200_000),
        artists: vec![ArtistRef {
            name: artist.to_string(),
        }],
        album: AlbumRef { images: Vec::new() },
    })
}

pub fn episode(name: &str, publisher: &str) -> PlaybackItem {
    PlaybackItem::Episode(Episode {
        name: name.to_string(),
        uri: "spotify:episode:abc".to_string(),
        duration_ms: Some(1_800_000),
        images: vec![
            Image {
                url: "https://i.scdn.co/image/large".to_string(),
                height: Some(640),
                width: Some(640),
            },
            Image {
                url: "https://i.scdn.co/image/medium".to_string(),
                height: Some(300),
                width: Some(300),
            },
        ],
        show: Show {
            publisher: publisher.to_string(),
        },
    })
}

pub fn test_config(token_store_dir: PathBuf) -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        base_url: "http://badge.test".to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        api_url: "http://api.test/v1".to_string(),
        auth_url: "https://accounts.spotify.com/authorize".to_string(),
        token_url: "http://accounts.test/api/token".to_string(),
        scope: "user-read-currently-playing,user-read-recently-played".to_string(),
        token_store_dir,
        recently_played_limit: 10,
        login_help_url: "http://badge.test/login".to_string(),
    }
}
