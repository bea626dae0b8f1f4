use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use axum::{Extension, Router, routing::get};
use reqwest::Client;

use crate::{
    Res, api,
    config::Config,
    management::{FileTokenStore, PlaybackResolver, TokenCache, TokenResolver, TokenStore},
    spotify::{Provider, SpotifyClient},
    success,
};

/// Shared state of the badge server.
pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn Provider>,
    pub tokens: TokenResolver,
    pub playback: PlaybackResolver,
    pub http: Client,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn TokenStore>,
        provider: Arc<dyn Provider>,
        http: Client,
    ) -> Self {
        let tokens = TokenResolver::new(Arc::new(TokenCache::new()), store, Arc::clone(&provider));
        let playback = PlaybackResolver::new(Arc::clone(&provider))
            .with_recently_played_limit(config.recently_played_limit);
        Self {
            config,
            provider,
            tokens,
            playback,
            http,
        }
    }

    /// Wires the reqwest Spotify client and the file token store.
    pub fn from_config(config: Config) -> Res<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        let provider: Arc<dyn Provider> = Arc::new(SpotifyClient::new(http.clone(), &config));
        let store: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::new(config.token_store_dir.clone()));
        Ok(Self::new(config, store, provider, http))
    }
}

/// Routes of the badge server. `/view.svg` serves the same badge as `/view`
/// for embeds that want a file extension.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/view", get(api::view))
        .route("/view.svg", get(api::view))
        .layer(Extension(state))
}

pub async fn start_api_server(state: Arc<AppState>) -> Res<()> {
    let addr = SocketAddr::from_str(&state.config.server_addr)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    success!("Serving badges on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
