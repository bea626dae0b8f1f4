use std::sync::Arc;

use crate::{
    config::Config,
    error, info,
    server::{AppState, start_api_server},
};

/// Runs the badge server until it fails or the process is stopped.
pub async fn serve(addr: Option<String>) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    if let Some(addr) = addr {
        config.server_addr = addr;
    }

    info!("Token store at {}", config.token_store_dir.display());
    info!("Redirect URI is {}", config.redirect_uri());

    let state = match AppState::from_config(config) {
        Ok(state) => Arc::new(state),
        Err(e) => error!("Cannot set up the server: {}", e),
    };

    if let Err(e) = start_api_server(state).await {
        error!("Server stopped: {}", e);
    }
}
