use std::sync::Arc;

use chrono::DateTime;
use reqwest::Client;
use tabled::Table;

use crate::{
    config::Config,
    error, info,
    management::{FileTokenStore, TokenCache, TokenResolver, TokenStore},
    spotify::SpotifyClient,
    success,
    types::{StoredTokenTableRow, TokenRecord, now_ts},
};

fn config() -> Config {
    match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

fn store() -> FileTokenStore {
    FileTokenStore::new(config().token_store_dir)
}

fn resolver() -> TokenResolver {
    let config = config();
    TokenResolver::new(
        Arc::new(TokenCache::new()),
        Arc::new(FileTokenStore::new(config.token_store_dir.clone())),
        Arc::new(SpotifyClient::new(Client::new(), &config)),
    )
}

/// Lists the users with stored tokens and when their access token expires.
pub async fn list_tokens() {
    let records = match store().list().await {
        Ok(records) => records,
        Err(e) => error!("Cannot read token store: {}", e),
    };

    if records.is_empty() {
        info!("No authorized users yet.");
        return;
    }

    let now = now_ts();
    let rows: Vec<StoredTokenTableRow> = records.iter().map(|r| table_row(r, now)).collect();
    println!("{}", Table::new(rows));
}

pub fn table_row(record: &TokenRecord, now: i64) -> StoredTokenTableRow {
    let expires = match record.expires_at.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        Some(at) if record.is_expired_at(now) => format!("{} (expired)", at.format("%Y-%m-%d %H:%M:%S")),
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "unknown (refresh on next use)".to_string(),
    };
    StoredTokenTableRow {
        user: record.user_id.clone(),
        expires,
    }
}

/// Deletes the stored token of `user_id`; their badge shows the re-login
/// message until they authorize again.
pub async fn revoke(user_id: String) {
    let tokens = resolver();
    match tokens.store().get(&user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => error!("No token stored for {}", user_id),
        Err(e) => error!("Cannot read token store: {}", e),
    }

    if let Err(e) = tokens.forget(&user_id).await {
        error!("Cannot delete token of {}: {}", user_id, e);
    }
    success!("Removed token of {}", user_id);
}
