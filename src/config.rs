//! Configuration management for the badge server.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`<data_local_dir>/spotbadge/.env`)
//! 4. Defaults for everything that has a sensible one

use std::{env, path::PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5003";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "user-read-currently-playing,user-read-recently-played";
pub const DEFAULT_RECENTLY_PLAYED_LIMIT: u32 = 10;

/// Returns the application directory inside the platform local data dir.
///
/// - Linux: `~/.local/share/spotbadge`
/// - macOS: `~/Library/Application Support/spotbadge`
/// - Windows: `%LOCALAPPDATA%/spotbadge`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotbadge");
    path
}

/// Loads `.env` files into the process environment.
///
/// Variables already present in the environment are never overwritten, so the
/// working directory file wins over the one in the data directory. Missing
/// files are fine; a file that exists but cannot be parsed is an error.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(e.to_string());
        }
    }

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
    pub token_store_dir: PathBuf,
    pub recently_played_limit: u32,
    pub login_help_url: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = required("BASE_URL")?.trim_end_matches('/').to_string();

        let recently_played_limit = match optional("RECENTLY_PLAYED_LIMIT") {
            Some(value) => match value.parse::<u32>() {
                Ok(limit) if (1..=50).contains(&limit) => limit,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "RECENTLY_PLAYED_LIMIT",
                        value,
                    });
                }
            },
            None => DEFAULT_RECENTLY_PLAYED_LIMIT,
        };

        let login_help_url =
            optional("LOGIN_REDIRECT_URL").unwrap_or_else(|| format!("{}/login", base_url));

        Ok(Self {
            server_addr: optional("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_SECRET_ID")?,
            api_url: optional("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: optional("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: optional("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            token_store_dir: optional("TOKEN_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("tokens")),
            recently_played_limit,
            login_help_url,
            base_url,
        })
    }

    /// The OAuth redirect URI registered with the Spotify application.
    pub fn redirect_uri(&self) -> String {
        format!("{}/callback", self.base_url)
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    optional(var).ok_or(ConfigError::Missing(var))
}

fn optional(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}
