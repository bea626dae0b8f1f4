//! Spotify "now playing" badge server.
//!
//! Serves an SVG badge showing the track or episode a Spotify user is playing,
//! or a random recently played track when the player is idle. Users authorize
//! once through the OAuth authorization code flow; their tokens are stored and
//! refreshed lazily whenever a badge is requested.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints (`/login`, `/callback`, `/view`, `/health`)
//! - `cli` - Command-line subcommands
//! - `config` - Environment based configuration
//! - `error` - Error types
//! - `management` - Token cache, token store, token and playback resolvers
//! - `render` - SVG badge rendering
//! - `server` - Shared state and router
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures
//! - `utils` - Formatting helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod render;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for startup and CLI plumbing, where any error simply ends the
/// command.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line with a blue bullet and a timestamp.
///
/// ```
/// info!("Refreshed access token for {}", user_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] {} {}",
      "o".blue().bold(),
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints a success line with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!(
      "[{}] {} {}",
      "✓".green().bold(),
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      std::format_args!($($arg)*)
    );
  })
}

/// Prints an error with a red exclamation mark and exits with code 1.
///
/// Only for fatal startup and CLI errors; request handlers report failures
/// with [`warning!`] and keep serving.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow exclamation mark and a timestamp.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!(
      "[{}] {} {}",
      "!".yellow().bold(),
      chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
      std::format_args!($($arg)*)
    );
  })
}
