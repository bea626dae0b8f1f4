//! # API Module
//!
//! HTTP endpoints of the badge server.
//!
//! ## Endpoints
//!
//! - [`login`] - redirects to Spotify's authorization page
//! - [`callback`] - completes the authorization code flow and stores the
//!   user's tokens
//! - [`view`] - renders the "now playing" badge for a user id
//! - [`health`] - status and version for monitoring
//!
//! Handlers receive the shared [`crate::server::AppState`] through an
//! [`axum::Extension`] layer.
//!
//! ```rust,ignore
//! use spotbadge::server::router;
//!
//! let app = router(Arc::new(state));
//! ```

mod callback;
mod health;
mod login;
mod view;

pub use callback::callback;
pub use health::health;
pub use login::login;
pub use view::ViewParams;
pub use view::view;
