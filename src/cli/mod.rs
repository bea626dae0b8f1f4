//! # CLI Module
//!
//! Subcommands of the `spotbadge` binary:
//!
//! - [`serve`] - runs the badge server
//! - [`login`] - opens the authorization page to register a user
//! - [`list_tokens`] - shows stored users and token expiry
//! - [`revoke`] - forgets a user's stored token
//!
//! ```bash
//! spotbadge serve --addr 0.0.0.0:5003
//! spotbadge login
//! spotbadge tokens
//! spotbadge revoke 31abcxyz
//! ```
//!
//! Every command reads its configuration through [`crate::config::Config`]
//! and exits with an error message on failure.

mod login;
mod serve;
mod tokens;

pub use login::login;
pub use serve::serve;
pub use tokens::list_tokens;
pub use tokens::revoke;
pub use tokens::table_row;
