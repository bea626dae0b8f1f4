mod cache;
mod playback;
mod store;
mod token;

pub use cache::TokenCache;
pub use playback::PlaybackResolver;
pub use playback::pick_recent;
pub use store::FileTokenStore;
pub use store::MemoryTokenStore;
pub use store::TokenStore;
pub use token::TokenResolver;
