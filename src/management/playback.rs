use std::sync::Arc;

use rand::Rng;

use crate::{
    config::DEFAULT_RECENTLY_PLAYED_LIMIT,
    error::PlaybackError,
    management::TokenResolver,
    spotify::Provider,
    types::{PlaybackItem, PlaybackState},
};

/// Decides what a badge shows: the current item, else a random recently
/// played track, else offline.
pub struct PlaybackResolver {
    provider: Arc<dyn Provider>,
    recently_played_limit: u32,
}

impl PlaybackResolver {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            recently_played_limit: DEFAULT_RECENTLY_PLAYED_LIMIT,
        }
    }

    pub fn with_recently_played_limit(mut self, limit: u32) -> Self {
        self.recently_played_limit = limit;
        self
    }

    /// Resolves the playback state for an already valid access token.
    ///
    /// With `show_offline` set an idle player resolves to offline straight
    /// away and the recently played endpoint is never queried.
    pub async fn resolve_playback(
        &self,
        access_token: &str,
        show_offline: bool,
    ) -> Result<PlaybackState, PlaybackError> {
        if let Some(now_playing) = self.provider.now_playing(access_token).await? {
            return Ok(PlaybackState::now_playing(now_playing));
        }

        if show_offline {
            return Ok(PlaybackState::offline());
        }

        let recent = self
            .provider
            .recently_played(access_token, self.recently_played_limit)
            .await?;

        Ok(match pick_recent(recent, &mut rand::rng()) {
            Some(item) => PlaybackState::recently_played(item),
            None => PlaybackState::offline(),
        })
    }

    /// Resolves a token for `user_id` once, then its playback state.
    ///
    /// Token failures surface as [`PlaybackError::Unauthorized`]; nothing is
    /// retried within a request.
    pub async fn resolve_for_user(
        &self,
        tokens: &TokenResolver,
        user_id: &str,
        show_offline: bool,
    ) -> Result<PlaybackState, PlaybackError> {
        let access_token = tokens.resolve_access_token(user_id).await?;
        self.resolve_playback(&access_token, show_offline).await
    }
}

/// Picks one item uniformly at random, not just the most recent one, so a
/// badge varies between requests while the player is idle.
pub fn pick_recent<R: Rng>(
    mut items: Vec<PlaybackItem>,
    rng: &mut R,
) -> Option<PlaybackItem> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..items.len());
    Some(items.swap_remove(idx))
}
