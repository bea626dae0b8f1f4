use chrono::Utc;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Current time as epoch seconds, the unit every token expiry is kept in.
pub fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// Durable token state for one Spotify user.
///
/// A record without `expires_at` is always treated as expired, so a token of
/// unknown age is refreshed before it is ever handed to the player endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl TokenRecord {
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_ts())
    }

    pub fn apply(&mut self, update: &TokenUpdate) {
        self.access_token = update.access_token.clone();
        self.expires_at = Some(update.expires_at);
    }
}

/// Fields rewritten by a refresh. The refresh token is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUpdate {
    pub access_token: String,
    pub expires_at: i64,
}

/// Response of the `authorization_code` grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenGrant {
    pub fn into_record(self, user_id: String, now: i64) -> TokenRecord {
        TokenRecord {
            user_id,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Some(now.saturating_add(self.expires_in)),
        }
    }
}

/// Response of the `refresh_token` grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Error body returned by the accounts service on a rejected grant.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub publisher: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub show: Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Track,
    Episode,
}

/// A playable item, resolved once from the `type` field of the Web API
/// object so consumers never branch on a string tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlaybackItem {
    Track(Track),
    Episode(Episode),
}

impl PlaybackItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            PlaybackItem::Track(_) => ItemKind::Track,
            PlaybackItem::Episode(_) => ItemKind::Episode,
        }
    }

    /// First artist of a track, or the publisher of an episode's show.
    pub fn artist(&self) -> &str {
        match self {
            PlaybackItem::Track(track) => track
                .artists
                .first()
                .map(|artist| artist.name.as_str())
                .unwrap_or_default(),
            PlaybackItem::Episode(episode) => &episode.show.publisher,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlaybackItem::Track(track) => &track.name,
            PlaybackItem::Episode(episode) => &episode.name,
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            PlaybackItem::Track(track) => &track.uri,
            PlaybackItem::Episode(episode) => &episode.uri,
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            PlaybackItem::Track(track) => track.duration_ms,
            PlaybackItem::Episode(episode) => episode.duration_ms,
        }
    }

    pub fn images(&self) -> &[Image] {
        match self {
            PlaybackItem::Track(track) => &track.album.images,
            PlaybackItem::Episode(episode) => &episode.images,
        }
    }

    /// The medium sized cover (second image), falling back to the first.
    pub fn cover_url(&self) -> Option<&str> {
        let images = self.images();
        images
            .get(1)
            .or_else(|| images.first())
            .map(|image| image.url.as_str())
    }
}

/// Body of `GET /me/player/currently-playing`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<PlaybackItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub item: PlaybackItem,
    pub progress_ms: Option<u64>,
}

/// Body of `GET /me/player/recently-played`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    #[serde(default)]
    pub items: Vec<PlayHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
}

/// What the badge should show for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub item: Option<PlaybackItem>,
    pub is_now_playing: bool,
    pub progress_ms: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl PlaybackState {
    pub fn offline() -> Self {
        Self {
            item: None,
            is_now_playing: false,
            progress_ms: None,
            duration_ms: None,
        }
    }

    pub fn now_playing(now_playing: NowPlaying) -> Self {
        let duration_ms = now_playing.item.duration_ms();
        Self {
            item: Some(now_playing.item),
            is_now_playing: true,
            progress_ms: now_playing.progress_ms,
            duration_ms,
        }
    }

    /// Recently played items carry a duration but never a progress.
    pub fn recently_played(item: PlaybackItem) -> Self {
        let duration_ms = item.duration_ms();
        Self {
            item: Some(item),
            is_now_playing: false,
            progress_ms: None,
            duration_ms,
        }
    }
}

#[derive(Tabled)]
pub struct StoredTokenTableRow {
    pub user: String,
    pub expires: String,
}
