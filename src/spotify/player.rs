use reqwest::StatusCode;

use crate::{
    error::ProviderError,
    spotify::{SpotifyClient, error_from_response},
    types::{
        CurrentlyPlayingResponse, NowPlaying, PlaybackItem, RecentlyPlayedResponse,
    },
};

/// Fetches what the user is playing right now, tracks and podcast episodes.
///
/// Spotify answers `204 No Content` when there is no active device, and a
/// body with a null `item` while an ad or an unknown item plays. Both count
/// as nothing playing.
pub async fn now_playing(
    client: &SpotifyClient,
    access_token: &str,
) -> Result<Option<NowPlaying>, ProviderError> {
    let res = client
        .http
        .get(client.api("/me/player/currently-playing"))
        .query(&[("additional_types", "track,episode")])
        .bearer_auth(access_token)
        .send()
        .await?;

    if res.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }

    let body = res.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    let current: CurrentlyPlayingResponse = serde_json::from_str(&body)?;
    Ok(current.item.map(|item| NowPlaying {
        item,
        progress_ms: current.progress_ms,
    }))
}

/// Fetches the user's play history, newest first.
pub async fn recently_played(
    client: &SpotifyClient,
    access_token: &str,
    limit: u32,
) -> Result<Vec<PlaybackItem>, ProviderError> {
    let res = client
        .http
        .get(client.api("/me/player/recently-played"))
        .query(&[("limit", limit)])
        .bearer_auth(access_token)
        .send()
        .await?;

    if res.status() == StatusCode::NO_CONTENT {
        return Ok(Vec::new());
    }
    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }

    let body = res.text().await?;
    let history: RecentlyPlayedResponse = serde_json::from_str(&body)?;
    Ok(history
        .items
        .into_iter()
        .map(|played| PlaybackItem::Track(played.track))
        .collect())
}
