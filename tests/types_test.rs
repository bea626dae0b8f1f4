use spotbadge::types::{
    CurrentlyPlayingResponse, ItemKind, PlaybackItem, RecentlyPlayedResponse, TokenGrant,
};

const CURRENT_TRACK: &str = r#"{
  "timestamp": 1700000000000,
  "progress_ms": 42000,
  "is_playing": true,
  "currently_playing_type": "track",
  "item": {
    "type": "track",
    "id": "4uLU6hMCjMI75M1A2tKUQC",
    "name": "Never Gonna Give You Up",
    "uri": "spotify:track:4uLU6hMCjMI75M1A2tKUQC",
    "duration_ms": 213573,
    "explicit": false,
    "artists": [{"name": "Rick Astley", "id": "0gxyHStUsqpMadRV0Di1Qt"}],
    "album": {
      "name": "Whenever You Need Somebody",
      "images": [
        {"url": "https://i.scdn.co/image/640", "height": 640, "width": 640},
        {"url": "https://i.scdn.co/image/300", "height": 300, "width": 300},
        {"url": "https://i.scdn.co/image/64", "height": 64, "width": 64}
      ]
    }
  }
}"#;

const CURRENT_EPISODE: &str = r#"{
  "progress_ms": 1000,
  "currently_playing_type": "episode",
  "item": {
    "type": "episode",
    "name": "Episode 12",
    "uri": "spotify:episode:512ojhOuo1ktJprKbVcKyQ",
    "duration_ms": 1686230,
    "images": [{"url": "https://i.scdn.co/image/ep", "height": 640, "width": 640}],
    "show": {"name": "The Show", "publisher": "Some Network"}
  }
}"#;

const CURRENT_AD: &str = r#"{
  "progress_ms": 5000,
  "currently_playing_type": "ad",
  "item": null
}"#;

#[test]
fn test_currently_playing_track() {
    let current: CurrentlyPlayingResponse = serde_json::from_str(CURRENT_TRACK).unwrap();
    let item = current.item.unwrap();

    assert_eq!(current.progress_ms, Some(42000));
    assert_eq!(item.kind(), ItemKind::Track);
    assert_eq!(item.artist(), "Rick Astley");
    assert_eq!(item.name(), "Never Gonna Give You Up");
    assert_eq!(item.duration_ms(), Some(213573));
    assert_eq!(item.cover_url(), Some("https://i.scdn.co/image/300"));
}

#[test]
fn test_currently_playing_episode() {
    let current: CurrentlyPlayingResponse = serde_json::from_str(CURRENT_EPISODE).unwrap();
    let item = current.item.unwrap();

    assert_eq!(item.kind(), ItemKind::Episode);
    assert_eq!(item.artist(), "Some Network");
    // a single image is used as the cover
    assert_eq!(item.cover_url(), Some("https://i.scdn.co/image/ep"));
}

#[test]
fn test_currently_playing_ad_has_no_item() {
    let current: CurrentlyPlayingResponse = serde_json::from_str(CURRENT_AD).unwrap();
    assert!(current.item.is_none());
}

#[test]
fn test_recently_played() {
    let body = format!(
        r#"{{"items": [{{"played_at": "2026-01-01T00:00:00Z", "track": {} }}], "limit": 10}}"#,
        r#"{"name": "Song", "uri": "spotify:track:1", "artists": [], "album": {"images": []}}"#
    );
    let history: RecentlyPlayedResponse = serde_json::from_str(&body).unwrap();

    assert_eq!(history.items.len(), 1);
    let item = PlaybackItem::Track(history.items[0].track.clone());
    // no artists and no duration still make a usable item
    assert_eq!(item.artist(), "");
    assert_eq!(item.duration_ms(), None);
    assert_eq!(item.cover_url(), None);
}

#[test]
fn test_token_grant() {
    let grant: TokenGrant = serde_json::from_str(
        r#"{"access_token":"A","token_type":"Bearer","scope":"user-read-recently-played","expires_in":3600,"refresh_token":"R"}"#,
    )
    .unwrap();
    assert_eq!(grant.expires_in, 3600);
    assert_eq!(grant.refresh_token, "R");
}
