mod common;

use std::sync::{Arc, atomic::Ordering};

use common::{FakeProvider, episode, harness, track, valid_record};
use rand::{SeedableRng, rngs::StdRng};
use spotbadge::{
    error::{PlaybackError, TokenError},
    management::{PlaybackResolver, TokenStore, pick_recent},
    spotify::Provider,
    types::{ItemKind, NowPlaying, PlaybackState},
};

fn resolver(provider: &Arc<FakeProvider>) -> PlaybackResolver {
    PlaybackResolver::new(Arc::clone(provider) as Arc<dyn Provider>)
}

#[tokio::test]
async fn test_now_playing_item_wins() {
    let provider = Arc::new(FakeProvider::new().with_now_playing(NowPlaying {
        item: track("Song", "Artist"),
        progress_ms: Some(42_000),
    }));

    let state = resolver(&provider)
        .resolve_playback("token", false)
        .await
        .unwrap();

    assert!(state.is_now_playing);
    assert_eq!(state.item, Some(track("Song", "Artist")));
    assert_eq!(state.progress_ms, Some(42_000));
    assert_eq!(state.duration_ms, Some(200_000));
    assert_eq!(provider.recent_calls(), 0);
}

#[tokio::test]
async fn test_show_offline_never_queries_recently_played() {
    let provider = Arc::new(FakeProvider::new().with_recent(vec![track("Old", "Artist")]));

    let state = resolver(&provider)
        .resolve_playback("token", true)
        .await
        .unwrap();

    assert_eq!(state, PlaybackState::offline());
    assert_eq!(provider.now_playing_calls(), 1);
    assert_eq!(provider.recent_calls(), 0);
}

#[tokio::test]
async fn test_idle_player_picks_one_of_the_recent_tracks() {
    let items = vec![track("One", "A"), track("Two", "B"), track("Three", "C")];
    let provider = Arc::new(FakeProvider::new().with_recent(items.clone()));

    let state = resolver(&provider)
        .resolve_playback("token", false)
        .await
        .unwrap();

    let item = state.item.expect("a recent item");
    assert!(items.contains(&item));
    assert!(!state.is_now_playing);
    assert_eq!(state.progress_ms, None);
    assert_eq!(state.duration_ms, Some(200_000));
    assert_eq!(provider.last_recent_limit.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_recently_played_limit_is_configurable() {
    let provider = Arc::new(FakeProvider::new().with_recent(vec![track("One", "A")]));

    resolver(&provider)
        .with_recently_played_limit(3)
        .resolve_playback("token", false)
        .await
        .unwrap();

    assert_eq!(provider.last_recent_limit.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_empty_history_is_offline() {
    let provider = Arc::new(FakeProvider::new());

    let state = resolver(&provider)
        .resolve_playback("token", false)
        .await
        .unwrap();

    assert_eq!(state, PlaybackState::offline());
    assert_eq!(provider.recent_calls(), 1);
}

#[tokio::test]
async fn test_single_recent_track_is_always_chosen() {
    let provider = Arc::new(FakeProvider::new().with_recent(vec![track("Only", "A")]));
    let resolver = resolver(&provider);

    for _ in 0..20 {
        let state = resolver.resolve_playback("token", false).await.unwrap();
        assert_eq!(state.item, Some(track("Only", "A")));
    }
}

#[test]
fn test_pick_recent_stays_in_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    let items = vec![track("One", "A"), track("Two", "B"), track("Three", "C")];

    let mut seen = Vec::new();
    for _ in 0..200 {
        let item = pick_recent(items.clone(), &mut rng).unwrap();
        assert!(items.contains(&item));
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    // not just the most recent one
    assert_eq!(seen.len(), 3);
    assert!(pick_recent(Vec::new(), &mut rng).is_none());
}

#[tokio::test]
async fn test_episode_is_tagged_and_uses_publisher() {
    let provider = Arc::new(FakeProvider::new().with_now_playing(NowPlaying {
        item: episode("Episode 12", "Some Network"),
        progress_ms: Some(1_000),
    }));

    let state = resolver(&provider)
        .resolve_playback("token", false)
        .await
        .unwrap();

    let item = state.item.unwrap();
    assert_eq!(item.kind(), ItemKind::Episode);
    assert_eq!(item.artist(), "Some Network");
    assert_eq!(item.name(), "Episode 12");
    assert_eq!(item.cover_url(), Some("https://i.scdn.co/image/medium"));
}

#[tokio::test]
async fn test_now_playing_failure_is_upstream() {
    let provider = Arc::new(FakeProvider::new());
    *provider.now_playing_fails.lock().unwrap() = true;

    let err = resolver(&provider)
        .resolve_playback("token", false)
        .await
        .unwrap_err();

    assert!(matches!(err, PlaybackError::Upstream(_)));
    assert_eq!(provider.recent_calls(), 0);
}

#[tokio::test]
async fn test_token_failure_is_unauthorized_and_skips_player() {
    let h = harness(FakeProvider::new());
    let playback = resolver(&h.provider);

    let err = playback
        .resolve_for_user(&h.resolver, "nobody", false)
        .await
        .unwrap_err();

    assert!(matches!(err, PlaybackError::Unauthorized(TokenError::NotFound)));
    assert_eq!(h.provider.now_playing_calls(), 0);
}

#[tokio::test]
async fn test_resolve_for_user_uses_stored_token() {
    let h = harness(FakeProvider::new().with_recent(vec![track("One", "A")]));
    h.store.set(&valid_record("u1", "A")).await.unwrap();
    let playback = resolver(&h.provider);

    let state = playback
        .resolve_for_user(&h.resolver, "u1", false)
        .await
        .unwrap();

    assert_eq!(state.item, Some(track("One", "A")));
    assert_eq!(h.provider.refresh_calls(), 0);
}
