use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION},
    },
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::PlaybackError,
    render::{BadgeContent, BadgeOptions, Mode, Theme, render_svg},
    server::AppState,
    warning,
};

/// Query string of `GET /view`. Flags are on only when spelled `true`.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub uid: Option<String>,
    pub cover_image: Option<String>,
    pub redirect: Option<String>,
    pub theme: Option<String>,
    pub bar_color: Option<String>,
    pub background_color: Option<String>,
    pub show_offline: Option<String>,
    pub interchange: Option<String>,
    pub mode: Option<String>,
}

fn flag(value: &Option<String>, default: bool) -> bool {
    match value.as_deref() {
        Some(value) => value == "true",
        None => default,
    }
}

impl ViewParams {
    pub fn badge_options(&self) -> BadgeOptions {
        let defaults = BadgeOptions::default();
        BadgeOptions {
            theme: self.theme.as_deref().map(Theme::parse).unwrap_or_default(),
            mode: self.mode.as_deref().map(Mode::parse).unwrap_or_default(),
            cover_image: flag(&self.cover_image, true),
            show_offline: flag(&self.show_offline, false),
            interchange: flag(&self.interchange, false),
            bar_color: self.bar_color.clone().unwrap_or(defaults.bar_color),
            background_color: self
                .background_color
                .clone()
                .unwrap_or(defaults.background_color),
        }
    }

    pub fn wants_redirect(&self) -> bool {
        flag(&self.redirect, false)
    }
}

/// Renders the badge for `uid`.
pub async fn view(
    Query(params): Query<ViewParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let Some(uid) = params.uid.as_deref().filter(|uid| !uid.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "not ok").into_response();
    };
    let options = params.badge_options();

    let playback = match state
        .playback
        .resolve_for_user(&state.tokens, uid, options.show_offline)
        .await
    {
        Ok(playback) => playback,
        Err(PlaybackError::Unauthorized(e)) if e.needs_login() => {
            return format!(
                "Error: Invalid Spotify access_token or refresh_token. Possibly the token revoked. Please re-login at {}",
                state.config.login_help_url
            )
            .into_response();
        }
        Err(e) => {
            warning!("Cannot resolve playback for {}: {}", uid, e);
            return (
                StatusCode::BAD_GATEWAY,
                "Error: Spotify is not reachable right now. Please try again later.",
            )
                .into_response();
        }
    };

    let shown_item = match &playback.item {
        Some(item) if !BadgeContent::is_offline(&playback, options.show_offline) => Some(item),
        _ => None,
    };

    if let Some(item) = shown_item {
        if params.wants_redirect() {
            return (StatusCode::FOUND, [(LOCATION, item.uri().to_string())]).into_response();
        }
    }

    let cover_b64 = match shown_item.and_then(|item| item.cover_url()) {
        Some(url) if options.cover_image => load_image_b64(&state.http, url).await,
        _ => None,
    };

    let content = BadgeContent::from_state(&playback, &options, cover_b64);
    let svg = render_svg(&content, &options, &mut rand::rng());

    (
        [(CONTENT_TYPE, "image/svg+xml"), (CACHE_CONTROL, "s-maxage=1")],
        svg,
    )
        .into_response()
}

/// Downloads a cover image and base64 encodes it; failures render the badge
/// without a cover.
async fn load_image_b64(http: &Client, url: &str) -> Option<String> {
    let res = match http.get(url).send().await.and_then(|res| res.error_for_status()) {
        Ok(res) => res,
        Err(e) => {
            warning!("Error loading image from {}: {}", url, e);
            return None;
        }
    };

    match res.bytes().await {
        Ok(bytes) => Some(STANDARD.encode(bytes)),
        Err(e) => {
            warning!("Error loading image from {}: {}", url, e);
            None
        }
    }
}
