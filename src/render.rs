//! SVG rendering of a resolved playback state.
//!
//! The badge is an SVG wrapping an XHTML `foreignObject`, so the themes are
//! plain HTML and CSS. Every piece of user controlled text is escaped and
//! colors are validated before they are written into the stylesheet.

use std::fmt::Write;

use rand::Rng;

use crate::{
    types::PlaybackState,
    utils::{
        ProgressData, calculate_progress, censor_name, escape_html, generate_css_bar,
        sanitize_hex_color,
    },
};

pub const DEFAULT_BAR_COLOR: &str = "53b14f";
pub const DEFAULT_BACKGROUND_COLOR: &str = "121212";
pub const OFFLINE_ARTIST: &str = "Offline";
pub const OFFLINE_SONG: &str = "Currently not playing on Spotify";

const WIDTH: u32 = 480;

/// Card layouts selectable with the `theme` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Default,
    Compact,
    NatemooRe,
    Novatorem,
    Apple,
    SpotifyEmbed,
}

impl Theme {
    /// Maps a `theme` query value to a layout.
    ///
    /// # Arguments
    ///
    /// * `name` - Theme name, e.g. `compact` or `spotify-embed`
    ///
    /// # Example
    ///
    /// ```
    /// assert_eq!(Theme::parse("novatorem"), Theme::Novatorem);
    /// assert_eq!(Theme::parse("unknown"), Theme::Default);
    /// ```
    pub fn parse(name: &str) -> Self {
        match name {
            "compact" => Theme::Compact,
            "natemoo-re" => Theme::NatemooRe,
            "novatorem" => Theme::Novatorem,
            "apple" => Theme::Apple,
            "spotify-embed" => Theme::SpotifyEmbed,
            _ => Theme::Default,
        }
    }

    /// Name used in query strings and CSS class names.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Compact => "compact",
            Theme::NatemooRe => "natemoo-re",
            Theme::Novatorem => "novatorem",
            Theme::Apple => "apple",
            Theme::SpotifyEmbed => "spotify-embed",
        }
    }

    /// SVG height in pixels. Only `default` and `compact` shrink when the
    /// cover is left out; the other layouts reserve room for it either way.
    pub fn height(self, cover_image: bool) -> u32 {
        match self {
            Theme::Compact if cover_image => 400,
            Theme::Compact => 100,
            Theme::NatemooRe => 84,
            Theme::Novatorem => 100,
            Theme::Apple => 534,
            Theme::SpotifyEmbed => 152,
            Theme::Default if cover_image => 445,
            Theme::Default => 145,
        }
    }

    /// Equalizer bars drawn while something plays; zero for progress bar layouts.
    pub fn num_bar(self) -> u32 {
        match self {
            Theme::NatemooRe | Theme::Novatorem => 100,
            Theme::Apple | Theme::SpotifyEmbed => 0,
            Theme::Default | Theme::Compact => 75,
        }
    }

    /// Whether the layout shows elapsed and remaining time.
    pub fn shows_progress(self) -> bool {
        matches!(self, Theme::Apple | Theme::SpotifyEmbed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    /// `dark` selects dark text for light backgrounds; anything else is light.
    pub fn parse(name: &str) -> Self {
        if name == "dark" { Mode::Dark } else { Mode::Light }
    }

    fn text_colors(self) -> (&'static str, &'static str) {
        match self {
            Mode::Light => ("#ffffff", "#b3b3b3"),
            Mode::Dark => ("#121212", "#535353"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BadgeOptions {
    pub theme: Theme,
    pub mode: Mode,
    pub cover_image: bool,
    pub show_offline: bool,
    pub interchange: bool,
    pub bar_color: String,
    pub background_color: String,
}

impl Default for BadgeOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            mode: Mode::Light,
            cover_image: true,
            show_offline: false,
            interchange: false,
            bar_color: DEFAULT_BAR_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

/// Everything the template needs, already decided.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeContent {
    pub artist_name: String,
    pub song_name: String,
    pub cover_b64: Option<String>,
    pub is_now_playing: bool,
    pub progress_ms: Option<u64>,
    pub duration_ms: Option<u64>,
}

impl BadgeContent {
    /// Whether `state` is rendered as the offline card.
    pub fn is_offline(state: &PlaybackState, show_offline: bool) -> bool {
        state.item.is_none() || (show_offline && !state.is_now_playing)
    }

    /// Builds the card text for `state`; `cover_b64` is only kept for a
    /// card that shows an item.
    pub fn from_state(
        state: &PlaybackState,
        options: &BadgeOptions,
        cover_b64: Option<String>,
    ) -> Self {
        let (mut artist_name, mut song_name, cover_b64) =
            match state.item.as_ref() {
                Some(item) if !Self::is_offline(state, options.show_offline) => {
                    (censor_name(item.artist()), censor_name(item.name()), cover_b64)
                }
                _ => (OFFLINE_ARTIST.to_string(), OFFLINE_SONG.to_string(), None),
            };

        if options.interchange {
            std::mem::swap(&mut artist_name, &mut song_name);
        }

        Self {
            artist_name,
            song_name,
            cover_b64,
            is_now_playing: state.is_now_playing,
            progress_ms: state.progress_ms,
            duration_ms: state.duration_ms,
        }
    }

    pub fn title_text(&self, show_offline: bool) -> &'static str {
        if self.is_now_playing {
            "Now playing"
        } else if show_offline {
            "Not playing"
        } else {
            "Recently played"
        }
    }

    /// Progress figures for themes that draw a progress bar. Recently played
    /// items start at zero but still show their full length.
    pub fn progress(&self, theme: Theme) -> Option<ProgressData> {
        if !theme.shows_progress() {
            return None;
        }
        let duration_ms = self.duration_ms?;
        let progress_ms = match (self.is_now_playing, self.progress_ms) {
            (true, Some(progress_ms)) => progress_ms,
            _ => 0,
        };
        Some(calculate_progress(progress_ms, duration_ms))
    }
}

/// Renders the badge SVG.
///
/// # Arguments
///
/// * `content` - Text, cover and progress of the card
/// * `options` - Theme, mode and colors from the query string
/// * `rng` - Source for the equalizer bar speeds
///
/// # Example
///
/// ```
/// let options = BadgeOptions::default();
/// let content = BadgeContent::from_state(&PlaybackState::offline(), &options, None);
/// let svg = render_svg(&content, &options, &mut rand::rng());
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn render_svg<R: Rng>(content: &BadgeContent, options: &BadgeOptions, rng: &mut R) -> String {
    let theme = options.theme;
    let show_cover = options.cover_image && content.cover_b64.is_some();
    let height = theme.height(show_cover);
    let num_bar = theme.num_bar();
    let bar_color = sanitize_hex_color(&options.bar_color, DEFAULT_BAR_COLOR);
    let background_color = sanitize_hex_color(&options.background_color, DEFAULT_BACKGROUND_COLOR);
    let (text_color, sub_text_color) = options.mode.text_colors();

    let title_text = content.title_text(options.show_offline);
    let animate_bars = content.is_now_playing || !options.show_offline;
    let css_bar = if animate_bars && num_bar > 0 {
        generate_css_bar(num_bar, rng)
    } else {
        String::new()
    };
    let content_bar = if content.is_now_playing {
        "<div class='bar'></div>".repeat(num_bar as usize)
    } else {
        String::new()
    };

    let artist_name = escape_html(&content.artist_name);
    let song_name = escape_html(&content.song_name);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg width="{WIDTH}" height="{height}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" data-theme="{theme_name}">
<foreignObject width="{WIDTH}" height="{height}">
<div xmlns="http://www.w3.org/1999/xhtml" class="container">
<style>
div {{ font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Helvetica, Arial, sans-serif; }}
.container {{ background-color: #{background_color}; border-radius: 10px; padding: 10px; height: {inner_height}px; overflow: hidden; }}
.playing {{ font-weight: bold; color: #{bar_color}; margin-bottom: 8px; }}
.artist {{ font-weight: bold; font-size: 20px; color: {text_color}; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }}
.song {{ font-size: 16px; color: {sub_text_color}; overflow: hidden; white-space: nowrap; text-overflow: ellipsis; }}
.cover {{ width: 100%; border-radius: 5px; }}
#bars {{ position: relative; height: 30px; margin-top: 8px; }}
.bar {{ background: #{bar_color}; bottom: 1px; height: 3px; position: absolute; width: 3px; animation: sound 0ms -800ms linear infinite alternate; }}
@keyframes sound {{ 0% {{ opacity: .35; height: 3px; }} 100% {{ opacity: 1; height: 28px; }} }}
.progress {{ height: 4px; background: {sub_text_color}; border-radius: 2px; margin-top: 10px; }}
.progress-fill {{ height: 4px; background: #{bar_color}; border-radius: 2px; }}
.times {{ display: flex; justify-content: space-between; font-size: 12px; color: {sub_text_color}; }}
{css_bar}
</style>
<div class="playing">{title_text}</div>
"#,
        theme_name = theme.name(),
        inner_height = height.saturating_sub(20),
    );

    if show_cover {
        if let Some(cover) = &content.cover_b64 {
            let _ = writeln!(
                svg,
                r#"<img class="cover" src="data:image/jpeg;base64,{cover}"/>"#
            );
        }
    }

    let _ = writeln!(svg, r#"<div class="artist">{artist_name}</div>"#);
    let _ = writeln!(svg, r#"<div class="song">{song_name}</div>"#);

    if let Some(progress) = content.progress(theme) {
        let _ = write!(
            svg,
            r#"<div class="progress"><div class="progress-fill" style="width: {percentage:.2}%"></div></div>
<div class="times"><span>{current}</span><span>{remaining}</span></div>
"#,
            percentage = progress.percentage,
            current = progress.current_time,
            remaining = progress.remaining_time,
        );
    }

    if num_bar > 0 {
        let _ = writeln!(svg, r#"<div id="bars">{content_bar}</div>"#);
    }

    svg.push_str("</div>\n</foreignObject>\n</svg>\n");
    svg
}
