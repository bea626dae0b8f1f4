use std::fmt::Write;

use rand::Rng;
use rustrict::{Censor, Type};

/// Escapes text for use inside markup and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Masks profanity in an artist or item name.
///
/// Clean names come back unchanged. In a masked name the first character of
/// the first masked stretch and the last character of the last one stay
/// readable, so the word is still recognizable without being spelled out.
///
/// # Arguments
///
/// * `name` - Artist, publisher or item name as reported by Spotify
///
/// # Example
///
/// ```
/// assert_eq!(censor_name("Hello World"), "Hello World");
/// assert_eq!(censor_name("fuck"), "f**k");
/// ```
pub fn censor_name(name: &str) -> String {
    let censored = Censor::from_str(name)
        .with_censor_threshold(Type::INAPPROPRIATE)
        .with_censor_first_character_threshold(Type::INAPPROPRIATE)
        .censor();
    if censored == name {
        return name.to_string();
    }
    reveal_masked_edges(name, &censored)
}

/// Restores the opening character of the first `*` run and the closing
/// character of the last one. A lone `*` stays masked.
///
/// When the censored text does not line up with the original character by
/// character it is returned as is.
pub fn reveal_masked_edges(original: &str, censored: &str) -> String {
    let original: Vec<char> = original.chars().collect();
    let mut masked: Vec<char> = censored.chars().collect();
    if original.len() != masked.len() {
        return censored.to_string();
    }

    let len = masked.len();
    if let Some(i) = (0..len.saturating_sub(1)).find(|&i| masked[i] == '*' && masked[i + 1] == '*') {
        masked[i] = original[i];
    }
    if let Some(i) = (1..len).rev().find(|&i| masked[i] == '*' && masked[i - 1] == '*') {
        masked[i] = original[i];
    }
    masked.into_iter().collect()
}

/// Formats milliseconds as `M:SS`.
pub fn format_time_ms(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressData {
    pub percentage: f64,
    pub current_time: String,
    pub remaining_time: String,
}

/// Progress bar figures for a position inside a track.
///
/// The position is clamped to the duration; an unknown or zero duration gives
/// an empty bar.
pub fn calculate_progress(progress_ms: u64, duration_ms: u64) -> ProgressData {
    if duration_ms == 0 {
        return ProgressData {
            percentage: 0.0,
            current_time: format_time_ms(0),
            remaining_time: format_time_ms(0),
        };
    }

    let progress_ms = progress_ms.min(duration_ms);
    ProgressData {
        percentage: progress_ms as f64 / duration_ms as f64 * 100.0,
        current_time: format_time_ms(progress_ms),
        remaining_time: format!("-{}", format_time_ms(duration_ms - progress_ms)),
    }
}

/// CSS placing `num_bar` equalizer bars 4px apart, each bouncing at a random
/// speed between 350 and 500 ms.
pub fn generate_css_bar<R: Rng>(num_bar: u32, rng: &mut R) -> String {
    let mut css = String::new();
    let mut left = 1;
    for i in 1..=num_bar {
        let anim: u32 = rng.random_range(350..=500);
        let _ = write!(
            css,
            ".bar:nth-child({i})  {{ left: {left}px; animation-duration: {anim}ms; }}"
        );
        left += 4;
    }
    css
}

/// Accepts `rgb` or `rrggbb` hex colors (without `#`), anything else gets the
/// fallback so query parameters never reach the stylesheet unchecked.
pub fn sanitize_hex_color(color: &str, fallback: &str) -> String {
    let color = color.trim_start_matches('#');
    let valid = matches!(color.len(), 3 | 6) && color.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        color.to_ascii_lowercase()
    } else {
        fallback.to_string()
    }
}
