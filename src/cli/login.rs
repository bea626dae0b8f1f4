use crate::{config::Config, error, info, spotify::auth::authorize_url, warning};

/// Prints the authorization URL and opens it in the default browser.
///
/// The server has to be running for the callback to complete the login.
pub async fn login() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let url = match authorize_url(&config) {
        Ok(url) => url,
        Err(e) => error!("Cannot build authorization url: {}", e),
    };

    info!("Authorize at:\n{}", url);
    if webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually.");
    }
}
