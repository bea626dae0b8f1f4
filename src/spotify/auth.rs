use reqwest::Url;

use crate::{
    config::Config,
    error::ProviderError,
    spotify::{SpotifyClient, error_from_response},
    types::{RefreshedToken, TokenGrant, UserProfile},
};

/// Exchanges an authorization code for an access and refresh token.
///
/// Uses the confidential client flow: the client credentials are sent as
/// HTTP Basic auth and the redirect URI must match the one used for the
/// authorization request.
///
/// # Errors
///
/// - [`ProviderError::InvalidGrant`] - the code is unknown, used or expired
/// - [`ProviderError::Api`] - any other rejection
/// - [`ProviderError::Transport`] - network failure
pub async fn exchange_code(client: &SpotifyClient, code: &str) -> Result<TokenGrant, ProviderError> {
    let res = client
        .http
        .post(&client.token_url)
        .basic_auth(&client.client_id, Some(&client.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &client.redirect_uri),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }

    let body = res.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Mints a new access token from a refresh token.
///
/// Spotify does not rotate refresh tokens for this grant, so only the access
/// token and its lifetime are returned.
pub async fn refresh_token(
    client: &SpotifyClient,
    refresh_token: &str,
) -> Result<RefreshedToken, ProviderError> {
    let res = client
        .http
        .post(&client.token_url)
        .basic_auth(&client.client_id, Some(&client.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }

    let body = res.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// Looks up the Spotify user id owning `access_token`.
pub async fn current_user_id(
    client: &SpotifyClient,
    access_token: &str,
) -> Result<String, ProviderError> {
    let res = client
        .http
        .get(client.api("/me"))
        .bearer_auth(access_token)
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }

    let body = res.text().await?;
    let profile: UserProfile = serde_json::from_str(&body)?;
    Ok(profile.id)
}

/// Builds the authorization page URL a user is sent to by `/login`.
pub fn authorize_url(config: &Config) -> Result<String, String> {
    let redirect_uri = config.redirect_uri();
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", config.scope.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    )
    .map_err(|e| e.to_string())?;
    Ok(url.into())
}
