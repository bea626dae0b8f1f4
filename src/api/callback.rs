use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    error::{ProviderError, TokenError},
    server::AppState,
    success,
    types::now_ts,
    utils::escape_html,
    warning,
};

/// Completes the authorization code flow.
///
/// Exchanges the code, asks Spotify whose token it is and stores the full
/// token record under that user id, then shows the user their badge URL.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let Some(code) = params.get("code") else {
        if let Some(error) = params.get("error") {
            warning!("Authorization denied: {}", error);
            return Html("<h4>Login failed.</h4>").into_response();
        }
        return (StatusCode::BAD_REQUEST, "not ok").into_response();
    };

    let user_id = match authorize(&state, code).await {
        Ok(user_id) => user_id,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return (StatusCode::BAD_GATEWAY, Html("<h4>Login failed.</h4>")).into_response();
        }
    };

    success!("Authorized {}", user_id);
    Html(success_page(&state.config.base_url, &user_id)).into_response()
}

async fn authorize(state: &AppState, code: &str) -> Result<String, TokenError> {
    let grant = state.provider.exchange_code(code).await?;
    let user_id = state.provider.current_user_id(&grant.access_token).await?;
    if user_id.is_empty() {
        return Err(ProviderError::Api {
            status: 200,
            message: "profile without user id".to_string(),
        }
        .into());
    }

    let record = grant.into_record(user_id.clone(), now_ts());
    state.tokens.register(record).await?;
    Ok(user_id)
}

fn success_page(base_url: &str, user_id: &str) -> String {
    let uid = escape_html(user_id);
    let base_url = escape_html(base_url);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Spotify badge</title></head>
<body>
<h2>Authentication successful.</h2>
<p>Your badge:</p>
<img src="{base_url}/view?uid={uid}" alt="Spotify now playing"/>
<p>Markdown:</p>
<pre>[![spotify-badge]({base_url}/view?uid={uid})]({base_url}/view?uid={uid}&amp;redirect=true)</pre>
</body>
</html>
"#
    )
}
