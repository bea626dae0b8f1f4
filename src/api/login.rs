use std::sync::Arc;

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{server::AppState, spotify::auth::authorize_url, warning};

pub async fn login(Extension(state): Extension<Arc<AppState>>) -> Response {
    match authorize_url(&state.config) {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(e) => {
            warning!("Cannot build authorization url: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "not ok").into_response()
        }
    }
}
