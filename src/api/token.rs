use crate::api::AppState;
use crate::config::AuthMode;
use crate::error::Result;
use crate::models::TokenResponse;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Cookie carrying the anti-forgery state between login start and callback.
pub const AUTH_STATE_COOKIE: &str = "spotify_auth_state";

/// How long a pending login may take before the state cookie lapses.
pub const AUTH_STATE_MAX_AGE_SECS: u64 = 600;

pub fn token_routes() -> Router<Arc<AppState>> {
    Router::new().route("/spotify-token", get(token).post(exchange_code))
}

#[derive(Debug, Serialize)]
struct AuthUrlResponse {
    #[serde(rename = "authUrl")]
    auth_url: String,
    state: String,
}

/// Service mode: a fresh client-credentials token. User mode: the
/// authorization URL to redirect the browser to, with the state cookie set
/// for the callback cross-check.
async fn token(State(state): State<Arc<AppState>>) -> Result<Response> {
    match state.config.auth_mode {
        AuthMode::Service => {
            let token = state.token_exchanger.exchange_client_credentials().await?;
            Ok(Json(token).into_response())
        }
        AuthMode::User => {
            let (auth_url, auth_state) = state.token_exchanger.authorize_url()?;
            let cookie = format!(
                "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
                AUTH_STATE_COOKIE, auth_state, AUTH_STATE_MAX_AGE_SECS
            );
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(AuthUrlResponse {
                    auth_url,
                    state: auth_state,
                }),
            )
                .into_response())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeCodeRequest {
    code: String,
}

async fn exchange_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExchangeCodeRequest>,
) -> Result<Json<TokenResponse>> {
    let token = state
        .token_exchanger
        .exchange_authorization_code(&req.code)
        .await?;
    Ok(Json(token))
}
