use crate::api::middleware::cookie_value;
use crate::api::token::AUTH_STATE_COOKIE;
use crate::api::AppState;
use crate::error::{AppError, Result};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Readable by the page script; max-age tracks the provider's expiry.
pub const ACCESS_TOKEN_COOKIE: &str = "spotify_access_token";
/// Server-only; fixed 30-day expiry.
pub const REFRESH_TOKEN_COOKIE: &str = "spotify_refresh_token";

const REFRESH_TOKEN_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

pub fn callback_routes() -> Router<Arc<AppState>> {
    Router::new().route("/callback", get(callback))
}

/// Spotify redirect target: exchanges the one-time code for tokens, sets the
/// token cookies, and sends the browser back to the root.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response> {
    let Some(code) = params.get("code") else {
        return Err(AppError::Validation(
            "Authorization failed: no code received".to_string(),
        ));
    };

    // The login URL embedded a state value; a callback that does not echo
    // the one we set in the cookie is rejected.
    let expected_state = cookie_value(&headers, AUTH_STATE_COOKIE);
    match (params.get("state"), expected_state) {
        (Some(echoed), Some(expected)) if *echoed == expected => {}
        (echoed, _) => {
            tracing::warn!("Rejecting callback with unverified state: {:?}", echoed);
            return Err(AppError::Validation(
                "Authorization failed: state mismatch".to_string(),
            ));
        }
    }

    let token = state.token_exchanger.exchange_authorization_code(code).await?;
    tracing::info!("Authorization code exchanged, setting token cookies");

    let mut response = Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, "/")
        .header(
            header::SET_COOKIE,
            format!(
                "{}={}; Path=/; Max-Age={}; SameSite=Lax",
                ACCESS_TOKEN_COOKIE, token.access_token, token.expires_in
            ),
        )
        // The pending-login state is single-use.
        .header(
            header::SET_COOKIE,
            format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", AUTH_STATE_COOKIE),
        );

    if let Some(refresh_token) = &token.refresh_token {
        response = response.header(
            header::SET_COOKIE,
            format!(
                "{}={}; Path=/; HttpOnly; Max-Age={}; SameSite=Lax",
                REFRESH_TOKEN_COOKIE, refresh_token, REFRESH_TOKEN_MAX_AGE_SECS
            ),
        );
    }

    response
        .body(Body::empty())
        .map_err(|e| AppError::Internal(e.into()))
}
