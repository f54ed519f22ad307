use crate::api::middleware::BearerToken;
use crate::api::AppState;
use crate::config::AuthMode;
use crate::error::{AppError, Result as AppResult};
use crate::models::Track;
use crate::services::genres::seed_genres;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn playlist_routes() -> Router<Arc<AppState>> {
    Router::new().route("/spotify-playlist", post(recommend_playlist))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlaylistRequest {
    #[validate(length(min = 1, message = "mood must not be empty"))]
    pub mood: String,
}

#[derive(Debug, Serialize)]
struct PlaylistResponse {
    tracks: Vec<Track>,
    seeds: Vec<serde_json::Value>,
}

/// Recommendations for a mood. In user mode the caller's bearer token is
/// forwarded; in service mode a client-credentials token is fetched here.
async fn recommend_playlist(
    State(state): State<Arc<AppState>>,
    bearer: Option<BearerToken>,
    Json(req): Json<PlaylistRequest>,
) -> AppResult<Json<PlaylistResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let access_token = match state.config.auth_mode {
        AuthMode::User => bearer.ok_or(AppError::Unauthorized)?.0,
        AuthMode::Service => {
            state
                .token_exchanger
                .exchange_client_credentials()
                .await?
                .access_token
        }
    };

    let seeds = seed_genres(&req.mood);
    tracing::debug!("Mapped mood to seed genres: {}", seeds.as_param());

    let recs = state
        .recommender
        .recommendations(&seeds, &access_token)
        .await?;

    Ok(Json(PlaylistResponse {
        tracks: recs.tracks,
        seeds: recs.seeds,
    }))
}
