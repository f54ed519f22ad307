use crate::api::AppState;
use crate::error::{AppError, Result as AppResult};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn mood_routes() -> Router<Arc<AppState>> {
    Router::new().route("/mood", post(interpret_mood))
}

#[derive(Debug, Deserialize, Validate)]
pub struct MoodRequest {
    #[validate(length(min = 1, message = "mood must not be empty"))]
    pub mood: String,
}

#[derive(Debug, Serialize)]
struct MoodResponse {
    text: String,
}

async fn interpret_mood(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoodRequest>,
) -> AppResult<Json<MoodResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if req.mood.trim().is_empty() {
        return Err(AppError::Validation("mood must not be empty".to_string()));
    }

    let text = state.interpreter.interpret(req.mood.trim()).await?;
    Ok(Json(MoodResponse { text }))
}
