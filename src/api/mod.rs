pub mod callback;
pub mod health;
pub mod middleware;
pub mod mood;
pub mod pages;
pub mod playlist;
pub mod token;

use crate::config::Config;
use crate::services::{MoodInterpreter, PlaylistFlow, RecommendationClient, TokenExchanger};
use axum::{routing::get, Router};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub interpreter: Arc<MoodInterpreter>,
    pub token_exchanger: Arc<TokenExchanger>,
    pub recommender: Arc<RecommendationClient>,
    pub flow: Arc<PlaylistFlow>,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let interpreter = Arc::new(MoodInterpreter::new(&config));
        let token_exchanger = Arc::new(TokenExchanger::new(&config));
        let recommender = Arc::new(RecommendationClient::new(&config));
        let flow = Arc::new(PlaylistFlow::new(interpreter.clone(), recommender.clone()));

        AppState {
            config,
            interpreter,
            token_exchanger,
            recommender,
            flow,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health::health))
                .merge(mood::mood_routes())
                .merge(token::token_routes())
                .merge(playlist::playlist_routes()),
        )
        .merge(callback::callback_routes())
        .merge(pages::page_routes())
        .with_state(state)
}
