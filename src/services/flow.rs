use crate::models::Track;
use crate::services::genres::seed_genres;
use crate::services::interpreter::MoodInterpreter;
use crate::services::recommender::RecommendationClient;
use std::sync::Arc;

pub const EMPTY_MOOD_MESSAGE: &str = "Please enter a mood!";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please login with Spotify first.";
pub const INTERPRETATION_FAILED_MESSAGE: &str = "Mood interpretation failed.";
pub const RECOMMENDATIONS_FAILED_MESSAGE: &str = "Spotify request failed.";

/// One pass through the mood-to-playlist sequence. Every submission starts
/// from `Idle`; terminal states carry everything the page renders.
#[derive(Debug, Clone)]
pub enum FlowState {
    Idle,
    Interpreting {
        mood: String,
    },
    FetchingTracks {
        interpretation: String,
    },
    Done {
        interpretation: String,
        tracks: Vec<Track>,
    },
    Failed {
        message: &'static str,
        /// Interpretation fetched before the failure stays visible.
        interpretation: Option<String>,
    },
}

impl FlowState {
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            FlowState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn interpretation(&self) -> Option<&str> {
        match self {
            FlowState::Done { interpretation, .. } => Some(interpretation),
            FlowState::Failed {
                interpretation: Some(text),
                ..
            } => Some(text),
            _ => None,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        match self {
            FlowState::Done { tracks, .. } => tracks,
            _ => &[],
        }
    }
}

/// Sequences interpreter then recommender, strictly awaited, no fan-out.
/// The interpreted prose is reused as the mood input for genre seeding.
pub struct PlaylistFlow {
    interpreter: Arc<MoodInterpreter>,
    recommender: Arc<RecommendationClient>,
}

impl PlaylistFlow {
    pub fn new(interpreter: Arc<MoodInterpreter>, recommender: Arc<RecommendationClient>) -> Self {
        Self {
            interpreter,
            recommender,
        }
    }

    pub async fn run(&self, mood: &str, access_token: Option<&str>) -> FlowState {
        // Guards reject before any outbound call.
        if mood.trim().is_empty() {
            return FlowState::Failed {
                message: EMPTY_MOOD_MESSAGE,
                interpretation: None,
            };
        }
        let Some(access_token) = access_token else {
            return FlowState::Failed {
                message: LOGIN_REQUIRED_MESSAGE,
                interpretation: None,
            };
        };

        let mut state = FlowState::Interpreting {
            mood: mood.to_string(),
        };
        tracing::debug!("Flow state: {:?}", state);

        let interpretation = match self.interpreter.interpret(mood.trim()).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Mood interpretation failed: {:?}", e);
                return FlowState::Failed {
                    message: INTERPRETATION_FAILED_MESSAGE,
                    interpretation: None,
                };
            }
        };

        state = FlowState::FetchingTracks {
            interpretation: interpretation.clone(),
        };
        tracing::debug!("Flow state: {:?}", state);

        let seeds = seed_genres(&interpretation);
        match self.recommender.recommendations(&seeds, access_token).await {
            Ok(recs) => FlowState::Done {
                interpretation,
                tracks: recs.tracks,
            },
            Err(e) => {
                tracing::error!("Recommendation fetch failed: {:?}", e);
                FlowState::Failed {
                    message: RECOMMENDATIONS_FAILED_MESSAGE,
                    interpretation: Some(interpretation),
                }
            }
        }
    }
}
