use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    Configuration(&'static str),

    #[error("Provider returned {status} {status_text}")]
    Provider {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("Unexpected provider response shape: {0}")]
    Shape(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Configuration(what) => {
                tracing::error!("Missing configuration: {}", what);
                let body = Json(json!({ "error": format!("Missing configuration: {}", what) }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            AppError::Provider {
                status,
                status_text,
                body,
            } => {
                // Surface the provider's status as our own, with the raw body
                // attached (parsed when it is JSON).
                let details = serde_json::from_str::<serde_json::Value>(&body)
                    .unwrap_or_else(|_| json!(body));
                let payload = Json(json!({
                    "error": "Provider request failed",
                    "details": details,
                    "status": status,
                    "statusText": status_text,
                }));
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, payload).into_response()
            }
            AppError::Shape(ref msg) => {
                tracing::error!("Provider response shape error: {}", msg);
                let body = Json(json!({ "error": self.to_string() }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            AppError::Transport(ref msg) => {
                tracing::error!("Transport error: {}", msg);
                let body = Json(json!({ "error": "Something went wrong", "details": msg }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
            AppError::Validation(msg) => {
                let body = Json(json!({ "error": msg }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Unauthorized => {
                let body = Json(json!({ "error": "Unauthorized" }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                let body = Json(json!({ "error": "Internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
