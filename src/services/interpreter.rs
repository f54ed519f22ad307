use crate::config::Config;
use crate::error::{AppError, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Total attempts for a rate-limited interpretation call (one retry).
const MAX_ATTEMPTS: u32 = 2;

/// Client for the generative-text provider's `generateContent` endpoint.
pub struct MoodInterpreter {
    api_key: Option<String>,
    api_url: String,
    retry_delay: Duration,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl MoodInterpreter {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            api_url: config.gemini_api_url.clone(),
            retry_delay: Duration::from_secs(config.interpreter_retry_delay_secs),
            client: Client::new(),
        }
    }

    /// Interpret a mood for music. Retries once on 429 after a flat delay;
    /// every other provider failure surfaces immediately.
    pub async fn interpret(&self, mood: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::Configuration("GEMINI_API_KEY"))?;

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: format!("Interpret this mood for music: {}", mood),
                }],
            }],
        };

        let mut attempt = 0;
        loop {
            attempt += 1;

            let response = self
                .client
                .post(&self.api_url)
                .query(&[("key", api_key)])
                .json(&request)
                .send()
                .await
                .map_err(|e| AppError::Transport(format!("Generative API request failed: {}", e)))?;

            let status = response.status();
            if status.is_success() {
                let data: GenerateResponse = response.json().await.map_err(|e| {
                    AppError::Transport(format!("Failed to parse generative response: {}", e))
                })?;
                return extract_text(data);
            }

            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_ATTEMPTS {
                tracing::warn!(
                    "Generative API rate limited, retrying in {}s",
                    self.retry_delay.as_secs()
                );
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            tracing::error!("Generative API error: {} - {}", status, body);
            return Err(AppError::Provider {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }
    }
}

/// First candidate, first part. An empty or absent text is a shape error,
/// never an empty interpretation.
fn extract_text(data: GenerateResponse) -> Result<String> {
    data.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Shape("generative response missing candidate text".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;

    fn interpreter_for(url: String) -> MoodInterpreter {
        let mut config = Config::for_tests();
        config.gemini_api_url = url;
        MoodInterpreter::new(&config)
    }

    fn candidate_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let stub = spawn_stub(vec![(200, candidate_body("Dreamy and slow."))]).await;
        let interpreter = interpreter_for(stub.url("/generate"));

        let text = interpreter.interpret("sleepy").await.unwrap();
        assert_eq!(text, "Dreamy and slow.");
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn retries_once_on_rate_limit_then_succeeds() {
        let stub = spawn_stub(vec![
            (429, r#"{"error":{"code":429}}"#.to_string()),
            (200, candidate_body("Bright and upbeat.")),
        ])
        .await;
        let interpreter = interpreter_for(stub.url("/generate"));

        let text = interpreter.interpret("happy").await.unwrap();
        assert_eq!(text, "Bright and upbeat.");
        assert_eq!(stub.calls().len(), 2);
    }

    #[tokio::test]
    async fn second_rate_limit_surfaces_provider_status() {
        let stub = spawn_stub(vec![
            (429, r#"{"error":{"code":429}}"#.to_string()),
            (429, r#"{"error":{"code":429}}"#.to_string()),
        ])
        .await;
        let interpreter = interpreter_for(stub.url("/generate"));

        match interpreter.interpret("happy").await {
            Err(AppError::Provider { status, .. }) => assert_eq!(status, 429),
            other => panic!("expected provider error, got {:?}", other.map(|_| ())),
        }
        // No third call
        assert_eq!(stub.calls().len(), 2);
    }

    #[tokio::test]
    async fn non_rate_limit_errors_are_not_retried() {
        let stub = spawn_stub(vec![(500, r#"{"error":"boom"}"#.to_string())]).await;
        let interpreter = interpreter_for(stub.url("/generate"));

        match interpreter.interpret("happy").await {
            Err(AppError::Provider { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected provider error, got {:?}", other.map(|_| ())),
        }
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_candidate_text_is_a_shape_error() {
        let stub = spawn_stub(vec![(200, r#"{"candidates":[]}"#.to_string())]).await;
        let interpreter = interpreter_for(stub.url("/generate"));

        assert!(matches!(
            interpreter.interpret("happy").await,
            Err(AppError::Shape(_))
        ));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_call() {
        let stub = spawn_stub(vec![]).await;
        let mut config = Config::for_tests();
        config.gemini_api_url = stub.url("/generate");
        config.gemini_api_key = None;
        let interpreter = MoodInterpreter::new(&config);

        assert!(matches!(
            interpreter.interpret("happy").await,
            Err(AppError::Configuration(_))
        ));
        assert!(stub.calls().is_empty());
    }
}
