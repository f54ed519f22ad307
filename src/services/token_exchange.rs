use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::TokenResponse;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::Rng;
use reqwest::{header, Client};

/// OAuth2 credential exchange against the Spotify accounts service.
///
/// Both grants authenticate with HTTP Basic (base64 of `id:secret`); only
/// the form body differs. Exchange failures are never retried.
pub struct TokenExchanger {
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    scopes: String,
    token_url: String,
    authorize_endpoint: String,
    client: Client,
}

impl TokenExchanger {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            scopes: config.spotify_scopes.clone(),
            token_url: config.spotify_token_url.clone(),
            authorize_endpoint: config.spotify_authorize_url.clone(),
            client: Client::new(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(AppError::Configuration(
                "SPOTIFY_CLIENT_ID / SPOTIFY_CLIENT_SECRET",
            )),
        }
    }

    fn redirect_uri(&self) -> Result<&str> {
        self.redirect_uri
            .as_deref()
            .ok_or(AppError::Configuration("SPOTIFY_REDIRECT_URI"))
    }

    /// Service-level token, not tied to a user.
    pub async fn exchange_client_credentials(&self) -> Result<TokenResponse> {
        self.exchange(&[("grant_type", "client_credentials")]).await
    }

    /// User-level token pair from a one-time authorization code.
    pub async fn exchange_authorization_code(&self, code: &str) -> Result<TokenResponse> {
        let redirect_uri = self.redirect_uri()?;
        self.exchange(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    async fn exchange(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let (client_id, client_secret) = self.credentials()?;
        let basic = BASE64.encode(format!("{}:{}", client_id, client_secret));

        let response = self
            .client
            .post(&self.token_url)
            .header(header::AUTHORIZATION, format!("Basic {}", basic))
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Token request failed: {}", e)))?;

        // Read the body once; it is either the token payload or the error
        // detail we surface.
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!("Spotify token endpoint error: {} - {}", status, body);
            return Err(AppError::Provider {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Shape(format!("malformed token payload: {}", e)))
    }

    /// Authorization URL for the user-login flow, plus the anti-forgery
    /// state embedded in it. The callback handler checks the state echo
    /// against a cookie set alongside this URL.
    pub fn authorize_url(&self) -> Result<(String, String)> {
        let (client_id, _) = self.credentials()?;
        let redirect_uri = self.redirect_uri()?;
        let state = generate_state();

        let url = format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
            self.authorize_endpoint,
            client_id,
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&self.scopes),
            state
        );

        Ok((url, state))
    }
}

fn generate_state() -> String {
    let mut rng = rand::thread_rng();
    (0..16).map(|_| format!("{:02x}", rng.gen::<u8>())).collect()
}
