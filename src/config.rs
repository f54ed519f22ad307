use std::env;

/// Which OAuth flow backs the Spotify calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Client-credentials tokens fetched by the server itself.
    Service,
    /// Authorization-code login; callers present the token from the cookie.
    User,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_redirect_uri: Option<String>,
    pub spotify_scopes: String,
    pub auth_mode: AuthMode,
    pub server_host: String,
    pub server_port: u16,
    /// generateContent endpoint of the generative-text provider.
    pub gemini_api_url: String,
    pub spotify_token_url: String,
    pub spotify_authorize_url: String,
    /// Base URL of the Spotify Web API (no trailing slash).
    pub spotify_api_url: String,
    /// Flat delay before retrying a rate-limited interpretation call.
    pub interpreter_retry_delay_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let auth_mode = match env::var("AUTH_MODE").as_deref() {
            Ok("service") => AuthMode::Service,
            Ok("user") | Err(_) => AuthMode::User,
            Ok(other) => {
                return Err(anyhow::anyhow!(
                    "AUTH_MODE must be \"user\" or \"service\", got \"{}\"",
                    other
                ))
            }
        };

        Ok(Config {
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
            spotify_client_id: env::var("SPOTIFY_CLIENT_ID").ok(),
            spotify_client_secret: env::var("SPOTIFY_CLIENT_SECRET").ok(),
            spotify_redirect_uri: env::var("SPOTIFY_REDIRECT_URI").ok(),
            spotify_scopes: env::var("SPOTIFY_SCOPES").unwrap_or_else(|_| {
                "user-read-private user-read-email playlist-read-private \
                 playlist-read-collaborative"
                    .to_string()
            }),
            auth_mode,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            gemini_api_url: env::var("GEMINI_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta/models/\
                 gemini-2.5-flash-lite:generateContent"
                    .to_string()
            }),
            spotify_token_url: env::var("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string()),
            spotify_authorize_url: env::var("SPOTIFY_AUTHORIZE_URL")
                .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string()),
            spotify_api_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
            interpreter_retry_delay_secs: env::var("INTERPRETER_RETRY_DELAY_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(33),
        })
    }
}

#[cfg(test)]
impl Config {
    /// A fully populated config pointing at placeholder endpoints. Tests
    /// override the provider URLs with their stub server addresses.
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: Some("test-gemini-key".to_string()),
            spotify_client_id: Some("test-client-id".to_string()),
            spotify_client_secret: Some("test-client-secret".to_string()),
            spotify_redirect_uri: Some("http://localhost:3000/callback".to_string()),
            spotify_scopes: "user-read-private user-read-email".to_string(),
            auth_mode: AuthMode::User,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            gemini_api_url: "http://127.0.0.1:0/generate".to_string(),
            spotify_token_url: "http://127.0.0.1:0/api/token".to_string(),
            spotify_authorize_url: "http://127.0.0.1:0/authorize".to_string(),
            spotify_api_url: "http://127.0.0.1:0".to_string(),
            interpreter_retry_delay_secs: 0,
        }
    }
}
