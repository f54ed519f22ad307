use serde::{Deserialize, Serialize};

/// Raw token payload from the Spotify token endpoint.
///
/// `refresh_token` is only present for the authorization-code grant. Expired
/// tokens are never refreshed here; the caller reacquires through the same
/// flow that produced the token (cookie max-age tracks `expires_in`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}
