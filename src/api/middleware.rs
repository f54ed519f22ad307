use crate::api::AppState;
use crate::error::{AppError, Result};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;

/// Bearer credential from the `Authorization` header, passed through to the
/// provider untouched.
pub struct BearerToken(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &Arc<AppState>) -> Result<Self> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        Ok(BearerToken(token.to_string()))
    }
}

/// Value of a named cookie from the `Cookie` header, if present.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_picks_the_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("a=1; spotify_access_token=tok-xyz; b=2"),
        );

        assert_eq!(
            cookie_value(&headers, "spotify_access_token").as_deref(),
            Some("tok-xyz")
        );
        assert_eq!(cookie_value(&headers, "b").as_deref(), Some("2"));
        assert!(cookie_value(&headers, "missing").is_none());
    }

    #[test]
    fn cookie_value_handles_absent_header() {
        assert!(cookie_value(&HeaderMap::new(), "any").is_none());
    }
}
