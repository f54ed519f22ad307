use crate::api::callback::ACCESS_TOKEN_COOKIE;
use crate::api::middleware::cookie_value;
use crate::api::token::{AUTH_STATE_COOKIE, AUTH_STATE_MAX_AGE_SECS};
use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::services::flow::FlowState;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
}

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response> {
    let token = cookie_value(&headers, ACCESS_TOKEN_COOKIE);
    render(&state, token.is_some(), "", &FlowState::Idle)
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    #[serde(default)]
    mood: String,
}

/// Form submission: run the whole interpret-then-recommend sequence and
/// render the outcome. Guards inside the flow reject empty moods and
/// missing logins without touching a provider.
async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Result<Response> {
    let token = cookie_value(&headers, ACCESS_TOKEN_COOKIE);
    let outcome = state.flow.run(&form.mood, token.as_deref()).await;
    render(&state, token.is_some(), &form.mood, &outcome)
}

fn render(state: &AppState, logged_in: bool, mood: &str, flow: &FlowState) -> Result<Response> {
    // A fresh login link also means a fresh anti-forgery state cookie.
    let login = if logged_in {
        None
    } else {
        Some(state.token_exchanger.authorize_url()?)
    };

    let html = render_page(login.as_ref().map(|(url, _)| url.as_str()), mood, flow);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8");
    if let Some((_, auth_state)) = &login {
        builder = builder.header(
            header::SET_COOKIE,
            format!(
                "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
                AUTH_STATE_COOKIE, auth_state, AUTH_STATE_MAX_AGE_SECS
            ),
        );
    }

    builder
        .body(Body::from(html))
        .map_err(|e| AppError::Internal(e.into()))
}

fn render_page(login_url: Option<&str>, mood: &str, flow: &FlowState) -> String {
    let mut body = String::new();
    body.push_str("<h1>Mood &rarr; Music</h1>\n");
    body.push_str("<p>Type your mood below and generate a playlist.</p>\n");

    if let Some(url) = login_url {
        body.push_str(&format!(
            "<p><a class=\"login\" href=\"{}\">Login with Spotify</a></p>\n",
            escape(url)
        ));
    }

    body.push_str(&format!(
        "<form method=\"post\" action=\"/generate\">\n\
         <input type=\"text\" name=\"mood\" placeholder=\"Describe your mood...\" value=\"{}\">\n\
         <button type=\"submit\">Generate Playlist</button>\n\
         </form>\n",
        escape(mood)
    ));

    if let Some(message) = flow.error_message() {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
    }

    if let Some(text) = flow.interpretation() {
        body.push_str(&format!(
            "<section>\n<h2>Interpretation</h2>\n<p>{}</p>\n</section>\n",
            escape(text)
        ));
    }

    let tracks = flow.tracks();
    if !tracks.is_empty() {
        body.push_str("<section>\n<h2>Spotify Recommendations</h2>\n<ul>\n");
        for track in tracks {
            let art = track
                .album_art
                .first()
                .map(|image| {
                    format!(
                        "<img src=\"{}\" alt=\"{}\" width=\"64\" height=\"64\"> ",
                        escape(&image.url),
                        escape(&track.name)
                    )
                })
                .unwrap_or_default();
            let link = track
                .external_url
                .as_deref()
                .map(|url| format!(" <a href=\"{}\">Listen on Spotify</a>", escape(url)))
                .unwrap_or_default();
            body.push_str(&format!(
                "<li>{}<strong>{}</strong><br>{}{}</li>\n",
                art,
                escape(&track.name),
                escape(&track.artists.join(", ")),
                link
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Moodify</title></head>\n\
         <body>\n{}</body>\n</html>\n",
        body
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Track;
    use crate::services::flow::LOGIN_REQUIRED_MESSAGE;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b>"a" & b</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; b&lt;/b&gt;"
        );
    }

    #[test]
    fn login_link_only_renders_when_logged_out() {
        let with_login = render_page(Some("https://accounts/authorize?x=1"), "", &FlowState::Idle);
        assert!(with_login.contains("Login with Spotify"));

        let without_login = render_page(None, "", &FlowState::Idle);
        assert!(!without_login.contains("Login with Spotify"));
    }

    #[test]
    fn failed_state_renders_the_banner_message() {
        let flow = FlowState::Failed {
            message: LOGIN_REQUIRED_MESSAGE,
            interpretation: None,
        };
        let html = render_page(Some("https://accounts/authorize"), "happy", &flow);
        assert!(html.contains(LOGIN_REQUIRED_MESSAGE));
        assert!(html.contains("value=\"happy\""));
    }

    #[test]
    fn done_state_renders_interpretation_and_tracks() {
        let flow = FlowState::Done {
            interpretation: "Bright & bouncy".to_string(),
            tracks: vec![Track {
                id: "t1".to_string(),
                name: "Song <One>".to_string(),
                artists: vec!["A".to_string(), "B".to_string()],
                album: "Album".to_string(),
                album_art: vec![],
                preview_url: None,
                external_url: Some("https://open.spotify.com/track/t1".to_string()),
            }],
        };
        let html = render_page(None, "happy", &flow);
        assert!(html.contains("Bright &amp; bouncy"));
        assert!(html.contains("Song &lt;One&gt;"));
        assert!(html.contains("A, B"));
        assert!(html.contains("https://open.spotify.com/track/t1"));
    }
}
