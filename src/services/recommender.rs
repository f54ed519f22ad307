use crate::error::{AppError, Result};
use crate::models::{AlbumImage, Track};
use crate::services::genres::GenreSeeds;
use reqwest::{header, Client};
use serde::Deserialize;

/// Fixed recommendation page size.
const RECOMMENDATION_LIMIT: usize = 10;

/// Client for the Spotify recommendations endpoint.
pub struct RecommendationClient {
    api_url: String,
    client: Client,
}

/// Normalized recommendations plus the provider's seed echo.
#[derive(Debug)]
pub struct Recommendations {
    pub tracks: Vec<Track>,
    pub seeds: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<SpotifyTrack>,
    #[serde(default)]
    seeds: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    #[serde(default)]
    album: SpotifyAlbum,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(default)]
    external_urls: SpotifyExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    name: String,
    #[serde(default)]
    images: Vec<AlbumImage>,
}

#[derive(Debug, Default, Deserialize)]
struct SpotifyExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Track {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.name,
            album_art: track.album.images,
            preview_url: track.preview_url,
            external_url: track.external_urls.spotify,
        }
    }
}

impl RecommendationClient {
    pub fn new(config: &crate::config::Config) -> Self {
        Self {
            api_url: config.spotify_api_url.clone(),
            client: Client::new(),
        }
    }

    /// Fetch up to [`RECOMMENDATION_LIMIT`] recommendations for the seed set.
    /// Never retried; provider failures carry the raw status and body.
    pub async fn recommendations(
        &self,
        seeds: &GenreSeeds,
        access_token: &str,
    ) -> Result<Recommendations> {
        // seed_genres takes literal commas, so the query string is built by
        // hand instead of through percent-encoding form serialization.
        let url = format!(
            "{}/recommendations?seed_genres={}&limit={}",
            self.api_url,
            seeds.as_param(),
            RECOMMENDATION_LIMIT
        );

        tracing::debug!("Fetching Spotify recommendations: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Recommendations request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::error!("Spotify recommendations error: {} - {}", status, body);
            return Err(AppError::Provider {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }

        parse_recommendations(&body)
    }
}

fn parse_recommendations(body: &str) -> Result<Recommendations> {
    let parsed: RecommendationsResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Shape(format!("failed to parse recommendations: {}", e)))?;

    Ok(Recommendations {
        tracks: parsed.tracks.into_iter().map(Track::from).collect(),
        seeds: parsed.seeds,
    })
}
