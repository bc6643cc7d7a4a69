use ureq::Agent;
use urlencoding::encode;

use crate::config::Config;
use crate::error::AnalyzerError;
use crate::models::{ArtistSearchResponse, PlaylistResponse, RawTrack, TrackSearchResponse};

/// The three catalog capabilities the engines consume. Kept behind a trait
/// so tests can substitute a mock for the HTTP client.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogClient {
    /// Fetch a playlist and its tracks by id
    fn get_playlist(&self, id: &str) -> Result<PlaylistResponse, AnalyzerError>;

    /// Search the catalog for an artist by exact name and return its raw
    /// genre tags; no match yields an empty set
    fn search_artist_genres(&self, name: &str) -> Result<Vec<String>, AnalyzerError>;

    /// Search the catalog for up to `limit` tracks by the named artist
    fn search_tracks_by_artist(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<RawTrack>, AnalyzerError>;
}

/// Blocking catalog client using bearer-token authentication
pub struct HttpCatalogClient {
    agent: Agent,
    api_url: String,
    access_token: String,
}

impl HttpCatalogClient {
    /// Create a client, fetching an access token via the client-credentials
    /// grant. The token lives for the whole run; a run is far shorter than
    /// the token's lifetime.
    pub fn new(config: &Config) -> Result<Self, AnalyzerError> {
        let agent = Agent::new();

        let response = agent
            .post(&config.token_url)
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &config.client_id),
                ("client_secret", &config.client_secret),
            ])
            .map_err(|e| AnalyzerError::Upstream(format!("token request failed: {e}")))?;

        let body: serde_json::Value = response
            .into_json()
            .map_err(|e| AnalyzerError::Upstream(format!("token response was not JSON: {e}")))?;

        let access_token = body
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                AnalyzerError::Upstream("token response had no access_token field".to_string())
            })?
            .to_string();

        Ok(HttpCatalogClient {
            agent,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, AnalyzerError> {
        let response = self
            .agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .call()
            .map_err(|e| AnalyzerError::Upstream(format!("GET {url} failed: {e}")))?;

        response
            .into_json()
            .map_err(|e| AnalyzerError::Upstream(format!("GET {url} returned bad JSON: {e}")))
    }
}

impl CatalogClient for HttpCatalogClient {
    fn get_playlist(&self, id: &str) -> Result<PlaylistResponse, AnalyzerError> {
        let url = format!("{}/playlists/{}", self.api_url, encode(id));
        self.get_json(&url)
    }

    fn search_artist_genres(&self, name: &str) -> Result<Vec<String>, AnalyzerError> {
        let url = format!(
            "{}/search?q={}&type=artist&limit=10",
            self.api_url,
            encode(name)
        );
        let response: ArtistSearchResponse = self.get_json(&url)?;

        // Exact-name match against the first page; the first hit wins
        let genres = response
            .artists
            .items
            .iter()
            .find(|artist| artist.name.eq_ignore_ascii_case(name))
            .map(|artist| artist.genres.clone())
            .unwrap_or_default();

        Ok(genres)
    }

    fn search_tracks_by_artist(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<RawTrack>, AnalyzerError> {
        let url = format!(
            "{}/search?q={}&type=track&limit={}",
            self.api_url,
            encode(&format!("artist:{name}")),
            limit
        );
        let response: TrackSearchResponse = self.get_json(&url)?;
        Ok(response.tracks.items)
    }
}
