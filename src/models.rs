use serde::Deserialize;

use crate::error::AnalyzerError;

/// Playlist object as returned by the catalog's playlist endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    pub name: String,
    pub owner: Option<PlaylistOwner>,
    pub tracks: PlaylistTracks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracks {
    pub items: Vec<PlaylistItem>,
}

/// One playlist entry; `track` is absent for local/ghost entries
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<RawTrack>,
}

/// Track object as the catalog serves it, before normalization.
/// Fields the catalog may omit are optional here; the normalizer decides
/// which of them are actually required.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    pub name: Option<String>,
    pub artists: Option<Vec<RawArtist>>,
    pub popularity: Option<u8>,
    pub album: Option<RawAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtist {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAlbum {
    pub name: Option<String>,
    pub release_date: Option<String>,
}

/// Artist search response: `{"artists": {"items": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: SearchPage<RawArtist>,
}

/// Track search response: `{"tracks": {"items": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct TrackSearchResponse {
    pub tracks: SearchPage<RawTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage<T> {
    pub items: Vec<T>,
}

/// Normalized track record used by the scoring and recommendation engines.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    /// Ordered, non-empty list of artist names
    pub artists: Vec<String>,
    /// Catalog popularity, 0..=100
    pub popularity: u8,
    /// Album release year; `None` when the catalog has no release date
    pub release_year: Option<i32>,
    pub album: String,
}

impl Track {
    /// Build a normalized track from a raw catalog record.
    ///
    /// Name, artists, and popularity are required; a missing release date
    /// yields `release_year = None` rather than a substitute value.
    pub fn from_raw(raw: &RawTrack) -> Result<Track, AnalyzerError> {
        let name = raw
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AnalyzerError::Data("track is missing a name".to_string()))?;

        let artists: Vec<String> = raw
            .artists
            .as_ref()
            .map(|list| list.iter().map(|a| a.name.clone()).collect())
            .filter(|list: &Vec<String>| !list.is_empty())
            .ok_or_else(|| AnalyzerError::Data(format!("track '{name}' has no artists")))?;

        let popularity = raw
            .popularity
            .ok_or_else(|| AnalyzerError::Data(format!("track '{name}' is missing popularity")))?;

        let album_name = raw
            .album
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_default();

        let release_year = raw
            .album
            .as_ref()
            .and_then(|a| a.release_date.as_deref())
            .and_then(release_year_from_date);

        Ok(Track {
            name,
            artists,
            popularity,
            release_year,
            album: album_name,
        })
    }
}

/// Parse the year prefix of a catalog release date ("2021-05-07", "1994").
pub fn release_year_from_date(date: &str) -> Option<i32> {
    let prefix = date.split('-').next()?;
    prefix.trim().parse().ok()
}

/// Convert a playlist response into normalized tracks, preserving order.
/// Entries without a track object are skipped; present-but-broken records
/// are an error, not a silent default.
pub fn normalize_playlist(response: &PlaylistResponse) -> Result<Vec<Track>, AnalyzerError> {
    response
        .tracks
        .items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .map(Track::from_raw)
        .collect()
}
