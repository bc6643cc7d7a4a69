use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::genres::GenreResolver;
use crate::client::CatalogClient;
use crate::models::Track;

/// A candidate track that survived filtering, with its derived scores and
/// the playlist artist whose search produced it
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub track: Track,
    /// Jaccard ratio between the candidate's raw genres and the playlist's
    pub genre_similarity: f32,
    /// Composite ranking score
    pub score: f32,
    pub source_artist: String,
}

/// Samples candidate tracks from the playlist's own artists, filters them,
/// and ranks the survivors by a composite popularity/similarity score.
pub struct RecommendationEngine {
    target_count: usize,
    artist_sample: usize,
    rng: StdRng,
}

impl RecommendationEngine {
    /// `seed` fixes the artist-sampling RNG for reproducible output; without
    /// it, sampling is entropy-seeded and nondeterministic between runs.
    pub fn new(target_count: usize, artist_sample: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        RecommendationEngine {
            target_count,
            artist_sample,
            rng,
        }
    }

    /// Produce up to `target_count` recommendations, best first.
    ///
    /// A failed track search for one artist skips that artist only; it never
    /// aborts the pass.
    pub fn recommend<C: CatalogClient>(
        &mut self,
        tracks: &[Track],
        client: &C,
        resolver: &mut GenreResolver<C>,
    ) -> Vec<Recommendation> {
        if tracks.is_empty() {
            return Vec::new();
        }

        let playlist_artists = Self::distinct_artists(tracks);
        let playlist_artist_set: HashSet<String> = playlist_artists
            .iter()
            .map(|a| a.to_lowercase())
            .collect();
        let playlist_names: HashSet<String> =
            tracks.iter().map(|t| t.name.to_lowercase()).collect();
        let max_release_year = tracks.iter().filter_map(|t| t.release_year).max();

        // Reference set: every raw tag any playlist artist carries
        let existing_genres = resolver.raw_genres_for_artists(&playlist_artists);

        let sampled = self.sample_artists(&playlist_artists);

        let mut accepted: Vec<Recommendation> = Vec::new();
        let mut accepted_albums: HashSet<String> = HashSet::new();

        for artist in &sampled {
            let candidates = match client.search_tracks_by_artist(artist, self.target_count) {
                Ok(candidates) => candidates,
                Err(e) => {
                    eprintln!("Warning: track search for '{artist}' failed: {e}");
                    continue;
                }
            };

            for raw in &candidates {
                // Broken candidate records are skipped, not fatal
                let Ok(track) = Track::from_raw(raw) else {
                    continue;
                };

                // Filters, in order, first failure skips the candidate:
                // no release date; older than the playlist's newest track;
                // name already in the playlist; album already accepted
                let Some(year) = track.release_year else {
                    continue;
                };
                if let Some(max_year) = max_release_year {
                    if year < max_year {
                        continue;
                    }
                }
                if playlist_names.contains(&track.name.to_lowercase()) {
                    continue;
                }
                let album_key = track.album.to_lowercase();
                if accepted_albums.contains(&album_key) {
                    continue;
                }

                let candidate_genres = resolver.raw_genres_for_artists(&track.artists);
                let genre_similarity = jaccard(&existing_genres, &candidate_genres);
                let artist_overlap = track
                    .artists
                    .iter()
                    .filter(|a| playlist_artist_set.contains(&a.to_lowercase()))
                    .count() as f32
                    / track.artists.len() as f32;

                // The album term is the global count of albums accepted so
                // far, so later acceptances carry a growing penalty
                let score = 0.7 * (track.popularity as f32 / 100.0)
                    + 0.3 * genre_similarity
                    - 0.2 * artist_overlap
                    - 0.1 * accepted_albums.len() as f32;

                accepted_albums.insert(album_key);
                accepted.push(Recommendation {
                    track,
                    genre_similarity,
                    score,
                    source_artist: artist.clone(),
                });
            }
        }

        // Stable sort: ties keep acceptance order
        accepted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        accepted.truncate(self.target_count);
        accepted
    }

    /// Distinct playlist artists in first-appearance order
    fn distinct_artists(tracks: &[Track]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut artists = Vec::new();
        for track in tracks {
            for artist in &track.artists {
                if seen.insert(artist.clone()) {
                    artists.push(artist.clone());
                }
            }
        }
        artists
    }

    /// Down-sample to at most `artist_sample` artists with the run's RNG
    fn sample_artists(&mut self, artists: &[String]) -> Vec<String> {
        if artists.len() <= self.artist_sample {
            return artists.to_vec();
        }
        artists
            .choose_multiple(&mut self.rng, self.artist_sample)
            .cloned()
            .collect()
    }
}

/// Jaccard ratio of two tag sets; two empty sets are defined as 0.0
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f32 / union as f32
}
