use std::collections::HashMap;

use super::genres::{GenreMap, GenreResolver};
use crate::client::CatalogClient;
use crate::error::AnalyzerError;
use crate::models::Track;

/// Weights for combining the component scores. Fixed defaults; they must
/// sum to 1.0 so the overall score stays in [0, 1].
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub artist_diversity: f32,
    pub popularity: f32,
    pub genre_cohesion: f32,
    pub length: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            artist_diversity: 0.30,
            popularity: 0.20,
            genre_cohesion: 0.25,
            length: 0.25,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f32 {
        self.artist_diversity + self.popularity + self.genre_cohesion + self.length
    }
}

/// Component scores for one playlist, each 0.0 to 1.0 internally;
/// multiply by 100 for display.
#[derive(Debug, Clone)]
pub struct PlaylistScore {
    pub artist_diversity: f32,
    pub popularity: f32,
    pub genre_cohesion: f32,
    pub length: f32,
    pub overall: f32,
}

/// Scoring and calculation functionality
pub struct PlaylistScoring;

impl PlaylistScoring {
    /// Score a playlist. Fails on an empty playlist rather than dividing
    /// by zero.
    pub fn score<C: CatalogClient>(
        tracks: &[Track],
        resolver: &mut GenreResolver<C>,
        map: &GenreMap,
        weights: &ScoreWeights,
    ) -> Result<PlaylistScore, AnalyzerError> {
        if tracks.is_empty() {
            return Err(AnalyzerError::EmptyPlaylist);
        }

        let artist_diversity = Self::artist_diversity_score(tracks);
        let popularity = Self::popularity_score(tracks);
        let genre_cohesion = Self::genre_cohesion_score(tracks, resolver, map);
        let length = Self::length_score(tracks.len());

        // Weights sum to 1.0; normalizing by the total keeps the score in
        // range should a caller supply custom weights
        let weighted_sum = weights.artist_diversity * artist_diversity
            + weights.popularity * popularity
            + weights.genre_cohesion * genre_cohesion
            + weights.length * length;
        let total_weight = weights.total();
        let overall = if total_weight > 0.0 {
            (weighted_sum / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(PlaylistScore {
            artist_diversity,
            popularity,
            genre_cohesion,
            length,
            overall,
        })
    }

    /// Unique artists over track count, capped at 1.0
    pub fn artist_diversity_score(tracks: &[Track]) -> f32 {
        let unique_artists = tracks
            .iter()
            .flat_map(|t| t.artists.iter())
            .collect::<std::collections::HashSet<_>>()
            .len();

        (unique_artists as f32 / tracks.len() as f32).min(1.0)
    }

    /// Mean catalog popularity scaled to [0, 1]
    pub fn popularity_score(tracks: &[Track]) -> f32 {
        let mean = tracks.iter().map(|t| t.popularity as f32).sum::<f32>() / tracks.len() as f32;
        (mean / 100.0).clamp(0.0, 1.0)
    }

    /// Inverse-normalized-entropy of the parent-genre distribution.
    /// A playlist concentrated in one parent genre scores 1.0; an even
    /// spread across many parents approaches 0.0.
    pub fn genre_cohesion_score<C: CatalogClient>(
        tracks: &[Track],
        resolver: &mut GenreResolver<C>,
        map: &GenreMap,
    ) -> f32 {
        let mut genre_counts: HashMap<String, usize> = HashMap::new();
        for track in tracks {
            for parent in resolver.parent_genres_for_track(track, map) {
                *genre_counts.entry(parent).or_insert(0) += 1;
            }
        }

        Self::cohesion_from_counts(&genre_counts, tracks.len())
    }

    /// Shannon entropy over counts normalized by track count, scaled by the
    /// maximum entropy for the observed number of parents. A single parent
    /// genre is perfectly cohesive by definition, not a division by zero.
    pub fn cohesion_from_counts(genre_counts: &HashMap<String, usize>, total_tracks: usize) -> f32 {
        if genre_counts.len() <= 1 || total_tracks == 0 {
            return 1.0;
        }

        let mut entropy = 0.0;
        for &count in genre_counts.values() {
            let probability = count as f32 / total_tracks as f32;
            if probability > 0.0 {
                entropy -= probability * probability.log2();
            }
        }

        let max_entropy = (genre_counts.len() as f32).log2();
        // Tracks with several parents push the probability mass above 1,
        // which can drive entropy past max_entropy; clamp keeps the score
        // in range
        (1.0 - entropy / max_entropy).clamp(0.0, 1.0)
    }

    /// Track count over 50, capped: 50+ tracks is maximally substantial
    pub fn length_score(track_count: usize) -> f32 {
        (track_count as f32 / 50.0).min(1.0)
    }
}
