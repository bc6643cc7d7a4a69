use std::collections::HashMap;

use approx::assert_relative_eq;

use crate::client::MockCatalogClient;
use crate::error::AnalyzerError;
use crate::models::Track;
use crate::playlist::genres::{GenreMap, GenreResolver};
use crate::playlist::scoring::{PlaylistScoring, ScoreWeights};

fn track(name: &str, artists: Vec<&str>, popularity: u8, year: Option<i32>, album: &str) -> Track {
    Track {
        name: name.to_string(),
        artists: artists.into_iter().map(str::to_string).collect(),
        popularity,
        release_year: year,
        album: album.to_string(),
    }
}

/// Client whose artist search returns fixed genre tags per artist
fn client_with_genres(genres: Vec<(&'static str, Vec<&'static str>)>) -> MockCatalogClient {
    let table: HashMap<String, Vec<String>> = genres
        .into_iter()
        .map(|(artist, tags)| {
            (
                artist.to_string(),
                tags.into_iter().map(str::to_string).collect(),
            )
        })
        .collect();

    let mut client = MockCatalogClient::new();
    client
        .expect_search_artist_genres()
        .returning(move |name| Ok(table.get(name).cloned().unwrap_or_default()));
    client
}

#[test]
fn worked_example_matches_hand_computed_score() {
    // Two tracks, two artists, one parent genre:
    // 0.3*1.0 + 0.2*0.70 + 0.25*1.0 + 0.25*0.04 = 0.705
    let tracks = vec![
        track("Song One", vec!["Artist A"], 80, Some(2020), "Album A"),
        track("Song Two", vec!["Artist B"], 60, Some(2021), "Album B"),
    ];
    let client = client_with_genres(vec![
        ("Artist A", vec!["synth pop"]),
        ("Artist B", vec!["dance pop"]),
    ]);
    let mut resolver = GenreResolver::new(&client);
    let map = GenreMap::with_default_taxonomy();

    let score =
        PlaylistScoring::score(&tracks, &mut resolver, &map, &ScoreWeights::default()).unwrap();

    assert_relative_eq!(score.artist_diversity, 1.0);
    assert_relative_eq!(score.popularity, 0.70);
    assert_relative_eq!(score.genre_cohesion, 1.0);
    assert_relative_eq!(score.length, 0.04);
    assert_relative_eq!(score.overall, 0.705, epsilon = 1e-6);
}

#[test]
fn all_components_stay_in_unit_range() {
    let tracks = vec![
        track("One", vec!["A"], 100, Some(2019), "X"),
        track("Two", vec!["A"], 0, Some(2020), "Y"),
        track("Three", vec!["B", "C"], 55, None, "Z"),
        track("Four", vec!["D"], 77, Some(2021), "W"),
    ];
    let client = client_with_genres(vec![
        ("A", vec!["indie rock"]),
        ("B", vec!["detroit techno"]),
        ("C", vec![]),
        ("D", vec!["bebop", "vocal jazz"]),
    ]);
    let mut resolver = GenreResolver::new(&client);
    let map = GenreMap::with_default_taxonomy();

    let score =
        PlaylistScoring::score(&tracks, &mut resolver, &map, &ScoreWeights::default()).unwrap();

    for component in [
        score.artist_diversity,
        score.popularity,
        score.genre_cohesion,
        score.length,
        score.overall,
    ] {
        assert!((0.0..=1.0).contains(&component), "out of range: {component}");
    }
}

#[test]
fn single_parent_genre_is_perfectly_cohesive_at_any_size() {
    let tracks: Vec<Track> = (0..7)
        .map(|i| track(&format!("Song {i}"), vec!["A"], 50, Some(2020), "X"))
        .collect();
    let client = client_with_genres(vec![("A", vec!["norwegian black metal"])]);
    let mut resolver = GenreResolver::new(&client);
    let map = GenreMap::with_default_taxonomy();

    let cohesion = PlaylistScoring::genre_cohesion_score(&tracks, &mut resolver, &map);
    assert_relative_eq!(cohesion, 1.0);
}

#[test]
fn even_two_genre_split_has_zero_cohesion() {
    let mut counts = HashMap::new();
    counts.insert("Pop".to_string(), 1);
    counts.insert("Rock".to_string(), 1);
    assert_relative_eq!(PlaylistScoring::cohesion_from_counts(&counts, 2), 0.0);
}

#[test]
fn empty_playlist_is_an_error() {
    let client = MockCatalogClient::new();
    let mut resolver = GenreResolver::new(&client);
    let map = GenreMap::with_default_taxonomy();

    let err = PlaylistScoring::score(&[], &mut resolver, &map, &ScoreWeights::default())
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::EmptyPlaylist));
}

#[test]
fn default_weights_sum_to_one() {
    assert_relative_eq!(ScoreWeights::default().total(), 1.0);
}

#[test]
fn resolver_queries_each_artist_exactly_once() {
    let tracks = vec![
        track("One", vec!["Artist A"], 50, Some(2020), "X"),
        track("Two", vec!["Artist A"], 60, Some(2020), "Y"),
        track("Three", vec!["Artist B"], 70, Some(2020), "Z"),
    ];

    let mut client = MockCatalogClient::new();
    client
        .expect_search_artist_genres()
        .withf(|name| name == "Artist A")
        .times(1)
        .returning(|_| Ok(vec!["art pop".to_string()]));
    client
        .expect_search_artist_genres()
        .withf(|name| name == "Artist B")
        .times(1)
        .returning(|_| Ok(vec!["chamber pop".to_string()]));

    let mut resolver = GenreResolver::new(&client);
    let map = GenreMap::with_default_taxonomy();

    // Scoring twice with the same resolver must not repeat any query
    PlaylistScoring::score(&tracks, &mut resolver, &map, &ScoreWeights::default()).unwrap();
    PlaylistScoring::score(&tracks, &mut resolver, &map, &ScoreWeights::default()).unwrap();
}

#[test]
fn failed_genre_lookup_is_cached_as_empty() {
    let mut client = MockCatalogClient::new();
    client
        .expect_search_artist_genres()
        .times(1)
        .returning(|_| Err(AnalyzerError::Upstream("search timed out".to_string())));

    let mut resolver = GenreResolver::new(&client);
    assert!(resolver.genres_for_artist("Flaky Artist").is_empty());
    // Second lookup comes from the cache; the mock would panic on a retry
    assert!(resolver.genres_for_artist("Flaky Artist").is_empty());
}
