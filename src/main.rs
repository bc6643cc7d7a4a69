use anyhow::Result;
use clap::Parser;

mod client;
mod config;
mod error;
mod link;
mod models;
mod playlist;

use crate::client::{CatalogClient, HttpCatalogClient};
use crate::config::load_config;
use crate::models::normalize_playlist;
use crate::playlist::{
    GenreMap, GenreResolver, PlaylistScoring, RecommendationEngine, ScoreWeights,
};

#[derive(Parser)]
#[command(name = "playlist-analyzer")]
#[command(about = "Scores a playlist and recommends additional tracks from a music catalog")]
#[command(version)]
struct Args {
    /// Sharable playlist URL, e.g. https://open.spotify.com/playlist/<id>?si=<token>
    playlist_url: String,

    /// Number of recommendations to produce
    #[arg(short = 'n', long = "recommendations", default_value_t = 10)]
    recommendations: usize,

    /// Number of playlist artists to sample when searching for candidates
    #[arg(short = 'k', long = "artist-sample", default_value_t = 10)]
    artist_sample: usize,

    /// Fix the artist-sampling RNG seed for reproducible recommendations
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Require the ?si= share token when parsing the playlist URL
    #[arg(long = "strict")]
    strict: bool,

    /// Quiet mode - reduce output verbosity
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Validate the URL before touching the network
    let playlist_id = if args.strict {
        link::parse_playlist_url_strict(&args.playlist_url)?
    } else {
        link::parse_playlist_url(&args.playlist_url)?
    };

    let config = load_config()?;
    let client = HttpCatalogClient::new(&config)?;

    if !args.quiet {
        println!("Fetching playlist {playlist_id}...");
    }

    // A failed playlist fetch is fatal; everything downstream needs it
    let response = client.get_playlist(&playlist_id)?;
    let tracks = normalize_playlist(&response)?;

    let owner = response
        .owner
        .as_ref()
        .and_then(|o| o.display_name.clone())
        .unwrap_or_else(|| "unknown".to_string());
    println!("\nPlaylist: {} (by {})", response.name, owner);
    println!("Tracks: {}", tracks.len());

    if !args.quiet {
        println!("\nSample of fetched tracks:");
        for track in tracks.iter().take(3) {
            let year = track
                .release_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "- {} by {} [{}] | Popularity: {} | Year: {}",
                track.name,
                track.artists.join(", "),
                track.album,
                track.popularity,
                year
            );
        }
    }

    let map = GenreMap::with_default_taxonomy();
    let mut resolver = GenreResolver::new(&client);

    if !args.quiet {
        println!("\nResolving artist genres...");
    }
    let score = PlaylistScoring::score(&tracks, &mut resolver, &map, &ScoreWeights::default())?;

    println!("\n=== PLAYLIST SCORE ===");
    println!("Artist Diversity: {:>5.1}/100", score.artist_diversity * 100.0);
    println!("Popularity:       {:>5.1}/100", score.popularity * 100.0);
    println!("Genre Cohesion:   {:>5.1}/100", score.genre_cohesion * 100.0);
    println!("Length:           {:>5.1}/100", score.length * 100.0);
    println!("Overall:          {:>5.1}/100", score.overall * 100.0);

    if !args.quiet {
        println!("\nSearching candidate tracks from playlist artists...");
    }
    let mut engine = RecommendationEngine::new(args.recommendations, args.artist_sample, args.seed);
    let recommendations = engine.recommend(&tracks, &client, &mut resolver);

    println!("\n=== RECOMMENDATIONS ===");
    if recommendations.is_empty() {
        println!("No candidates survived filtering - try a larger artist sample.");
    } else {
        for (i, rec) in recommendations.iter().enumerate() {
            println!(
                "{:>2}. \"{}\" by {} [{}]",
                i + 1,
                rec.track.name,
                rec.track.artists.join(", "),
                rec.track.album
            );
            println!(
                "     popularity {} | similarity {:.2} | score {:.2} | via {}",
                rec.track.popularity, rec.genre_similarity, rec.score, rec.source_artist
            );
        }
    }

    Ok(())
}
