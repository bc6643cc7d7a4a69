use std::collections::{BTreeSet, HashMap};

use crate::client::CatalogClient;
use crate::models::Track;

/// Bucket for raw tags no taxonomy keyword matches
pub const MISC_GENRE: &str = "Miscellaneous";

/// Ordered taxonomy of parent genres. The order is part of the value:
/// classification scans the entries front to back and the first keyword hit
/// wins, so a given tag always lands in the same bucket.
pub struct GenreMap {
    entries: Vec<(String, Vec<String>)>,
}

impl GenreMap {
    pub fn from_entries(entries: Vec<(&str, Vec<&str>)>) -> Self {
        GenreMap {
            entries: entries
                .into_iter()
                .map(|(label, keywords)| {
                    (
                        label.to_string(),
                        keywords.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        }
    }

    /// The fixed default taxonomy used for scoring
    pub fn with_default_taxonomy() -> Self {
        Self::from_entries(vec![
            ("Pop", vec!["pop"]),
            ("Rock", vec!["rock", "punk", "grunge"]),
            ("Rap/Hip-Hop", vec!["rap", "hip hop", "hip-hop", "trap", "drill"]),
            (
                "Electronic/Dance",
                vec!["edm", "house", "techno", "electro", "dance", "dubstep", "trance"],
            ),
            ("R&B/Soul", vec!["r&b", "soul", "funk"]),
            ("Country", vec!["country", "bluegrass"]),
            ("Latin", vec!["latin", "reggaeton", "salsa", "cumbia"]),
            ("Jazz", vec!["jazz", "bebop", "swing"]),
            ("Classical", vec!["classical", "orchestra", "baroque", "opera"]),
            ("Metal", vec!["metal", "thrash", "doom"]),
            (
                "Folk/Acoustic",
                vec!["folk", "acoustic", "singer-songwriter", "americana"],
            ),
        ])
    }

    /// Classify one raw tag. Substring match, first entry wins; unmatched
    /// tags fall into the Miscellaneous bucket.
    pub fn parent_for(&self, tag: &str) -> &str {
        for (label, keywords) in &self.entries {
            if keywords.iter().any(|keyword| tag.contains(keyword.as_str())) {
                return label;
            }
        }
        MISC_GENRE
    }

    /// Classify a set of raw tags; each tag contributes to exactly one parent
    pub fn parents_for_tags<I, S>(&self, tags: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .map(|tag| self.parent_for(tag.as_ref()).to_string())
            .collect()
    }
}

impl Default for GenreMap {
    fn default() -> Self {
        Self::with_default_taxonomy()
    }
}

/// Resolves artist names to raw genre tags through the catalog, memoizing
/// per artist so the scoring and recommendation passes never repeat a query.
/// One resolver is scoped to one run.
pub struct GenreResolver<'a, C: CatalogClient> {
    client: &'a C,
    cache: HashMap<String, Vec<String>>,
}

impl<'a, C: CatalogClient> GenreResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        GenreResolver {
            client,
            cache: HashMap::new(),
        }
    }

    /// Raw genre tags for an artist, from cache or one catalog query.
    /// An upstream failure is logged, cached as "no genres", and not retried
    /// within the run.
    pub fn genres_for_artist(&mut self, name: &str) -> &[String] {
        self.cache
            .entry(name.to_string())
            .or_insert_with(|| match self.client.search_artist_genres(name) {
                Ok(genres) => genres,
                Err(e) => {
                    eprintln!("Warning: genre lookup for '{name}' failed: {e}");
                    Vec::new()
                }
            })
    }

    /// Union of raw genre tags across a list of artists
    pub fn raw_genres_for_artists<S: AsRef<str>>(&mut self, artists: &[S]) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for artist in artists {
            for tag in self.genres_for_artist(artist.as_ref()) {
                tags.insert(tag.clone());
            }
        }
        tags
    }

    /// Parent genres implied by a track's artists. A track whose artists
    /// carry no tags at all counts once as Miscellaneous so every track
    /// shows up in the genre distribution.
    pub fn parent_genres_for_track(&mut self, track: &Track, map: &GenreMap) -> BTreeSet<String> {
        let tags = self.raw_genres_for_artists(&track.artists);
        if tags.is_empty() {
            let mut parents = BTreeSet::new();
            parents.insert(MISC_GENRE.to_string());
            return parents;
        }
        map.parents_for_tags(&tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_entry_wins() {
        let map = GenreMap::from_entries(vec![
            ("Pop", vec!["pop"]),
            ("Rock", vec!["rock", "pop rock"]),
        ]);
        // "pop rock" contains "pop", and Pop is scanned first
        assert_eq!(map.parent_for("pop rock"), "Pop");
        assert_eq!(map.parent_for("indie rock"), "Rock");
    }

    #[test]
    fn unmatched_tags_fall_into_miscellaneous() {
        let map = GenreMap::with_default_taxonomy();
        assert_eq!(map.parent_for("shoegaze"), MISC_GENRE);
    }

    #[test]
    fn classification_is_deterministic_across_orders() {
        let map = GenreMap::with_default_taxonomy();
        let forward = map.parents_for_tags(["dream pop", "detroit techno", "bebop"]);
        let reverse = map.parents_for_tags(["bebop", "detroit techno", "dream pop"]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn each_tag_maps_to_exactly_one_parent() {
        let map = GenreMap::with_default_taxonomy();
        // "dance pop" matches both Pop and Electronic/Dance keywords; only
        // the first entry in the taxonomy counts
        let parents = map.parents_for_tags(["dance pop"]);
        assert_eq!(parents.len(), 1);
        assert!(parents.contains("Pop"));
    }
}
