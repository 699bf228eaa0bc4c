use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource kind a streaming link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Track,
    Album,
    NotFound,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Track => "track",
            Category::Album => "album",
            Category::NotFound => "notFound",
        }
    }

    /// Whether the category appears as a literal `/<category>/` path segment
    /// and can therefore carry an identifier.
    pub fn has_segment(self) -> bool {
        !matches!(self, Category::NotFound)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a raw link by substring containment, `track` first, then `album`.
///
/// This is not a URL parse: `"track"` anywhere in the string wins, even inside
/// a host name or query. Anything else is `NotFound`.
///
/// Artist links are reserved. `"artist"` matching is not enabled until the
/// backend can convert them, so they classify as `NotFound`.
pub fn classify(url: &str) -> Category {
    if url.contains(Category::Track.as_str()) {
        Category::Track
    } else if url.contains(Category::Album.as_str()) {
        Category::Album
    } else {
        Category::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, classify};

    #[test]
    fn classifies_tidal_and_spotify_links() {
        assert_eq!(
            classify("https://tidal.com/browse/track/126102208?u"),
            Category::Track
        );
        assert_eq!(
            classify("https://open.spotify.com/album/6JLO3HVtVEKLHqbgs6ujdw?si=X0bMCFiUQfGEHJilIjCMxA"),
            Category::Album
        );
    }

    #[test]
    fn track_wins_over_album() {
        assert_eq!(classify("https://x.com/album/track/1"), Category::Track);
        assert_eq!(classify("https://x.com/album/1?ref=soundtrack"), Category::Track);
    }

    #[test]
    fn artist_links_are_not_classified() {
        assert_eq!(classify("https://x.com/artist/5839856"), Category::NotFound);
        assert_eq!(
            classify("https://tidal.com/browse/artist/5839856?u"),
            Category::NotFound
        );
    }

    #[test]
    fn garbage_is_not_found() {
        assert_eq!(classify(""), Category::NotFound);
        assert_eq!(classify("not a url at all"), Category::NotFound);
    }

    #[test]
    fn display_matches_segment_name() {
        assert_eq!(Category::Track.to_string(), "track");
        assert_eq!(Category::NotFound.to_string(), "notFound");
        assert!(!Category::NotFound.has_segment());
    }
}
