use std::fmt;

use serde::{Deserialize, Serialize};

/// Streaming service a link was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Spotify,
    Tidal,
    Unknown,
}

impl Platform {
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::Tidal => "Tidal",
            Platform::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub fn detect_platform(url: &str) -> Platform {
    if url.contains("spotify") {
        Platform::Spotify
    } else if url.contains("tidal") {
        Platform::Tidal
    } else {
        Platform::Unknown
    }
}
