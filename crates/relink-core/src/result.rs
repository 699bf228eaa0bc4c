use serde::{Deserialize, Serialize};

use crate::{Category, Platform};

/// A finished conversion, as handed to the presenter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedLink {
    pub source_url: String,
    pub category: Category,
    pub source_platform: Platform,
    pub identifier: Option<String>,
    pub links: Vec<String>,
}

impl ConvertedLink {
    /// The single best match; only the first returned link is consumed.
    pub fn best(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }
}
