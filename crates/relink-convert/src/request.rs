use relink_config::Route;
use relink_core::{
    Category, Platform, RelinkError, RelinkResult, classify, detect_platform,
    encode_for_transport, extract_id,
};
use tracing::debug;

const API_PREFIX: &str = "/api/v1";

/// Everything known about a link before it goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source_url: String,
    category: Category,
    platform: Platform,
    identifier: Option<String>,
    path: String,
}

impl ConversionRequest {
    /// Classifies `raw_link` and builds the backend path for `route`.
    ///
    /// On the link route the identifier is informational and a failed
    /// extraction is not an error. On the category route it addresses the
    /// request, so an unclassifiable link or a missing `/<category>/`
    /// segment fails here, before any network call.
    pub fn build(raw_link: &str, route: Route) -> RelinkResult<Self> {
        let category = classify(raw_link);
        let platform = detect_platform(raw_link);

        let (identifier, path) = match route {
            Route::Link => {
                let identifier = extract_id(category, raw_link).ok();
                let path = format!(
                    "{API_PREFIX}/convert-link/{}",
                    encode_for_transport(raw_link)
                );
                (identifier, path)
            }
            Route::Category => {
                if !category.has_segment() {
                    return Err(RelinkError::UnsupportedInput(format!(
                        "not a track or album link: {raw_link}"
                    )));
                }
                let identifier = extract_id(category, raw_link)?;
                let path = format!(
                    "{API_PREFIX}/convert/{category}/{}",
                    encode_for_transport(&identifier)
                );
                (Some(identifier), path)
            }
        };

        debug!(%category, %platform, ?identifier, %route, "classified link");

        Ok(Self {
            source_url: raw_link.to_string(),
            category,
            platform,
            identifier,
            path,
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Path and query relative to the backend base address.
    pub fn path(&self) -> &str {
        &self.path
    }
}
