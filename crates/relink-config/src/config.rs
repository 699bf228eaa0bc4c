use std::fmt;
use std::str::FromStr;

use relink_core::RelinkError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// How a link is addressed on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// `/api/v1/convert-link/{encodedLink}`
    #[default]
    Link,
    /// `/api/v1/convert/{category}/{identifier}`
    Category,
}

impl FromStr for Route {
    type Err = RelinkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "link" => Ok(Route::Link),
            "category" => Ok(Route::Category),
            other => Err(RelinkError::Config(format!(
                "unknown route '{other}' (expected 'link' or 'category')"
            ))),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Link => f.write_str("link"),
            Route::Category => f.write_str("category"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub route: Option<Route>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub simple: Option<bool>,
    pub copy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelinkConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}
