use std::sync::Arc;

use async_trait::async_trait;
use relink_core::{RelinkError, RelinkResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::request::ConversionRequest;

/// The remote service that maps a link onto other streaming catalogs.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// Returns the converted links, best match first.
    async fn convert(&self, request: &ConversionRequest) -> RelinkResult<Vec<String>>;
}

#[async_trait]
impl<T: ConversionBackend + ?Sized> ConversionBackend for Arc<T> {
    async fn convert(&self, request: &ConversionRequest) -> RelinkResult<Vec<String>> {
        (**self).convert(request).await
    }
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds a client with its own connection pool and no request timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> RelinkResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("relink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RelinkError::Network(format!("failed to build http client: {err}")))?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_url(&self, request: &ConversionRequest) -> String {
        format!("{}{}", self.base_url, request.path())
    }
}

#[async_trait]
impl ConversionBackend for BackendClient {
    async fn convert(&self, request: &ConversionRequest) -> RelinkResult<Vec<String>> {
        let url = self.request_url(request);
        debug!(%url, "requesting conversion");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| RelinkError::Network(format!("conversion request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "conversion backend returned an error status");
            return Err(RelinkError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<Option<ConvertResponse>>()
            .await
            .map_err(|err| RelinkError::Parse(format!("conversion response parse failed: {err}")))?;

        match payload {
            Some(payload) if !payload.links.is_empty() => Ok(payload.links),
            _ => {
                warn!("conversion backend returned no links");
                Err(RelinkError::EmptyResponse)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConvertResponse {
    pub links: Vec<String>,
}
