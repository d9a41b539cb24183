use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use shared::{domain::Product, protocol::decode_records};
use tracing::{debug, warn};

use crate::error::FetchError;

/// The external collaborator the catalog loader pulls products from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError>;
}

/// Source that always fails. Useful offline: with the default fallback policy
/// the loader serves the bundled catalog.
pub struct OfflineCatalogSource;

#[async_trait]
impl CatalogSource for OfflineCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        Err(FetchError::Unavailable("offline mode".into()))
    }
}

pub struct HttpCatalogSource {
    http: Client,
    endpoint: Url,
    limit: Option<u32>,
}

impl HttpCatalogSource {
    pub fn new(endpoint: Url, limit: Option<u32>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self {
            http,
            endpoint,
            limit,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        let mut request = self.http.get(self.endpoint.clone());
        if let Some(limit) = self.limit {
            request = request.query(&[("limit", limit)]);
        }

        let body = request.send().await?.error_for_status()?.bytes().await?;
        let values: Vec<serde_json::Value> =
            serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))?;

        let decoded = decode_records(values);
        for rejected in &decoded.rejected {
            warn!(endpoint = %self.endpoint, error = %rejected, "dropping catalog record");
        }
        if decoded.products.is_empty() {
            return Err(FetchError::Empty);
        }

        debug!(
            endpoint = %self.endpoint,
            accepted = decoded.products.len(),
            rejected = decoded.rejected.len(),
            "decoded catalog response"
        );
        Ok(decoded.products)
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
