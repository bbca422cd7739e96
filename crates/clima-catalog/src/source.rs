//! Remote catalog source.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use clima_common::{ClimError, ClimResult};

use crate::catalog::{Catalog, CatalogEntry};
use crate::details::DatasetDetails;

/// Public catalogue endpoint of the Climate Data Store.
pub const DEFAULT_CATALOG_URL: &str = "https://cds.climate.copernicus.eu/api/catalogue/v1";

/// A source of catalog metadata.
///
/// [`CatalogCache`](crate::cache::CatalogCache) talks to the remote only
/// through this trait, so tests substitute in-memory fakes.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full collection index.
    async fn collections(&self) -> ClimResult<Catalog>;

    /// Fetch supplementary detail for a single dataset.
    async fn collection_details(&self, id: &str) -> ClimResult<DatasetDetails>;
}

/// HTTP implementation backed by the remote catalogue API.
pub struct HttpCatalogSource {
    client: Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_CATALOG_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> ClimResult<T> {
        debug!(url = %url, "Requesting catalog endpoint");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClimError::RemoteUnreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClimError::RemoteUnavailable {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClimError::ParseError(format!("{}: {}", context, e)))
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn collections(&self) -> ClimResult<Catalog> {
        let url = format!("{}/collections", self.base_url);
        let body: CollectionsResponse = self.get_json(&url, "collection index").await?;

        let catalog: Catalog = body
            .collections
            .into_iter()
            .map(|c| {
                (
                    c.id,
                    CatalogEntry {
                        title: c.title,
                        description: c.description,
                    },
                )
            })
            .collect();

        info!(count = catalog.len(), "Fetched collection index");
        Ok(catalog)
    }

    async fn collection_details(&self, id: &str) -> ClimResult<DatasetDetails> {
        let url = format!("{}/collections/{}", self.base_url, id);
        let details: DatasetDetails = self.get_json(&url, "collection detail").await?;

        debug!(dataset = %id, "Fetched collection detail");
        Ok(details)
    }
}

/// Wire shape of the collection index response.
#[derive(Debug, Deserialize)]
struct CollectionsResponse {
    #[serde(default)]
    collections: Vec<RemoteCollection>,
}

#[derive(Debug, Deserialize)]
struct RemoteCollection {
    id: String,
    title: Option<String>,
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_collection_index_body() {
        let json = r#"{
            "collections": [
                {"id": "era5", "title": "ERA5 hourly data", "description": "Reanalysis"},
                {"id": "cmip6"}
            ]
        }"#;

        let body: CollectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.collections.len(), 2);
        assert_eq!(body.collections[0].id, "era5");
        assert_eq!(body.collections[1].title, None);
    }

    #[test]
    fn test_missing_collections_key_parses_as_empty() {
        let body: CollectionsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.collections.is_empty());
    }

    #[test]
    fn test_non_object_body_is_a_parse_failure() {
        assert!(serde_json::from_str::<CollectionsResponse>("[1, 2]").is_err());
    }
}
