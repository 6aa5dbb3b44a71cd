//! TMDB watch-provider lookups, timeout-bounded per call.

use crate::provider::{EnrichError, EnrichmentProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use tv_annotate_models::{ProviderEntry, WatchProviders};

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    region: String,
}

#[derive(Debug, Deserialize)]
struct WatchProvidersResponse {
    #[serde(default)]
    results: HashMap<String, RegionListing>,
}

#[derive(Debug, Deserialize)]
struct RegionListing {
    link: Option<String>,
    #[serde(default)]
    flatrate: Vec<ApiProvider>,
    #[serde(default)]
    rent: Vec<ApiProvider>,
    #[serde(default)]
    buy: Vec<ApiProvider>,
}

#[derive(Debug, Deserialize)]
struct ApiProvider {
    provider_name: String,
    logo_path: Option<String>,
}

impl TmdbClient {
    pub fn new(api_key: String, region: String, timeout: Duration) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: TMDB_BASE_URL.to_string(),
            api_key,
            region,
        })
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn map_region(&self, listing: RegionListing) -> WatchProviders {
        WatchProviders {
            region: self.region.clone(),
            link: listing.link,
            flatrate: map_providers(listing.flatrate),
            rent: map_providers(listing.rent),
            buy: map_providers(listing.buy),
        }
    }
}

fn map_providers(providers: Vec<ApiProvider>) -> Vec<ProviderEntry> {
    providers
        .into_iter()
        .map(|p| ProviderEntry {
            provider_name: p.provider_name,
            logo_path: p.logo_path,
        })
        .collect()
}

#[async_trait]
impl EnrichmentProvider for TmdbClient {
    async fn watch_providers(&self, tmdb_id: u64) -> Result<Option<WatchProviders>, EnrichError> {
        let url = format!("{}/movie/{}/watch/providers", self.base_url, tmdb_id);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: WatchProvidersResponse = serde_json::from_str(&body)?;
        let listing = match payload.results.into_iter().find(|(r, _)| r == &self.region) {
            Some((_, listing)) => listing,
            None => {
                debug!("No watch providers for tmdb {} in {}", tmdb_id, self.region);
                return Ok(None);
            }
        };
        Ok(Some(self.map_region(listing)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_decoding_picks_configured_region() {
        let body = r#"{
            "id": 98,
            "results": {
                "BG": {
                    "link": "https://www.themoviedb.org/movie/98/watch?locale=BG",
                    "flatrate": [{"provider_name": "HBO Max", "logo_path": "/hbo.png", "display_priority": 1}],
                    "rent": [{"provider_name": "Apple TV"}]
                },
                "US": {"flatrate": [{"provider_name": "Peacock"}]}
            }
        }"#;
        let payload: WatchProvidersResponse = serde_json::from_str(body).unwrap();
        let client = TmdbClient::new(
            "key".to_string(),
            "BG".to_string(),
            Duration::from_secs(10),
        )
        .unwrap();

        let listing = payload
            .results
            .into_iter()
            .find(|(r, _)| r == "BG")
            .map(|(_, l)| l)
            .unwrap();
        let watch = client.map_region(listing);
        assert_eq!(watch.region, "BG");
        assert_eq!(watch.flatrate[0].provider_name, "HBO Max");
        assert_eq!(watch.rent[0].provider_name, "Apple TV");
        assert!(watch.buy.is_empty());
        assert!(watch.link.as_deref().unwrap().contains("locale=BG"));
    }

    #[test]
    fn test_response_without_region_decodes_to_empty() {
        let body = r#"{"id": 98, "results": {}}"#;
        let payload: WatchProvidersResponse = serde_json::from_str(body).unwrap();
        assert!(payload.results.is_empty());
    }
}
